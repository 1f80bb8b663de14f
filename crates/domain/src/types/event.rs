//! Event, venue, and organizer wire models
//!
//! The remote API nests every record inside a keyed wrapper
//! (`{"events": [{"event": {...}}]}`, `{"venues": [{"venue": {...}}]}`); the
//! `*Entry` structs model that one level of indirection. Date-times arrive as
//! `YYYY-MM-DD HH:MM:SS` strings in the event's source timezone and are kept
//! as strings: the format orders lexicographically, and only the future
//! cutoff ever parses them.

use serde::{Deserialize, Deserializer, Serialize};

/// One `{start_date, end_date}` entry of a recurring event's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatWindow {
    pub start_date: String,
    pub end_date: String,
}

/// Reference to the venue hosting an event. Absent on online events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Reference to the organizer of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// A single event record as returned by `user_list_events`.
///
/// `occurrence` is never present on the wire; it is set on the synthetic
/// records produced by recurrence expansion (index into `repeat_schedule`)
/// and is conceptually `0` for the base record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "yes_no")]
    pub repeats: bool,
    #[serde(default)]
    pub repeat_schedule: Vec<RepeatWindow>,
    #[serde(default)]
    pub venue: Option<VenueRef>,
    #[serde(default)]
    pub organizer: Option<OrganizerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<usize>,
}

impl Event {
    /// Occurrence index of this record, `0` for an unexpanded base record.
    pub fn occurrence_index(&self) -> usize {
        self.occurrence.unwrap_or(0)
    }
}

/// Wire wrapper around a single event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub event: Event,
}

/// A venue owned by the authenticated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Wire wrapper around a single venue record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueEntry {
    pub venue: Venue,
}

/// An organizer profile owned by the authenticated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Wire wrapper around a single organizer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizerEntry {
    pub organizer: Organizer,
}

/// The authenticated user as returned by `user_get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Identifiers arrive as either JSON numbers or strings depending on the
/// endpoint; normalize to `String` so comparisons stay uniform.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}

/// The API reports recurrence as the strings `"yes"` / `"no"`.
fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(b) => b,
        Raw::Text(s) => s.eq_ignore_ascii_case("yes"),
    })
}
