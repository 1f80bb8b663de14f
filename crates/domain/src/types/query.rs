//! Typed event query specification
//!
//! The listing entry points accept an [`EventQuery`] merged over these
//! defaults. Every selector left at its default is a pass-through no-op in
//! the filter pipeline, never a failure.

use serde::{Deserialize, Serialize};

/// Sort key for event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// Sort by `start_date` (the default branch: recurrence expansion,
    /// occurrence filters, and the future cutoff all apply).
    #[default]
    StartDate,
    /// Sort by `created`. This branch skips recurrence expansion, the
    /// occurrence filters, and the future cutoff entirely.
    Created,
}

/// Sort direction. Only honored by the `created` ordering; the date-based
/// branch always sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// An `(event id, occurrence index)` pair identifying one concrete date
/// instance of a recurring event. The base record counts as occurrence `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceRef {
    pub id: String,
    pub occurrence: usize,
}

impl OccurrenceRef {
    pub fn new(id: impl Into<String>, occurrence: usize) -> Self {
        Self { id: id.into(), occurrence }
    }
}

/// Query specification for the event listing entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventQuery {
    /// Number of items to return; unbounded when not positive.
    pub count: i64,
    /// Page size used when `page` is enabled.
    pub per_page: usize,
    /// 1-based page number; pagination is disabled when not positive.
    pub page: i64,
    pub orderby: OrderBy,
    pub order: Order,
    /// Keep only these event ids (no-op when empty).
    pub include: Vec<String>,
    /// Drop these event ids (no-op when empty).
    pub exclude: Vec<String>,
    /// Keep only these `(id, occurrence)` pairs (no-op when empty).
    pub include_occurrences: Vec<OccurrenceRef>,
    /// Drop these `(id, occurrence)` pairs (no-op when empty).
    pub exclude_occurrences: Vec<OccurrenceRef>,
    /// Keep only events from this organizer id; `None` or `"all"` pass.
    pub organizer: Option<String>,
    /// Keep only events at this venue id; `"online"` keeps venue-less
    /// events, `None` or `"all"` pass.
    pub venue: Option<String>,
    /// Extra output fields requested from the API.
    pub display: String,
    /// Case-insensitive substring match on the event title.
    pub search: Option<String>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            count: -1,
            per_page: 10,
            page: -1,
            orderby: OrderBy::default(),
            order: Order::default(),
            include: Vec::new(),
            exclude: Vec::new(),
            include_occurrences: Vec::new(),
            exclude_occurrences: Vec::new(),
            organizer: None,
            venue: None,
            display: "repeat_schedule".to_string(),
            search: None,
        }
    }
}
