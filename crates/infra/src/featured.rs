//! Featured-event helpers
//!
//! Site operators mark a handful of event occurrences as featured through
//! settings; these helpers translate that setting into occurrence filters
//! and run the listing. The setting value is an array of `"id"` or
//! `"id:occurrence"` strings (a bare id means the base occurrence).

use eventline_common::cache::RefreshMode;
use eventline_common::time::Clock;
use eventline_core::{EventService, SettingsStore};
use eventline_domain::{Event, EventQuery, OccurrenceRef};
use serde_json::Value;
use tracing::warn;

/// Settings group holding this integration's options.
pub const SETTINGS_GROUP: &str = "eventbrite";
/// Settings key listing the featured occurrences.
pub const FEATURED_EVENTS_KEY: &str = "featured-event-ids";

/// Reads the configured featured occurrences. A missing setting or one with
/// an unexpected shape yields an empty list; individually malformed entries
/// are skipped with a warning.
pub fn featured_event_refs(settings: &dyn SettingsStore) -> Vec<OccurrenceRef> {
    let Some(value) = settings.get_setting(FEATURED_EVENTS_KEY, SETTINGS_GROUP) else {
        return Vec::new();
    };
    let Some(entries) = value.as_array() else {
        warn!(key = FEATURED_EVENTS_KEY, "featured events setting is not an array");
        return Vec::new();
    };

    entries.iter().filter_map(parse_ref).collect()
}

fn parse_ref(entry: &Value) -> Option<OccurrenceRef> {
    match entry {
        Value::String(raw) => match raw.split_once(':') {
            Some((id, occurrence)) => match occurrence.parse() {
                Ok(occurrence) if !id.is_empty() => Some(OccurrenceRef::new(id, occurrence)),
                _ => {
                    warn!(entry = %raw, "skipping malformed featured event entry");
                    None
                }
            },
            None if !raw.is_empty() => Some(OccurrenceRef::new(raw.as_str(), 0)),
            None => None,
        },
        Value::Number(id) => Some(OccurrenceRef::new(id.to_string(), 0)),
        other => {
            warn!(entry = %other, "skipping malformed featured event entry");
            None
        }
    }
}

/// Lists the featured occurrences in listing order. No featured
/// configuration means no featured events, not the full listing.
pub async fn get_featured_events<C>(
    service: &EventService<C>,
    settings: &dyn SettingsStore,
    mode: RefreshMode,
) -> Vec<Event>
where
    C: Clock + Clone,
{
    let refs = featured_event_refs(settings);
    if refs.is_empty() {
        return Vec::new();
    }

    let query = EventQuery { include_occurrences: refs, ..EventQuery::default() };
    service.get_user_events(&query, mode).await
}

/// Lists every occurrence except the featured ones.
pub async fn get_non_featured_events<C>(
    service: &EventService<C>,
    settings: &dyn SettingsStore,
    mode: RefreshMode,
) -> Vec<Event>
where
    C: Clock + Clone,
{
    let query =
        EventQuery { exclude_occurrences: featured_event_refs(settings), ..EventQuery::default() };
    service.get_user_events(&query, mode).await
}
