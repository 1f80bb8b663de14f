//! Filter, sort, and pagination stages
//!
//! Each stage is a pure function taking only the parameters it needs. A
//! stage whose driving parameter is empty or default leaves the list
//! untouched (pass-through, never a failure); selectors that match nothing
//! legitimately produce an empty list.

use chrono::{NaiveDate, NaiveDateTime};
use eventline_domain::{Event, OccurrenceRef, Order};
use tracing::warn;

/// Keep only events whose id is in `include`. No-op when `include` is empty.
pub fn retain_included(events: &mut Vec<Event>, include: &[String]) {
    if include.is_empty() {
        return;
    }
    events.retain(|event| include.iter().any(|id| *id == event.id));
}

/// Drop events whose id is in `exclude`. No-op when `exclude` is empty.
pub fn retain_excluded(events: &mut Vec<Event>, exclude: &[String]) {
    if exclude.is_empty() {
        return;
    }
    events.retain(|event| !exclude.iter().any(|id| *id == event.id));
}

/// Keep only events at the selected venue. `None`, `""`, and `"all"` pass
/// everything through; `"online"` keeps events without a venue.
pub fn retain_venue(events: &mut Vec<Event>, venue: Option<&str>) {
    let Some(venue) = venue else { return };
    if venue.is_empty() || venue == "all" {
        return;
    }
    retain_venue_id(events, venue);
}

/// Venue-id equality without the `"all"` escape hatch; used by the derived
/// venue listing, which always applies its venue argument.
pub fn retain_venue_id(events: &mut Vec<Event>, venue: &str) {
    events.retain(|event| match &event.venue {
        Some(venue_ref) => venue_ref.id == venue,
        // No venue reference means an online event.
        None => venue == "online",
    });
}

/// Keep only events from the selected organizer. `None`, `""`, and `"all"`
/// pass everything through; events without an organizer never match.
pub fn retain_organizer(events: &mut Vec<Event>, organizer: Option<&str>) {
    let Some(organizer) = organizer else { return };
    if organizer.is_empty() || organizer == "all" {
        return;
    }
    events.retain(|event| {
        event.organizer.as_ref().is_some_and(|organizer_ref| organizer_ref.id == organizer)
    });
}

/// Keep only `(id, occurrence)` pairs present in `refs`. An unexpanded
/// record counts as occurrence `0`. No-op when `refs` is empty.
pub fn retain_included_occurrences(events: &mut Vec<Event>, refs: &[OccurrenceRef]) {
    if refs.is_empty() {
        return;
    }
    events.retain(|event| {
        refs.iter().any(|r| r.id == event.id && r.occurrence == event.occurrence_index())
    });
}

/// Drop `(id, occurrence)` pairs present in `refs`. No-op when `refs` is
/// empty.
pub fn retain_excluded_occurrences(events: &mut Vec<Event>, refs: &[OccurrenceRef]) {
    if refs.is_empty() {
        return;
    }
    events.retain(|event| {
        !refs.iter().any(|r| r.id == event.id && r.occurrence == event.occurrence_index())
    });
}

/// Drop events that have already ended: keep `end_date >= now`. The API
/// returns past occurrences of a series whose later occurrences are still
/// upcoming, so this runs after expansion. Records whose `end_date` does
/// not parse are dropped with a warning.
pub fn retain_future(events: &mut Vec<Event>, now: NaiveDateTime) {
    events.retain(|event| match parse_datetime(&event.end_date) {
        Some(end) => end >= now,
        None => {
            warn!(event_id = %event.id, end_date = %event.end_date, "dropping event with unparseable end date");
            false
        }
    });
}

/// Keep only events whose title contains `search`, case-insensitively.
/// Escaping artifacts from transport (backslash escapes) are removed before
/// matching. Events without a title never match.
pub fn retain_search(events: &mut Vec<Event>, search: &str) {
    let needle = strip_slashes(search).to_lowercase();
    if needle.is_empty() {
        return;
    }
    events.retain(|event| {
        event.title.as_deref().is_some_and(|title| title.to_lowercase().contains(&needle))
    });
}

/// Stable sort by `start_date` ascending. The ISO-like date strings order
/// lexicographically; insertion order breaks ties.
pub fn sort_by_start_date(events: &mut [Event]) {
    events.sort_by(|a, b| a.start_date.cmp(&b.start_date));
}

/// Stable sort by `created` in the requested direction. Records whose
/// `created` does not parse sort last in either direction.
pub fn sort_by_created(events: &mut [Event], order: Order) {
    events.sort_by(|a, b| {
        let a_ts = a.created.as_deref().and_then(parse_datetime);
        let b_ts = b.created.as_deref().and_then(parse_datetime);
        match (a_ts, b_ts) {
            (Some(a_ts), Some(b_ts)) => match order {
                Order::Asc => a_ts.cmp(&b_ts),
                Order::Desc => b_ts.cmp(&a_ts),
            },
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// Apply pagination: `page > 0` slices `[(page-1)*per_page, +per_page)`
/// (empty past the end); otherwise `count > 0` keeps the first `count`
/// items; otherwise the whole list is returned.
pub fn paginate(events: Vec<Event>, page: i64, per_page: usize, count: i64) -> Vec<Event> {
    if page > 0 {
        let start = (page as usize - 1).saturating_mul(per_page);
        events.into_iter().skip(start).take(per_page).collect()
    } else if count > 0 {
        let mut events = events;
        events.truncate(count as usize);
        events
    } else {
        events
    }
}

/// Parse the API's `YYYY-MM-DD HH:MM:SS` timestamps, accepting a `T`
/// separator or a bare date.
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Remove backslash escapes added in transport (`\'` becomes `'`, `\\`
/// becomes `\`).
fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
