//! Recurrence expansion
//!
//! The remote API returns one record per recurring event plus its full
//! `repeat_schedule`. Listing by date needs one record per concrete
//! occurrence, so each schedule entry becomes a synthetic copy of the base
//! event with its dates overwritten and `occurrence` set to the entry's
//! index. A schedule entry whose dates equal the base event's dates is the
//! canonical instance already represented by the unexpanded record and is
//! skipped.

use eventline_domain::Event;

/// Produce the synthetic occurrence records for every repeating event in
/// `events`. Non-repeating events contribute nothing; the caller appends the
/// result to the original list and re-sorts.
pub fn repeat_occurrences(events: &[Event]) -> Vec<Event> {
    let mut occurrences = Vec::new();

    for event in events.iter().filter(|event| event.repeats) {
        for (index, window) in event.repeat_schedule.iter().enumerate() {
            if window.start_date == event.start_date && window.end_date == event.end_date {
                continue;
            }

            let mut occurrence = event.clone();
            occurrence.start_date = window.start_date.clone();
            occurrence.end_date = window.end_date.clone();
            occurrence.occurrence = Some(index);
            occurrences.push(occurrence);
        }
    }

    occurrences
}
