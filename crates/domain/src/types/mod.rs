//! Domain data types

pub mod event;
pub mod query;

pub use event::{
    Event, EventEntry, Organizer, OrganizerEntry, OrganizerRef, RepeatWindow, User, Venue,
    VenueEntry, VenueRef,
};
pub use query::{EventQuery, OccurrenceRef, Order, OrderBy};
