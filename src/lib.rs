//! Calendar core for the restaurant site.
//!
//! Turns store-owned event/special/announcement records into the
//! concrete calendar the site renders:
//! - `rule` decodes the compact recurrence rule text,
//! - `timezone` reconciles stored UTC instants with wall-clock time in
//!   the one fixed display zone,
//! - `expand` produces the occurrences visible in a date window,
//! - `agenda` merges them with specials and announcements into
//!   prioritized per-day lists,
//! - `reschedule` relocates an occurrence via drag-and-drop, with
//!   persistence delegated to the external `store`.
//!
//! Expansion and aggregation are pure and safe to recompute on every
//! navigation; a malformed record degrades locally and never breaks
//! the rest of the calendar.

pub mod agenda;
pub mod cache;
pub mod clock;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod expand;
pub mod reschedule;
pub mod rule;
pub mod store;
pub mod timezone;

pub use agenda::{CalendarItem, CalendarView, DayAggregator};
pub use cache::EventCache;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CalendarConfig;
pub use date_range::DateRange;
pub use error::{CalendarError, CalendarResult};
pub use event::{
    Announcement, DatedSpecial, EventCategory, EventDefinition, Occurrence, SpecialKind,
    SpecialSchedule, WeekdaySet,
};
pub use expand::OccurrenceExpander;
pub use reschedule::{snap_to_slot, ExcludeOccurrenceCommand, RescheduleCommand};
pub use store::{AnnouncementStore, EventPatch, EventStore, SpecialStore};
pub use timezone::TimezoneReconciler;
