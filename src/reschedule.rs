//! Drag-interaction commands against the event store.
//!
//! Both commands write to the store first and touch the local cache
//! only after the store confirms, so a failed request leaves the prior
//! position displayed.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::cache::EventCache;
use crate::error::{CalendarError, CalendarResult};
use crate::event::EventDefinition;
use crate::store::{EventPatch, EventStore};
use crate::timezone::TimezoneReconciler;

/// Last slot of the day; snapping never rolls into the next date.
const LAST_SLOT_MINUTES: u32 = 23 * 60 + 30;

/// Snap a wall-clock time to the nearest 30-minute slot. The
/// interaction layer converts a pointer offset to a raw time and snaps
/// it through this before issuing the command.
pub fn snap_to_slot(time: NaiveTime) -> NaiveTime {
    let minutes = time.hour() * 60 + time.minute();
    let snapped = ((minutes + 15) / 30 * 30).min(LAST_SLOT_MINUTES);
    NaiveTime::from_hms_opt(snapped / 60, snapped % 60, 0).unwrap()
}

/// Relocates one occurrence to a new local date and time, preserving
/// the event's duration.
pub struct RescheduleCommand<'a, S: EventStore> {
    store: &'a S,
    tz: TimezoneReconciler,
}

impl<'a, S: EventStore> RescheduleCommand<'a, S> {
    pub fn new(store: &'a S, tz: TimezoneReconciler) -> Self {
        RescheduleCommand { store, tz }
    }

    /// Move the event to `target_date` at `target_time` (snapped to
    /// the nearest 30-minute slot). All-day events are rejected; they
    /// cannot be relocated by dragging.
    pub async fn execute(
        &self,
        cache: &mut EventCache,
        event_id: &str,
        target_date: NaiveDate,
        target_time: NaiveTime,
    ) -> CalendarResult<EventDefinition> {
        let event = cache
            .get(event_id)
            .ok_or_else(|| CalendarError::EventNotFound(event_id.to_string()))?;

        if event.all_day {
            return Err(CalendarError::AllDayImmovable(event_id.to_string()));
        }

        let duration = event.duration();
        let new_start = self
            .tz
            .from_local(target_date.and_time(snap_to_slot(target_time)));
        let patch = EventPatch {
            start: Some(new_start),
            end: duration.map(|d| new_start + d),
        };

        let updated = self.store.update_event(event_id, &patch).await?;
        cache.replace(updated.clone());
        Ok(updated)
    }
}

/// "Delete this occurrence" on a recurring event: appends one
/// exception date, leaving every other occurrence in place.
pub struct ExcludeOccurrenceCommand<'a, S: EventStore> {
    store: &'a S,
}

impl<'a, S: EventStore> ExcludeOccurrenceCommand<'a, S> {
    pub fn new(store: &'a S) -> Self {
        ExcludeOccurrenceCommand { store }
    }

    pub async fn execute(
        &self,
        cache: &mut EventCache,
        event_id: &str,
        date: NaiveDate,
    ) -> CalendarResult<EventDefinition> {
        if cache.get(event_id).is_none() {
            return Err(CalendarError::EventNotFound(event_id.to_string()));
        }

        let updated = self.store.append_exception(event_id, date).await?;
        cache.replace(updated.clone());
        Ok(updated)
    }
}
