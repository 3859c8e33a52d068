//! Occurrence expansion for event definitions.
//!
//! Expands one stored event into the concrete occurrences that fall
//! within a visible window, in the fixed display zone. Recurrence is
//! civil (wall-clock): the anchor's local time-of-day is stamped onto
//! every generated occurrence, so a 7pm dinner stays at 7pm across
//! daylight-saving transitions even though the UTC instant shifts.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::date_range::DateRange;
use crate::event::{EventDefinition, Occurrence};
use crate::rule::{self, Frequency, RecurrencePattern};
use crate::timezone::TimezoneReconciler;

pub struct OccurrenceExpander {
    tz: TimezoneReconciler,
}

impl OccurrenceExpander {
    pub fn new(tz: TimezoneReconciler) -> Self {
        OccurrenceExpander { tz }
    }

    pub fn reconciler(&self) -> &TimezoneReconciler {
        &self.tz
    }

    /// Expand one event into its occurrences within `range`, sorted by
    /// start. Inactive events expand to nothing; an unparsable rule
    /// degrades to the anchor occurrence alone.
    pub fn expand(&self, event: &EventDefinition, range: &DateRange) -> Vec<Occurrence> {
        if !event.active {
            return Vec::new();
        }

        let pattern = event
            .rule
            .as_deref()
            .map(rule::decode)
            .unwrap_or_else(RecurrencePattern::none);

        if !pattern.is_recurring() {
            return self.anchor_only(event, range);
        }

        let anchor_local = self.tz.to_local(event.start);
        let anchor_date = anchor_local.date();
        let start_time = anchor_local.time();
        // End time-of-day plus how many local days the anchor's end sits
        // after its start, so midnight-crossing events keep their span.
        let end_shape = event.end.map(|end| {
            let end_local = self.tz.to_local(end);
            (end_local.time(), (end_local.date() - anchor_date).num_days())
        });

        let first = range.first_local_date(&self.tz);
        let last = range.last_local_date(&self.tz);

        let mut occurrences = Vec::new();
        let mut date = first;
        while date <= last {
            if date_matches(&pattern, anchor_date, date)
                && !event.exception_dates.contains(&date)
            {
                let start = self.tz.from_local(date.and_time(start_time));
                let end = end_shape.and_then(|(time, day_offset)| {
                    match date.checked_add_signed(Duration::days(day_offset)) {
                        Some(end_date) => Some(self.tz.from_local(end_date.and_time(time))),
                        None => {
                            tracing::debug!(
                                event = %event.id,
                                occurrence_date = %date,
                                "occurrence end overflows the calendar, dropping end"
                            );
                            None
                        }
                    }
                });
                occurrences.push(make_occurrence(event, date, start, end, true));
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        // The anchor itself always shows when in range, even if the
        // date enumeration missed it at a window boundary.
        if range.contains(event.start)
            && !event.exception_dates.contains(&anchor_date)
            && !occurrences.iter().any(|o| o.date == anchor_date)
        {
            occurrences.push(make_occurrence(
                event,
                anchor_date,
                event.start,
                event.end,
                true,
            ));
        }

        occurrences.sort_by_key(|o| o.start);
        occurrences
    }

    /// Expand a whole collection. One malformed event only degrades its
    /// own occurrences; it never aborts the rest.
    pub fn expand_all(&self, events: &[EventDefinition], range: &DateRange) -> Vec<Occurrence> {
        let mut all = Vec::new();
        for event in events {
            all.extend(self.expand(event, range));
        }
        all.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.event_id.cmp(&b.event_id)));
        all
    }

    fn anchor_only(&self, event: &EventDefinition, range: &DateRange) -> Vec<Occurrence> {
        if !range.contains(event.start) {
            return Vec::new();
        }
        vec![make_occurrence(
            event,
            self.tz.local_date(event.start),
            event.start,
            event.end,
            false,
        )]
    }
}

fn date_matches(pattern: &RecurrencePattern, anchor_date: NaiveDate, date: NaiveDate) -> bool {
    if date < anchor_date {
        return false;
    }
    if let Some(until) = pattern.until {
        if date > until {
            return false;
        }
    }
    match &pattern.frequency {
        Frequency::None => false,
        Frequency::Weekly { weekdays } => weekdays.contains(date.weekday()),
        // Matching on the day number makes the short-month rule
        // automatic: February has no day 31, so nothing matches.
        Frequency::Monthly { month_day } => date.day() == *month_day,
    }
}

fn make_occurrence(
    event: &EventDefinition,
    date: NaiveDate,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    recurring: bool,
) -> Occurrence {
    Occurrence {
        event_id: event.id.clone(),
        title: event.title.clone(),
        category: event.category,
        all_day: event.all_day,
        recurring,
        start,
        end,
        date,
    }
}
