//! Visible date window for expansion and aggregation.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::clock::Clock;
use crate::timezone::TimezoneReconciler;

/// Default window radius when no explicit range is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 45;

/// Half-open UTC window `[start, end)` of visible calendar content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange { start, end }
    }

    /// Window of ±`DEFAULT_WINDOW_DAYS` around the injected clock's now.
    pub fn around(clock: &dyn Clock) -> Self {
        let now = clock.now();
        DateRange {
            start: now - Duration::days(DEFAULT_WINDOW_DAYS),
            end: now + Duration::days(DEFAULT_WINDOW_DAYS),
        }
    }

    /// Window covering the zone-local dates `[first, last]` inclusive,
    /// from local midnight of `first` to local midnight after `last`.
    pub fn of_local_dates(tz: &TimezoneReconciler, first: NaiveDate, last: NaiveDate) -> Self {
        DateRange {
            start: tz.date_start(first),
            end: tz.date_start(last + Duration::days(1)),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// First zone-local calendar date the window touches.
    pub fn first_local_date(&self, tz: &TimezoneReconciler) -> NaiveDate {
        tz.local_date(self.start)
    }

    /// Last zone-local calendar date the window touches (`end` is exclusive).
    pub fn last_local_date(&self, tz: &TimezoneReconciler) -> NaiveDate {
        tz.local_date(self.end - Duration::seconds(1))
    }
}
