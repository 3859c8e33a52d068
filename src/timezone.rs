//! Conversions between UTC instants and wall-clock time in the fixed
//! display zone.
//!
//! All calendar content renders in one real-world timezone no matter
//! where the stored instants originate. Conversions here never fail:
//! a wall-clock time that does not resolve cleanly (inside a DST gap)
//! degrades to the zone's standard offset rather than erroring, so one
//! bad instant cannot break a whole render.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};

use crate::error::{CalendarError, CalendarResult};

/// UTC ↔ display-zone wall clock, backed by the IANA timezone table.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneReconciler {
    zone: Tz,
}

impl Default for TimezoneReconciler {
    fn default() -> Self {
        TimezoneReconciler {
            zone: chrono_tz::America::Denver,
        }
    }
}

impl TimezoneReconciler {
    pub fn new(zone: Tz) -> Self {
        TimezoneReconciler { zone }
    }

    /// Look up a zone by IANA name (e.g. "America/Denver").
    pub fn from_name(name: &str) -> CalendarResult<Self> {
        let zone: Tz = name
            .parse()
            .map_err(|_| CalendarError::Config(format!("Unknown timezone '{}'", name)))?;
        Ok(TimezoneReconciler { zone })
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Wall-clock components of an instant in the display zone.
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.zone).naive_local()
    }

    /// The zone-local calendar date an instant falls on.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.to_local(instant).date()
    }

    /// Resolve a wall-clock moment in the display zone back to UTC.
    ///
    /// An ambiguous local time (DST fall-back) takes the earliest
    /// mapping. A nonexistent local time (spring-forward gap) falls
    /// back to the zone's standard offset.
    pub fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self.zone.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _latest) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                tracing::debug!(
                    local = %local,
                    zone = %self.zone,
                    "nonexistent local time, falling back to standard offset"
                );
                let standard = self.zone.offset_from_utc_datetime(&local).base_utc_offset();
                Utc.from_utc_datetime(&(local - standard))
            }
        }
    }

    /// The instant of zone-local midnight on a calendar date.
    pub fn date_start(&self, date: NaiveDate) -> DateTime<Utc> {
        self.from_local(date.and_hms_opt(0, 0, 0).unwrap())
    }

    /// Parse a `YYYY-MM-DD` date key.
    pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
    }

    /// The instant of zone-local midnight of a `YYYY-MM-DD` date key.
    pub fn date_key_start(&self, key: &str) -> Option<DateTime<Utc>> {
        Self::parse_date_key(key).map(|date| self.date_start(date))
    }

    /// Format a calendar date as a `YYYY-MM-DD` date key.
    pub fn format_date_key(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}
