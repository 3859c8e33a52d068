//! Store-owned entity types and the derived occurrence.
//!
//! Persistent entities (`EventDefinition`, `DatedSpecial`, `Announcement`)
//! are owned by the external store; this crate only reads them and, for
//! reschedule, submits a partial update back. `Occurrence` is ephemeral:
//! derived during expansion, never persisted.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::de::Error as DeError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Weekdays in Monday-first order, matching the two-letter rule tokens.
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Two-letter token for a weekday (`MO`..`SU`), as used in rule text
/// and in serialized weekday sets.
pub fn weekday_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

pub fn weekday_from_token(token: &str) -> Option<Weekday> {
    match token {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

/// A set of weekdays, stored as a Monday-first bitmask.
///
/// Serializes as a list of two-letter tokens so stored specials and
/// recurrence patterns stay human-readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const fn empty() -> Self {
        WeekdaySet(0)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the contained weekdays in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_WEEKDAYS.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for day in self.iter() {
            seq.serialize_element(weekday_token(day))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tokens = Vec::<String>::deserialize(deserializer)?;
        let mut set = WeekdaySet::empty();
        for token in &tokens {
            let day = weekday_from_token(token)
                .ok_or_else(|| D::Error::custom(format!("unknown weekday token '{}'", token)))?;
            set.insert(day);
        }
        Ok(set)
    }
}

/// Event categories in fixed display precedence: declaration order is
/// the aggregation order, and uncategorized events sort after all of
/// these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    LiveMusic,
    WineTasting,
    PrivateDining,
    Holiday,
}

impl EventCategory {
    pub fn precedence(self) -> u8 {
        self as u8
    }
}

/// A stored event definition: the anchor instants plus an optional
/// compact recurrence rule and the exception dates appended by
/// "delete this occurrence".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Anchor start instant (UTC). Its zone-local time-of-day is
    /// stamped onto every generated occurrence.
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub all_day: bool,
    /// Recurrence rule as stored: opaque compact text, decoded by the codec.
    #[serde(default)]
    pub rule: Option<String>,
    /// Zone-local calendar dates on which a recurring occurrence is suppressed.
    #[serde(default)]
    pub exception_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub category: Option<EventCategory>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub active: bool,
}

impl EventDefinition {
    /// Anchor duration, if the event has an end.
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    Food,
    Drink,
}

/// When a special applies: either on a recurring set of weekdays or
/// over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialSchedule {
    Weekdays(WeekdaySet),
    Range { start: NaiveDate, end: NaiveDate },
}

impl SpecialSchedule {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            SpecialSchedule::Weekdays(days) => days.contains(date.weekday()),
            SpecialSchedule::Range { start, end } => *start <= date && date <= *end,
        }
    }
}

/// A food or drink special shown on matching days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedSpecial {
    pub id: String,
    pub title: String,
    pub kind: SpecialKind,
    pub schedule: SpecialSchedule,
    pub active: bool,
}

/// An announcement shown on every local calendar date its
/// publish/expire interval overlaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub body: String,
    pub publish_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
    pub published: bool,
}

/// One concrete instance of an event within a visible range.
///
/// Derived by expansion and handed to rendering; never persisted.
/// Carries the denormalized display fields so the aggregator does not
/// have to look the definition back up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub event_id: String,
    pub title: String,
    pub category: Option<EventCategory>,
    pub all_day: bool,
    /// Whether this instance was generated by a recurrence pattern.
    pub recurring: bool,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// The zone-local calendar date this occurrence is bucketed under.
    pub date: NaiveDate,
}
