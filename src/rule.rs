//! Compact recurrence rule codec.
//!
//! Rules are stored as opaque text of the form
//! `FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20240531` or
//! `FREQ=MONTHLY;BYMONTHDAY=15;UNTIL=20240531`. Decoding never fails:
//! a rule the codec cannot parse silently demotes the event to
//! non-recurring, with a diagnostic log. The form UI uses
//! `decode`/`encode` to convert between human selections and rule text.

use chrono::NaiveDate;

use crate::event::{weekday_from_token, weekday_token, WeekdaySet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frequency {
    None,
    Weekly { weekdays: WeekdaySet },
    Monthly { month_day: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    /// Inclusive end date for the recurrence, if any.
    pub until: Option<NaiveDate>,
}

impl RecurrencePattern {
    pub fn none() -> Self {
        RecurrencePattern {
            frequency: Frequency::None,
            until: None,
        }
    }

    /// Whether this pattern generates occurrences beyond the anchor.
    /// A weekly pattern with an empty weekday set has no effect.
    pub fn is_recurring(&self) -> bool {
        match &self.frequency {
            Frequency::None => false,
            Frequency::Weekly { weekdays } => !weekdays.is_empty(),
            Frequency::Monthly { .. } => true,
        }
    }
}

/// Decode rule text into a pattern. Never fails: malformed text
/// decodes to a non-recurring pattern.
pub fn decode(text: &str) -> RecurrencePattern {
    match parse(text) {
        Ok(pattern) => pattern,
        Err(reason) => {
            tracing::debug!(
                rule = text,
                reason = %reason,
                "unparsable recurrence rule, treating event as non-recurring"
            );
            RecurrencePattern::none()
        }
    }
}

/// Encode a pattern as rule text. Non-recurring patterns (including
/// weekly with an empty weekday set) encode to the empty string.
pub fn encode(pattern: &RecurrencePattern) -> String {
    let mut text = match &pattern.frequency {
        Frequency::None => return String::new(),
        Frequency::Weekly { weekdays } if weekdays.is_empty() => return String::new(),
        Frequency::Weekly { weekdays } => {
            let days: Vec<&str> = weekdays.iter().map(weekday_token).collect();
            format!("FREQ=WEEKLY;BYDAY={}", days.join(","))
        }
        Frequency::Monthly { month_day } => {
            format!("FREQ=MONTHLY;BYMONTHDAY={}", month_day)
        }
    };

    if let Some(until) = pattern.until {
        text.push_str(&format!(";UNTIL={}", until.format("%Y%m%d")));
    }

    text
}

fn parse(text: &str) -> Result<RecurrencePattern, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(RecurrencePattern::none());
    }

    let mut freq: Option<String> = None;
    let mut weekdays: Option<WeekdaySet> = None;
    let mut month_day: Option<u32> = None;
    let mut until: Option<NaiveDate> = None;

    for part in text.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| format!("token '{}' has no value", part))?;

        match key {
            "FREQ" => freq = Some(value.to_string()),
            "BYDAY" => {
                let mut set = WeekdaySet::empty();
                for token in value.split(',') {
                    let token = token.trim();
                    if token.is_empty() {
                        continue;
                    }
                    let day = weekday_from_token(token)
                        .ok_or_else(|| format!("unknown weekday '{}'", token))?;
                    set.insert(day);
                }
                weekdays = Some(set);
            }
            "BYMONTHDAY" => {
                let day: u32 = value
                    .parse()
                    .map_err(|_| format!("invalid month day '{}'", value))?;
                month_day = Some(day);
            }
            "UNTIL" => until = Some(parse_until(value)?),
            other => return Err(format!("unknown token '{}'", other)),
        }
    }

    match freq.as_deref() {
        Some("WEEKLY") => Ok(RecurrencePattern {
            frequency: Frequency::Weekly {
                weekdays: weekdays.unwrap_or_default(),
            },
            until,
        }),
        Some("MONTHLY") => {
            let day = month_day.ok_or("MONTHLY rule without BYMONTHDAY")?;
            if !(1..=31).contains(&day) {
                return Err(format!("month day {} out of range", day));
            }
            Ok(RecurrencePattern {
                frequency: Frequency::Monthly { month_day: day },
                until,
            })
        }
        Some(other) => Err(format!("unknown frequency '{}'", other)),
        None => Err("missing FREQ".to_string()),
    }
}

/// Parse an UNTIL value: `YYYYMMDD`, optionally with a time suffix
/// (`YYYYMMDDTHHMMSSZ`) whose time part is ignored.
fn parse_until(value: &str) -> Result<NaiveDate, String> {
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y%m%d")
        .map_err(|_| format!("invalid UNTIL date '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_decode_weekly_with_weekday_set() {
        let pattern = decode("FREQ=WEEKLY;BYDAY=MO,WE,FR");
        match &pattern.frequency {
            Frequency::Weekly { weekdays } => {
                assert!(weekdays.contains(Weekday::Mon));
                assert!(weekdays.contains(Weekday::Wed));
                assert!(weekdays.contains(Weekday::Fri));
                assert_eq!(weekdays.len(), 3);
            }
            other => panic!("Expected weekly, got {:?}", other),
        }
        assert!(pattern.until.is_none());
        assert!(pattern.is_recurring());
    }

    #[test]
    fn test_decode_monthly_with_until() {
        let pattern = decode("FREQ=MONTHLY;BYMONTHDAY=15;UNTIL=20240531");
        assert_eq!(pattern.frequency, Frequency::Monthly { month_day: 15 });
        assert_eq!(pattern.until, NaiveDate::from_ymd_opt(2024, 5, 31));
    }

    #[test]
    fn test_decode_until_with_time_suffix() {
        let pattern = decode("FREQ=WEEKLY;BYDAY=TU;UNTIL=20241231T235959Z");
        assert_eq!(pattern.until, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_decode_empty_text_is_non_recurring() {
        assert_eq!(decode(""), RecurrencePattern::none());
        assert_eq!(decode("   "), RecurrencePattern::none());
    }

    #[test]
    fn test_malformed_rules_demote_to_non_recurring() {
        // Unknown frequency, bad weekday, out-of-range month day,
        // missing value, unknown key: all decode to none, never panic.
        for text in [
            "FREQ=DAILY",
            "FREQ=WEEKLY;BYDAY=XX",
            "FREQ=MONTHLY;BYMONTHDAY=0",
            "FREQ=MONTHLY;BYMONTHDAY=32",
            "FREQ=MONTHLY",
            "FREQ=MONTHLY;BYMONTHDAY=abc",
            "FREQ=WEEKLY;UNTIL=notadate",
            "BYDAY=MO",
            "garbage",
        ] {
            assert_eq!(decode(text), RecurrencePattern::none(), "for rule {:?}", text);
        }
    }

    #[test]
    fn test_encode_weekly_and_monthly() {
        let weekly = RecurrencePattern {
            frequency: Frequency::Weekly {
                weekdays: [Weekday::Mon, Weekday::Wed].into_iter().collect(),
            },
            until: None,
        };
        assert_eq!(encode(&weekly), "FREQ=WEEKLY;BYDAY=MO,WE");

        let monthly = RecurrencePattern {
            frequency: Frequency::Monthly { month_day: 31 },
            until: NaiveDate::from_ymd_opt(2025, 1, 31),
        };
        assert_eq!(encode(&monthly), "FREQ=MONTHLY;BYMONTHDAY=31;UNTIL=20250131");
    }

    #[test]
    fn test_encode_empty_weekday_set_is_empty_string() {
        let pattern = RecurrencePattern {
            frequency: Frequency::Weekly {
                weekdays: WeekdaySet::empty(),
            },
            until: NaiveDate::from_ymd_opt(2024, 6, 1),
        };
        assert_eq!(encode(&pattern), "");
        assert!(!pattern.is_recurring());
    }

    #[test]
    fn test_decode_encode_roundtrip_preserves_pattern() {
        for text in [
            "FREQ=WEEKLY;BYDAY=MO,TH,SU",
            "FREQ=WEEKLY;BYDAY=SA;UNTIL=20240601",
            "FREQ=MONTHLY;BYMONTHDAY=1",
        ] {
            let pattern = decode(text);
            let reencoded = encode(&pattern);
            assert_eq!(decode(&reencoded), pattern, "for rule {:?}", text);
        }
    }
}
