//! Per-day aggregation of specials, announcements, and occurrences.
//!
//! Builds the ordered display list for one calendar day. The
//! concatenation order is fixed: specials, then announcements, then
//! event occurrences. Everything here is a pure function over
//! already-fetched collections and is cheap to recompute on every
//! range navigation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CalendarConfig;
use crate::event::{Announcement, DatedSpecial, EventCategory, Occurrence, SpecialKind};
use crate::timezone::TimezoneReconciler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarView {
    MonthGrid,
    WeekGrid,
}

/// One entry in a day's display list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalendarItem {
    Special(DatedSpecial),
    Announcement(Announcement),
    Event(Occurrence),
}

/// Aggregates the fetched collections into per-day display lists.
pub struct DayAggregator<'a> {
    tz: &'a TimezoneReconciler,
    announcement_cap: usize,
    event_cap: usize,
    specials: &'a [DatedSpecial],
    announcements: &'a [Announcement],
    occurrences: &'a [Occurrence],
}

impl<'a> DayAggregator<'a> {
    pub fn new(
        tz: &'a TimezoneReconciler,
        config: &CalendarConfig,
        view: CalendarView,
        specials: &'a [DatedSpecial],
        announcements: &'a [Announcement],
        occurrences: &'a [Occurrence],
    ) -> Self {
        DayAggregator {
            tz,
            announcement_cap: config.announcement_cap(view),
            event_cap: config.event_cap(view),
            specials,
            announcements,
            occurrences,
        }
    }

    /// The ordered display list for one zone-local calendar date.
    pub fn for_day(&self, date: NaiveDate) -> Vec<CalendarItem> {
        let mut items = Vec::new();

        // At most one food and one drink special; first match in list
        // order wins.
        for kind in [SpecialKind::Food, SpecialKind::Drink] {
            let matched = self
                .specials
                .iter()
                .find(|s| s.active && s.kind == kind && s.schedule.matches(date));
            if let Some(special) = matched {
                items.push(CalendarItem::Special(special.clone()));
            }
        }

        items.extend(
            self.announcements
                .iter()
                .filter(|a| a.published && self.announcement_covers(a, date))
                .take(self.announcement_cap)
                .cloned()
                .map(CalendarItem::Announcement),
        );

        let mut day_events: Vec<&Occurrence> = self
            .occurrences
            .iter()
            .filter(|o| o.date == date)
            .collect();
        // Category precedence first, then recurring before one-time.
        // The sort is stable, so ties keep their incoming order.
        day_events.sort_by_key(|o| (category_rank(o.category), u8::from(!o.recurring)));
        items.extend(
            day_events
                .into_iter()
                .take(self.event_cap)
                .cloned()
                .map(CalendarItem::Event),
        );

        items
    }

    /// Whether the announcement's publish/expire interval, as local
    /// calendar dates, contains the day (both boundaries inclusive).
    fn announcement_covers(&self, announcement: &Announcement, date: NaiveDate) -> bool {
        let publish = self.tz.local_date(announcement.publish_at);
        let expire = self.tz.local_date(announcement.expire_at);
        publish <= date && date <= expire
    }
}

fn category_rank(category: Option<EventCategory>) -> u8 {
    category.map(EventCategory::precedence).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{SpecialSchedule, WeekdaySet};
    use chrono::{DateTime, TimeZone, Utc, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn special(id: &str, kind: SpecialKind, schedule: SpecialSchedule, active: bool) -> DatedSpecial {
        DatedSpecial {
            id: id.to_string(),
            title: format!("Special {}", id),
            kind,
            schedule,
            active,
        }
    }

    fn every_day() -> SpecialSchedule {
        SpecialSchedule::Weekdays(
            [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ]
            .into_iter()
            .collect(),
        )
    }

    fn announcement(id: &str, publish_at: DateTime<Utc>, expire_at: DateTime<Utc>) -> Announcement {
        Announcement {
            id: id.to_string(),
            title: format!("Announcement {}", id),
            body: String::new(),
            publish_at,
            expire_at,
            published: true,
        }
    }

    fn occurrence(
        id: &str,
        on: NaiveDate,
        category: Option<EventCategory>,
        recurring: bool,
    ) -> Occurrence {
        Occurrence {
            event_id: id.to_string(),
            title: format!("Event {}", id),
            category,
            all_day: false,
            recurring,
            start: Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap(),
            end: None,
            date: on,
        }
    }

    fn item_ids(items: &[CalendarItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                CalendarItem::Special(s) => s.id.clone(),
                CalendarItem::Announcement(a) => a.id.clone(),
                CalendarItem::Event(o) => o.event_id.clone(),
            })
            .collect()
    }

    #[test]
    fn test_one_special_per_kind_first_match_wins() {
        let tz = TimezoneReconciler::default();
        let config = CalendarConfig::default();
        let specials = vec![
            special("closed-food", SpecialKind::Food, every_day(), false),
            special("soup", SpecialKind::Food, every_day(), true),
            special("stew", SpecialKind::Food, every_day(), true),
            special("cider", SpecialKind::Drink, every_day(), true),
        ];
        let aggregator =
            DayAggregator::new(&tz, &config, CalendarView::WeekGrid, &specials, &[], &[]);

        let items = aggregator.for_day(date(2024, 3, 1));
        assert_eq!(item_ids(&items), vec!["soup", "cider"]);
    }

    #[test]
    fn test_special_weekday_and_range_matching() {
        let tz = TimezoneReconciler::default();
        let config = CalendarConfig::default();
        let specials = vec![
            special(
                "taco-tuesday",
                SpecialKind::Food,
                SpecialSchedule::Weekdays([Weekday::Tue].into_iter().collect()),
                true,
            ),
            special(
                "restaurant-week",
                SpecialKind::Drink,
                SpecialSchedule::Range {
                    start: date(2024, 3, 4),
                    end: date(2024, 3, 10),
                },
                true,
            ),
        ];
        let aggregator =
            DayAggregator::new(&tz, &config, CalendarView::WeekGrid, &specials, &[], &[]);

        // 2024-03-05 is a Tuesday inside the range: both match.
        assert_eq!(
            item_ids(&aggregator.for_day(date(2024, 3, 5))),
            vec!["taco-tuesday", "restaurant-week"]
        );
        // 2024-03-06 is a Wednesday: only the range special matches.
        assert_eq!(
            item_ids(&aggregator.for_day(date(2024, 3, 6))),
            vec!["restaurant-week"]
        );
        // 2024-03-12 is a Tuesday outside the range.
        assert_eq!(
            item_ids(&aggregator.for_day(date(2024, 3, 12))),
            vec!["taco-tuesday"]
        );
    }

    #[test]
    fn test_announcement_interval_boundaries_in_display_zone() {
        // Published 2024-03-01T00:00Z, expiring 2024-03-03T23:59Z, seen
        // from UTC-7: the interval touches local dates Feb 29 .. Mar 3.
        let tz = TimezoneReconciler::default();
        let config = CalendarConfig::default();
        let announcements = vec![announcement(
            "spring-menu",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 3, 23, 59, 0).unwrap(),
        )];
        let aggregator = DayAggregator::new(
            &tz,
            &config,
            CalendarView::WeekGrid,
            &[],
            &announcements,
            &[],
        );

        assert!(aggregator.for_day(date(2024, 2, 28)).is_empty());
        for day in [
            date(2024, 2, 29),
            date(2024, 3, 1),
            date(2024, 3, 2),
            date(2024, 3, 3),
        ] {
            assert_eq!(item_ids(&aggregator.for_day(day)), vec!["spring-menu"], "on {}", day);
        }
        assert!(aggregator.for_day(date(2024, 3, 4)).is_empty());
    }

    #[test]
    fn test_unpublished_announcement_is_hidden() {
        let tz = TimezoneReconciler::default();
        let config = CalendarConfig::default();
        let mut draft = announcement(
            "draft",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
        );
        draft.published = false;
        let announcements = vec![draft];
        let aggregator = DayAggregator::new(
            &tz,
            &config,
            CalendarView::WeekGrid,
            &[],
            &announcements,
            &[],
        );

        assert!(aggregator.for_day(date(2024, 3, 5)).is_empty());
    }

    #[test]
    fn test_month_grid_caps_are_tighter_than_week_grid() {
        let tz = TimezoneReconciler::default();
        let config = CalendarConfig::default();
        let day = date(2024, 3, 5);
        let announcements: Vec<Announcement> = (0..6)
            .map(|i| {
                announcement(
                    &format!("a{}", i),
                    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
                )
            })
            .collect();
        let occurrences: Vec<Occurrence> = (0..10)
            .map(|i| occurrence(&format!("e{}", i), day, None, false))
            .collect();

        let month = DayAggregator::new(
            &tz,
            &config,
            CalendarView::MonthGrid,
            &[],
            &announcements,
            &occurrences,
        );
        let week = DayAggregator::new(
            &tz,
            &config,
            CalendarView::WeekGrid,
            &[],
            &announcements,
            &occurrences,
        );

        assert_eq!(
            month.for_day(day).len(),
            config.month_grid_announcements + config.month_grid_events
        );
        assert_eq!(
            week.for_day(day).len(),
            config.week_grid_announcements + config.week_grid_events
        );
    }

    #[test]
    fn test_events_sort_by_category_then_recurring() {
        let tz = TimezoneReconciler::default();
        let config = CalendarConfig::default();
        let day = date(2024, 3, 5);
        let occurrences = vec![
            occurrence("plain-one-time", day, None, false),
            occurrence("plain-recurring", day, None, true),
            occurrence("holiday", day, Some(EventCategory::Holiday), false),
            occurrence("band", day, Some(EventCategory::LiveMusic), false),
        ];
        let aggregator = DayAggregator::new(
            &tz,
            &config,
            CalendarView::WeekGrid,
            &[],
            &[],
            &occurrences,
        );

        assert_eq!(
            item_ids(&aggregator.for_day(day)),
            vec!["band", "holiday", "plain-recurring", "plain-one-time"]
        );
    }

    #[test]
    fn test_concatenation_order_is_specials_announcements_events() {
        let tz = TimezoneReconciler::default();
        let config = CalendarConfig::default();
        let day = date(2024, 3, 5);
        let specials = vec![special("soup", SpecialKind::Food, every_day(), true)];
        let announcements = vec![announcement(
            "news",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
        )];
        let occurrences = vec![occurrence("dinner", day, None, true)];
        let aggregator = DayAggregator::new(
            &tz,
            &config,
            CalendarView::WeekGrid,
            &specials,
            &announcements,
            &occurrences,
        );

        assert_eq!(item_ids(&aggregator.for_day(day)), vec!["soup", "news", "dinner"]);
    }

    #[test]
    fn test_weekday_set_never_matches_when_empty() {
        let tz = TimezoneReconciler::default();
        let config = CalendarConfig::default();
        let specials = vec![special(
            "never",
            SpecialKind::Food,
            SpecialSchedule::Weekdays(WeekdaySet::empty()),
            true,
        )];
        let aggregator =
            DayAggregator::new(&tz, &config, CalendarView::WeekGrid, &specials, &[], &[]);

        assert!(aggregator.for_day(date(2024, 3, 5)).is_empty());
    }
}
