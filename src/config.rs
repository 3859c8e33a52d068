//! Calendar display configuration.

use serde::{Deserialize, Serialize};

use crate::agenda::CalendarView;
use crate::error::{CalendarError, CalendarResult};
use crate::timezone::TimezoneReconciler;

fn default_display_zone() -> String {
    "America/Denver".to_string()
}

fn default_month_grid_announcements() -> usize {
    2
}

fn default_month_grid_events() -> usize {
    3
}

fn default_week_grid_announcements() -> usize {
    4
}

fn default_week_grid_events() -> usize {
    8
}

/// Display zone and per-view item caps.
///
/// The dense month grid shows fewer items per day than the week grid;
/// both caps are configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// IANA name of the fixed display zone.
    #[serde(default = "default_display_zone")]
    pub display_zone: String,

    #[serde(default = "default_month_grid_announcements")]
    pub month_grid_announcements: usize,
    #[serde(default = "default_month_grid_events")]
    pub month_grid_events: usize,
    #[serde(default = "default_week_grid_announcements")]
    pub week_grid_announcements: usize,
    #[serde(default = "default_week_grid_events")]
    pub week_grid_events: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            display_zone: default_display_zone(),
            month_grid_announcements: default_month_grid_announcements(),
            month_grid_events: default_month_grid_events(),
            week_grid_announcements: default_week_grid_announcements(),
            week_grid_events: default_week_grid_events(),
        }
    }
}

impl CalendarConfig {
    pub fn from_toml_str(content: &str) -> CalendarResult<Self> {
        toml::from_str(content).map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// Build the reconciler for the configured display zone.
    pub fn reconciler(&self) -> CalendarResult<TimezoneReconciler> {
        TimezoneReconciler::from_name(&self.display_zone)
    }

    pub fn announcement_cap(&self, view: CalendarView) -> usize {
        match view {
            CalendarView::MonthGrid => self.month_grid_announcements,
            CalendarView::WeekGrid => self.week_grid_announcements,
        }
    }

    pub fn event_cap(&self, view: CalendarView) -> usize {
        match view {
            CalendarView::MonthGrid => self.month_grid_events,
            CalendarView::WeekGrid => self.week_grid_events,
        }
    }
}
