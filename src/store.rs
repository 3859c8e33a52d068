//! External store interfaces.
//!
//! Persistence lives outside this crate. These traits are the shape of
//! the collaborator: the calendar only reads the collections and, for
//! reschedule and occurrence deletion, submits a narrow update back.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::CalendarResult;
use crate::event::{Announcement, DatedSpecial, EventDefinition};

/// Partial update for an event's instants. Fields left `None` are
/// untouched by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn events_in_range(&self, range: &DateRange) -> CalendarResult<Vec<EventDefinition>>;

    async fn event(&self, id: &str) -> CalendarResult<Option<EventDefinition>>;

    /// Apply a partial update and return the stored record as the
    /// store now sees it.
    async fn update_event(&self, id: &str, patch: &EventPatch) -> CalendarResult<EventDefinition>;

    /// Atomically append one exception date to a recurring event and
    /// return the updated record. Atomic at the store so two
    /// concurrent "delete this occurrence" requests cannot clobber
    /// each other.
    async fn append_exception(&self, id: &str, date: NaiveDate) -> CalendarResult<EventDefinition>;
}

#[async_trait]
pub trait SpecialStore: Send + Sync {
    async fn specials(&self) -> CalendarResult<Vec<DatedSpecial>>;
}

#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    async fn announcements(&self) -> CalendarResult<Vec<Announcement>>;
}
