//! Locally cached event records.
//!
//! The UI keeps the last-fetched event collection here and re-expands
//! it on every navigation. Commands replace a cached record only after
//! the store has confirmed the corresponding write, so a failed
//! request leaves the prior state displayed.

use std::collections::HashMap;

use crate::event::EventDefinition;

#[derive(Debug, Clone, Default)]
pub struct EventCache {
    events: HashMap<String, EventDefinition>,
}

impl EventCache {
    pub fn new() -> Self {
        EventCache::default()
    }

    /// Replace the whole cache with a freshly fetched collection.
    pub fn load(&mut self, events: Vec<EventDefinition>) {
        self.events = events.into_iter().map(|e| (e.id.clone(), e)).collect();
    }

    pub fn get(&self, id: &str) -> Option<&EventDefinition> {
        self.events.get(id)
    }

    /// Replace one record with the store-confirmed version.
    pub fn replace(&mut self, event: EventDefinition) {
        self.events.insert(event.id.clone(), event);
    }

    pub fn remove(&mut self, id: &str) -> Option<EventDefinition> {
        self.events.remove(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All cached events, ordered by start instant for expansion.
    pub fn events(&self) -> Vec<EventDefinition> {
        let mut all: Vec<EventDefinition> = self.events.values().cloned().collect();
        all.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        all
    }
}
