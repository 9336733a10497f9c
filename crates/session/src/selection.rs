//! Event selection gate for event-scoped roles.
//!
//! Sessions whose role is limited to assigned events must pick exactly one
//! event before entering the protected area. The choice lives in memory
//! only: a reload forces reselection.

use parking_lot::RwLock;

use eventdesk_core::EventSummary;

/// Holds the event an event-scoped session is currently working.
///
/// Owned by the session store, which is the only writer: selection is
/// validated against the session's assigned events there, and the gate is
/// cleared on both login and logout.
#[derive(Debug, Default)]
pub struct EventSelectionGate {
    selected: RwLock<Option<EventSummary>>,
}

impl EventSelectionGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The chosen event, if one has been selected this process lifetime.
    pub fn selected(&self) -> Option<EventSummary> {
        self.selected.read().clone()
    }

    /// Whether an event has been chosen.
    pub fn has_selection(&self) -> bool {
        self.selected.read().is_some()
    }

    pub(crate) fn select(&self, event: EventSummary) {
        *self.selected.write() = Some(event);
    }

    pub(crate) fn clear(&self) {
        *self.selected.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eventdesk_core::EventId;

    fn event(name: &str) -> EventSummary {
        EventSummary {
            id: EventId::new(),
            name: name.to_string(),
            location: "Berlin".to_string(),
            date: Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 9, 1, 17, 0, 0).unwrap(),
            max_attendees: 100,
        }
    }

    #[test]
    fn starts_empty_and_clears() {
        let gate = EventSelectionGate::new();
        assert!(!gate.has_selection());

        gate.select(event("Expo"));
        assert!(gate.has_selection());
        assert_eq!(gate.selected().unwrap().name, "Expo");

        gate.clear();
        assert!(gate.selected().is_none());
    }

    #[test]
    fn reselection_replaces_the_choice() {
        let gate = EventSelectionGate::new();
        gate.select(event("First"));
        gate.select(event("Second"));
        assert_eq!(gate.selected().unwrap().name, "Second");
    }
}
