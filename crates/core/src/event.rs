//! Event read model as delivered inside access-token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::EventId;

/// Summary of an event the caller has been assigned to.
///
/// This mirrors the wire shape of the `assignedEvents` token claim. The
/// client treats it as read-only display data; the backend remains the
/// authority for everything about the event itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: EventId,
    pub name: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_attendees: u32,
}

impl EventSummary {
    /// Whether the event spans more than one calendar day.
    pub fn is_multi_day(&self) -> bool {
        self.end_date.date_naive() > self.date.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> EventSummary {
        EventSummary {
            id: EventId::new(),
            name: "Annual Partner Summit".to_string(),
            location: "Vienna".to_string(),
            date: Utc.with_ymd_and_hms(2025, 6, 12, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 6, 13, 17, 0, 0).unwrap(),
            max_attendees: 400,
        }
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("endDate").is_some());
        assert!(json.get("maxAttendees").is_some());
        assert!(json.get("end_date").is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let event = sample();
        let json = serde_json::to_string(&event).unwrap();
        let back: EventSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn multi_day_detection() {
        let mut event = sample();
        assert!(event.is_multi_day());
        event.end_date = event.date;
        assert!(!event.is_multi_day());
    }
}
