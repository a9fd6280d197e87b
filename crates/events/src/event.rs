use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fact emitted by an aggregate.
///
/// Type names are dotted and start with the owning domain
/// (e.g. "sales.order.line_added").
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier.
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Metadata of an applied event, kept as an audit trail per aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// 1-based position in the aggregate's history.
    pub sequence: u64,
    pub event_type: String,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
}

impl RecordedEvent {
    pub fn from_event<E: Event>(sequence: u64, event: &E) -> Self {
        Self {
            sequence,
            event_type: event.event_type().to_string(),
            version: event.version(),
            occurred_at: event.occurred_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Pinged(DateTime<Utc>);

    impl Event for Pinged {
        fn event_type(&self) -> &'static str {
            "test.pinged"
        }

        fn version(&self) -> u32 {
            2
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn recorded_event_copies_metadata() {
        let at = Utc::now();
        let recorded = RecordedEvent::from_event(3, &Pinged(at));
        assert_eq!(recorded.sequence, 3);
        assert_eq!(recorded.event_type, "test.pinged");
        assert_eq!(recorded.version, 2);
        assert_eq!(recorded.occurred_at, at);
    }
}
