//! Domain event system: decoupled notification of transcript changes.
//!
//! The session publishes events when something interesting happens; a front
//! end can subscribe to refresh its projection of the transcript.

use crate::error::ErrorKind;
use crate::turn::{TurnId, TurnRole};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A turn was appended to the transcript
    TurnAppended {
        id: TurnId,
        role: TurnRole,
        timestamp: DateTime<Utc>,
    },

    /// A user turn was edited
    TurnEdited {
        id: TurnId,
        newly_stale: Vec<TurnId>,
        timestamp: DateTime<Utc>,
    },

    /// A live lookup completed (possibly with no hits)
    SearchPerformed {
        query: String,
        results: usize,
        timestamp: DateTime<Utc>,
    },

    /// The completion service produced a reply
    ResponseGenerated {
        model: String,
        tokens_used: Option<u32>,
        timestamp: DateTime<Utc>,
    },

    /// The transcript was cleared
    TranscriptReset { timestamp: DateTime<Utc> },

    /// A failure was recovered and shown to the user as a turn
    ErrorOccurred {
        kind: ErrorKind,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::TurnEdited {
            id: TurnId(1),
            newly_stale: vec![TurnId(2)],
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::TurnEdited { id, newly_stale, .. } => {
                assert_eq!(*id, TurnId(1));
                assert_eq!(newly_stale, &vec![TurnId(2)]);
            }
            other => panic!("Expected TurnEdited event, got {other:?}"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::TranscriptReset {
            timestamp: Utc::now(),
        });
    }
}
