// Event Bus Implementation - Pub/Sub for Run Progress Events
//
// Provides in-memory event streaming using tokio broadcast channels.
// This is the hook the progress interface builds on: the loop publishes one
// snapshot per completed iteration plus run start/termination events, and
// external observers (CLI progress view, push channels) subscribe, keyed by
// run identifier. In-memory only; events are lost on restart.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::events::RunEvent;
use crate::domain::run::RunId;

/// Event bus for publishing and subscribing to run events.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<RunEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity. Capacity
    /// determines how many events can be buffered before old ones drop.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish a run event to all subscribers.
    pub fn publish(&self, event: RunEvent) {
        debug!(run_id = %event.run_id(), "publishing run event");

        // send() errors only when there are no receivers; publishing with
        // nobody listening is normal for embedded runs.
        let receivers = self.sender.send(event).unwrap_or(0);
        if receivers == 0 {
            debug!("no subscribers listening to run events");
        }
    }

    /// Subscribe to all run events.
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe to events for a single run only.
    pub fn subscribe_run(&self, run_id: RunId) -> RunEventReceiver {
        RunEventReceiver {
            receiver: self.sender.subscribe(),
            run_id,
        }
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Receiver for all run events.
pub struct EventReceiver {
    receiver: broadcast::Receiver<RunEvent>,
}

impl EventReceiver {
    /// Receive the next event, waiting until one is available.
    pub async fn recv(&mut self) -> Result<RunEvent, EventBusError> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => EventBusError::Closed,
            broadcast::error::RecvError::Lagged(n) => {
                warn!("event receiver lagged by {} events", n);
                EventBusError::Lagged(n)
            }
        })
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&mut self) -> Result<RunEvent, EventBusError> {
        self.receiver.try_recv().map_err(|e| match e {
            broadcast::error::TryRecvError::Empty => EventBusError::Empty,
            broadcast::error::TryRecvError::Closed => EventBusError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => {
                warn!("event receiver lagged by {} events", n);
                EventBusError::Lagged(n)
            }
        })
    }
}

/// Receiver filtered to a single run's events.
pub struct RunEventReceiver {
    receiver: broadcast::Receiver<RunEvent>,
    run_id: RunId,
}

impl RunEventReceiver {
    /// Receive the next event for this run, skipping other runs' events.
    pub async fn recv(&mut self) -> Result<RunEvent, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(|e| match e {
                broadcast::error::RecvError::Closed => EventBusError::Closed,
                broadcast::error::RecvError::Lagged(n) => {
                    warn!("event receiver lagged by {} events", n);
                    EventBusError::Lagged(n)
                }
            })?;

            if event.run_id() == self.run_id {
                return Ok(event);
            }
        }
    }
}

/// Errors that can occur when receiving events.
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blackboard::Blackboard;
    use chrono::Utc;

    fn started(run_id: RunId) -> RunEvent {
        RunEvent::RunStarted {
            run_id,
            request: "user: check the windows".to_string(),
            started_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new(10);
        let mut receiver = bus.subscribe();

        let run_id = RunId::new();
        bus.publish(started(run_id));

        match receiver.recv().await.unwrap() {
            RunEvent::RunStarted { run_id: id, .. } => assert_eq!(id, run_id),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_filtering() {
        let bus = EventBus::new(10);
        let run_id = RunId::new();
        let other_run = RunId::new();

        let mut receiver = bus.subscribe_run(run_id);

        bus.publish(started(other_run));
        bus.publish(RunEvent::IterationCompleted {
            run_id,
            iteration: 1,
            blackboard: Blackboard::new(),
            completed_at: Utc::now(),
        });

        match receiver.recv().await.unwrap() {
            RunEvent::IterationCompleted { run_id: id, iteration, .. } => {
                assert_eq!(id, run_id);
                assert_eq!(iteration, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers_all_receive() {
        let bus = EventBus::new(10);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(started(RunId::new()));

        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }

    #[test]
    fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut receiver = bus.subscribe();
        assert!(matches!(receiver.try_recv(), Err(EventBusError::Empty)));
    }
}
