// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Event Bus Implementation - Pub/Sub for Solve Events
//
// Provides in-memory event streaming using tokio broadcast channels.
// The CLI progress bar and tests observe runs through it.

use crate::domain::events::{RunId, SolveEvent};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Event bus for publishing and subscribing to solve events
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<SolveEvent>>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    /// Capacity determines how many events can be buffered before dropping old ones
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create event bus with default capacity (1000)
    pub fn with_default_capacity() -> Self {
        Self::new(1000)
    }

    pub fn publish(&self, event: SolveEvent) {
        debug!("Publishing event: {:?}", event);

        // send() fails only when nobody is listening
        if self.sender.send(event).is_err() {
            debug!("No subscribers listening to event");
        }
    }

    /// Subscribe to all solve events
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe to the events of a single run
    pub fn subscribe_run(&self, run_id: RunId) -> RunEventReceiver {
        RunEventReceiver {
            receiver: self.sender.subscribe(),
            run_id,
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

fn map_recv_error(e: broadcast::error::RecvError) -> EventBusError {
    match e {
        broadcast::error::RecvError::Closed => EventBusError::Closed,
        broadcast::error::RecvError::Lagged(n) => {
            warn!("Event receiver lagged by {} events", n);
            EventBusError::Lagged(n)
        }
    }
}

/// Receiver for all solve events
pub struct EventReceiver {
    receiver: broadcast::Receiver<SolveEvent>,
}

impl EventReceiver {
    /// Receive the next event (waits until one is available)
    pub async fn recv(&mut self) -> Result<SolveEvent, EventBusError> {
        self.receiver.recv().await.map_err(map_recv_error)
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&mut self) -> Result<SolveEvent, EventBusError> {
        self.receiver.try_recv().map_err(|e| match e {
            broadcast::error::TryRecvError::Empty => EventBusError::Empty,
            broadcast::error::TryRecvError::Closed => EventBusError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => {
                warn!("Event receiver lagged by {} events", n);
                EventBusError::Lagged(n)
            }
        })
    }
}

/// Receiver filtered to one run
pub struct RunEventReceiver {
    receiver: broadcast::Receiver<SolveEvent>,
    run_id: RunId,
}

impl RunEventReceiver {
    pub async fn recv(&mut self) -> Result<SolveEvent, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(map_recv_error)?;
            if event.run_id() == self.run_id {
                return Ok(event);
            }
        }
    }
}

/// Errors that can occur when receiving events
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskId;
    use chrono::Utc;

    fn fallback(run_id: RunId, task: &str) -> SolveEvent {
        SolveEvent::TaskFallback {
            run_id,
            task_id: TaskId::new(task),
            reason: "no candidate".to_string(),
        }
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let event_bus = EventBus::new(10);
        let mut receiver = event_bus.subscribe();
        let run_id = RunId::new();

        event_bus.publish(SolveEvent::RunStarted {
            run_id,
            task_count: 3,
            started_at: Utc::now(),
        });

        match receiver.recv().await.unwrap() {
            SolveEvent::RunStarted { run_id: id, task_count, .. } => {
                assert_eq!(id, run_id);
                assert_eq!(task_count, 3);
            }
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_event_filtering() {
        let event_bus = EventBus::new(10);
        let run_id = RunId::new();
        let mut receiver = event_bus.subscribe_run(run_id);

        event_bus.publish(fallback(RunId::new(), "other"));
        event_bus.publish(fallback(run_id, "ours"));

        match receiver.recv().await.unwrap() {
            SolveEvent::TaskFallback { task_id, .. } => assert_eq!(task_id, TaskId::new("ours")),
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let event_bus = EventBus::new(10);
        let mut receiver1 = event_bus.subscribe();
        let mut receiver2 = event_bus.subscribe();
        assert_eq!(event_bus.subscriber_count(), 2);

        event_bus.publish(fallback(RunId::new(), "t"));

        assert!(receiver1.recv().await.is_ok());
        assert!(receiver2.recv().await.is_ok());
    }

    #[test]
    fn test_publish_without_subscribers_and_lag() {
        let event_bus = EventBus::new(1);
        event_bus.publish(fallback(RunId::new(), "dropped"));

        let mut receiver = event_bus.subscribe();
        assert!(matches!(receiver.try_recv(), Err(EventBusError::Empty)));

        event_bus.publish(fallback(RunId::new(), "a"));
        event_bus.publish(fallback(RunId::new(), "b"));
        assert!(matches!(receiver.try_recv(), Err(EventBusError::Lagged(1))));
        assert!(receiver.try_recv().is_ok());
    }
}
