//! Attendance event broadcasting.
//!
//! Check-ins and check-outs are published on a [`tokio::sync::broadcast`]
//! channel after they commit. Delivery is fire-and-forget: a publish with no
//! subscribers is not an error, and slow subscribers may lag.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceEventKind {
    /// A worker checked in.
    CheckIn,
    /// A worker checked out.
    CheckOut,
}

/// A committed attendance change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    /// Check-in or check-out.
    pub kind: AttendanceEventKind,
    /// The worker concerned.
    pub worker_id: String,
    /// When the change took effect.
    pub timestamp: NaiveDateTime,
    /// Lateness flag; only set for check-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_late: Option<bool>,
}

/// In-process broadcast bus for [`AttendanceEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AttendanceEvent>,
}

impl EventBus {
    /// Creates a bus that buffers up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AttendanceEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event and returns how many subscribers received it.
    pub fn publish(&self, event: AttendanceEvent) -> usize {
        let worker_id = event.worker_id.clone();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(worker_id = %worker_id, receivers, "Attendance event published");
                receivers
            }
            Err(_) => {
                debug!(worker_id = %worker_id, "Attendance event dropped, no subscribers");
                0
            }
        }
    }
}
