//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the generation runner,
//! which publishes, and any number of listeners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// CatalogEvent
// ---------------------------------------------------------------------------

/// What happened to a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    JobQueued,
    JobStarted,
    CategoriesSeeded,
    JobCompleted,
    JobFailed,
    JobCancelled,
}

impl EventKind {
    /// Dot-separated event name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JobQueued => "generation.queued",
            Self::JobStarted => "generation.started",
            Self::CategoriesSeeded => "generation.categories_seeded",
            Self::JobCompleted => "generation.completed",
            Self::JobFailed => "generation.failed",
            Self::JobCancelled => "generation.cancelled",
        }
    }

    /// Whether the job can emit no further events after this one.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::JobCompleted | Self::JobFailed | Self::JobCancelled)
    }
}

/// A lifecycle event of one generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    pub kind: EventKind,
    pub job_id: Uuid,
    /// Event-specific data, e.g. `{"created": 5}`.
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl CatalogEvent {
    /// Create an event with an empty payload.
    pub fn new(kind: EventKind, job_id: Uuid) -> Self {
        Self {
            kind,
            job_id,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest unread events are dropped and slow
/// receivers observe `RecvError::Lagged`.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: CatalogEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
