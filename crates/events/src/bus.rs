//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`DomainEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// A lifecycle event emitted after the corresponding remote operation has
/// been acknowledged — never optimistically.
///
/// Serialized with an internally-tagged `"type"` discriminator carrying the
/// dot-separated event name, so downstream analytics can route by string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A project document was written to the store.
    #[serde(rename = "project.created")]
    ProjectCreated {
        project_id: String,
        name: String,
        owner: String,
    },

    /// A project document was deleted from the store.
    #[serde(rename = "project.deleted")]
    ProjectDeleted { project_id: String },

    /// A new account was registered with the identity provider.
    #[serde(rename = "user.signed_up")]
    UserSignedUp { uid: String },

    /// A user opened a session.
    #[serde(rename = "user.signed_in")]
    UserSignedIn { uid: String },

    /// An account and its footprint were removed.
    #[serde(rename = "account.deleted")]
    AccountDeleted { uid: String },
}

impl DomainEvent {
    /// Stable dot-separated event name (matches the serde tag).
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::ProjectCreated { .. } => "project.created",
            DomainEvent::ProjectDeleted { .. } => "project.deleted",
            DomainEvent::UserSignedUp { .. } => "user.signed_up",
            DomainEvent::UserSignedIn { .. } => "user.signed_in",
            DomainEvent::AccountDeleted { .. } => "account.deleted",
        }
    }
}

/// A published event together with its emission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(flatten)]
    pub event: DomainEvent,
    /// When the event was published (UTC).
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`DomainEvent`].
///
/// # Usage
///
/// ```rust
/// use planbase_events::{DomainEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DomainEvent::ProjectDeleted {
///     project_id: "p1".to_string(),
/// });
/// ```
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(EventEnvelope {
            event,
            timestamp: Utc::now(),
        });
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
