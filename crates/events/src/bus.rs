//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`ActivityEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use cometa_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ActivityEvent
// ---------------------------------------------------------------------------

/// A domain activity that occurred on the platform.
///
/// Constructed via [`ActivityEvent::new`] and enriched with the builder
/// methods [`with_actor`](ActivityEvent::with_actor),
/// [`with_project`](ActivityEvent::with_project),
/// [`with_target`](ActivityEvent::with_target), and
/// [`with_payload`](ActivityEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Dot-separated activity name, e.g. `"work_entry.approved"`.
    pub activity_type: String,

    /// Human-readable description for the activity feed.
    pub description: String,

    /// Optional id of the user that triggered the activity.
    pub actor_user_id: Option<DbId>,

    /// Optional project the activity belongs to.
    pub project_id: Option<DbId>,

    /// Optional target entity kind (e.g. `"work_entry"`, `"material"`).
    pub target_type: Option<String>,

    /// Optional target entity database id.
    pub target_id: Option<DbId>,

    /// Free-form JSON payload carrying activity-specific data.
    pub payload: serde_json::Value,

    /// When the activity occurred (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Create a new event with the required type and description.
    ///
    /// All optional fields default to `None` / empty object.
    pub fn new(activity_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            activity_type: activity_type.into(),
            description: description.into(),
            actor_user_id: None,
            project_id: None,
            target_type: None,
            target_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Attach the project the activity belongs to.
    pub fn with_project(mut self, project_id: DbId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Attach a target entity to the event.
    pub fn with_target(mut self, target_type: impl Into<String>, target_id: DbId) -> Self {
        self.target_type = Some(target_type.into());
        self.target_id = Some(target_id);
        self
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
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ActivityEvent`].
pub struct EventBus {
    sender: broadcast::Sender<ActivityEvent>,
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
    pub fn publish(&self, event: ActivityEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = ActivityEvent::new("project.created", "Project Nord created")
            .with_actor(7)
            .with_project(42)
            .with_target("project", 42)
            .with_payload(serde_json::json!({"name": "Nord"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.activity_type, "project.created");
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.project_id, Some(42));
        assert_eq!(received.target_type.as_deref(), Some("project"));
        assert_eq!(received.payload["name"], "Nord");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ActivityEvent::new("multi.test", "fan-out"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.activity_type, "multi.test");
        assert_eq!(e2.activity_type, "multi.test");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers — this must not panic.
        bus.publish(ActivityEvent::new("orphan.event", "nobody listens"));
    }

    #[test]
    fn default_event_has_empty_optional_fields() {
        let event = ActivityEvent::new("bare.event", "minimal");
        assert!(event.actor_user_id.is_none());
        assert!(event.project_id.is_none());
        assert!(event.target_type.is_none());
        assert!(event.target_id.is_none());
        assert!(event.payload.is_object());
    }
}
