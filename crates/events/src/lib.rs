//! COMETA activity event infrastructure.
//!
//! Mutating API handlers publish [`ActivityEvent`]s instead of writing audit
//! rows inline; the building blocks here carry them to durable storage:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ActivityEvent`] — the canonical activity envelope.
//! - [`ActivityPersistence`] — background service that durably writes every
//!   event to the `activity_logs` table.

pub mod bus;
pub mod persistence;

pub use bus::{ActivityEvent, EventBus};
pub use persistence::ActivityPersistence;
