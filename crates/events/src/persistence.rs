//! Durable activity persistence service.
//!
//! [`ActivityPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and writes every received [`ActivityEvent`] to the
//! `activity_logs` table. It runs as a long-lived background task and shuts
//! down gracefully when the bus sender is dropped.

use cometa_core::types::DbId;
use cometa_db::models::activity::NewActivityLog;
use cometa_db::repositories::ActivityRepo;
use cometa_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::ActivityEvent;

/// Background service that persists activity events to the database.
pub struct ActivityPersistence;

impl ActivityPersistence {
    /// Run the persistence loop.
    ///
    /// Subscribes to the event bus via the provided `receiver` and persists
    /// every event it receives. The loop exits when the channel is closed
    /// (i.e. the [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<ActivityEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            activity_type = %event.activity_type,
                            "Failed to persist activity event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Activity persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, activity persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write a single event to the `activity_logs` table.
    async fn persist(pool: &DbPool, event: &ActivityEvent) -> Result<DbId, sqlx::Error> {
        ActivityRepo::insert(
            pool,
            &NewActivityLog {
                user_id: event.actor_user_id,
                project_id: event.project_id,
                activity_type: event.activity_type.clone(),
                description: event.description.clone(),
                target_type: event.target_type.clone(),
                target_id: event.target_id,
                payload: event.payload.clone(),
            },
        )
        .await
    }
}
