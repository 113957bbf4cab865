use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{errors::ServiceError, models::unloading::UnloadingStatus};

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), ServiceError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| ServiceError::EventError(format!("Failed to send event: {}", e)))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    ///
    /// Domain events are emitted after the transaction committed, so a dead
    /// consumer must not turn a persisted change into an error response.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Dropping domain event: {}", e);
        }
    }
}

/// Domain events raised by unloading operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    UnloadingCreated {
        unloading_id: Uuid,
        freight_id: Uuid,
    },
    UnloadingUpdated(Uuid),
    UnloadingDeleted {
        unloading_id: Uuid,
        stages_removed: u64,
    },
    UnloadingStageAdded {
        unloading_id: Uuid,
        stage_id: Uuid,
        stage_volume: Decimal,
    },
    UnloadingStageUpdated {
        unloading_id: Uuid,
        stage_id: Uuid,
    },
    UnloadingStageRemoved {
        unloading_id: Uuid,
        stage_id: Uuid,
    },
    UnloadingStatusChanged {
        unloading_id: Uuid,
        old_status: UnloadingStatus,
        new_status: UnloadingStatus,
    },
    UnloadingCompleted(Uuid),
    UnloadingOverDelivered {
        unloading_id: Uuid,
        total_volume: Decimal,
        discharged_volume: Decimal,
    },
}

// Handlers implementing this trait process events asynchronously.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle_event(&self, event: &Event) -> Result<(), String>;
}

/// Writes every event to the log.
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn handle_event(&self, event: &Event) -> Result<(), String> {
        match event {
            Event::UnloadingCreated {
                unloading_id,
                freight_id,
            } => info!(%unloading_id, %freight_id, "Unloading created"),
            Event::UnloadingUpdated(unloading_id) => info!(%unloading_id, "Unloading updated"),
            Event::UnloadingDeleted {
                unloading_id,
                stages_removed,
            } => info!(%unloading_id, stages_removed, "Unloading deleted"),
            Event::UnloadingStageAdded {
                unloading_id,
                stage_id,
                stage_volume,
            } => info!(%unloading_id, %stage_id, %stage_volume, "Unloading stage added"),
            Event::UnloadingStageUpdated {
                unloading_id,
                stage_id,
            } => info!(%unloading_id, %stage_id, "Unloading stage updated"),
            Event::UnloadingStageRemoved {
                unloading_id,
                stage_id,
            } => info!(%unloading_id, %stage_id, "Unloading stage removed"),
            Event::UnloadingStatusChanged {
                unloading_id,
                old_status,
                new_status,
            } => info!(%unloading_id, %old_status, %new_status, "Unloading status changed"),
            Event::UnloadingCompleted(unloading_id) => info!(%unloading_id, "Unloading completed"),
            Event::UnloadingOverDelivered {
                unloading_id,
                total_volume,
                discharged_volume,
            } => warn!(
                %unloading_id,
                %total_volume,
                %discharged_volume,
                "Discharged volume exceeds declared total"
            ),
        }
        Ok(())
    }
}

/// Drains the channel, dispatching each event to the logging handler.
pub async fn process_events(rx: mpsc::Receiver<Event>) {
    let handlers: Vec<Arc<dyn EventHandler>> = vec![Arc::new(LoggingEventHandler)];
    process_events_with_handlers(rx, handlers).await
}

pub async fn process_events_with_handlers(
    mut rx: mpsc::Receiver<Event>,
    handlers: Vec<Arc<dyn EventHandler>>,
) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        for handler in &handlers {
            if let Err(e) = handler.handle_event(&event).await {
                error!("Failed to handle event {:?}: {}", event, e);
            }
        }
    }

    warn!("Event processing loop has ended");
}
