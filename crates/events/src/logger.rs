//! Writes every [`CatalogEvent`] to the tracing log.
//!
//! Generation jobs are detached from the request that started them, so this
//! listener is where their outcome becomes visible to operators.

use tokio::sync::broadcast;

use crate::bus::{CatalogEvent, EventKind};

/// Background service that logs catalog events.
pub struct EventLogger;

impl EventLogger {
    /// Run until the bus is dropped.
    pub async fn run(mut receiver: broadcast::Receiver<CatalogEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::log(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
    }

    fn log(event: &CatalogEvent) {
        let name = event.kind.as_str();
        match event.kind {
            EventKind::JobFailed => tracing::error!(
                event = name,
                job_id = %event.job_id,
                payload = %event.payload,
                "Generation job failed"
            ),
            EventKind::JobQueued | EventKind::JobStarted => tracing::debug!(
                event = name,
                job_id = %event.job_id,
                payload = %event.payload,
                "Generation job event"
            ),
            _ => tracing::info!(
                event = name,
                job_id = %event.job_id,
                payload = %event.payload,
                "Generation job event"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;
    use crate::bus::EventBus;

    #[tokio::test]
    async fn logger_stops_when_bus_is_dropped() {
        let bus = EventBus::default();
        let handle = tokio::spawn(EventLogger::run(bus.subscribe()));

        bus.publish(CatalogEvent::new(EventKind::JobFailed, Uuid::new_v4()));
        drop(bus);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("logger should exit once the bus is closed")
            .expect("logger task should not panic");
    }
}
