//! In-process event bus for catalog background work.
//!
//! - [`EventBus`] -- publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`CatalogEvent`] -- lifecycle event emitted by generation jobs.
//! - [`EventLogger`] -- background task that writes every event to the log.

pub mod bus;
pub mod logger;

pub use bus::{CatalogEvent, EventBus, EventKind};
pub use logger::EventLogger;
