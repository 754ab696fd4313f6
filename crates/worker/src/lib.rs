//! Background generation of synthetic catalog data.
//!
//! [`GenerationRunner`] accepts jobs, runs them on the tokio runtime with
//! bounded concurrency, and exposes each job through a [`JobHandle`] and a
//! [`JobSnapshot`]. Lifecycle events are published on the shared
//! [`ecom_events::EventBus`].

pub mod config;
pub mod job;
pub mod runner;

pub use config::GeneratorConfig;
pub use job::{JobHandle, JobSnapshot, JobState};
pub use runner::{GenerationError, GenerationRunner};
