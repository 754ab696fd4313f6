//! Catalog API server library.
//!
//! Exposes config, state, error handling, auth, and the router builder so the
//! binary entrypoint and the integration tests assemble the same application.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
