//! Domain types, errors, and pure business rules for the catalog backend.
//!
//! Nothing in this crate touches the database or the network, so it can be
//! shared by the repository layer, the generator runner, and the API.

pub mod error;
pub mod export;
pub mod generation;
pub mod types;
