//! Request extractors for authentication.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer access token.

pub mod auth;
