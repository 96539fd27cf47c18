//! Caller identity for the chirps feature.
//!
//! Token validation and session handling are owned by an upstream gateway;
//! this module only models the identity that gateway forwards.

pub mod model;

pub use model::AuthenticatedUser;
