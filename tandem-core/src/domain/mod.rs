//! Core domain types
//!
//! These types are shared between the HTTP client (which produces job
//! snapshots) and the runner (which polls them and persists the outcome).

pub mod job;
pub mod policy;
pub mod record;
