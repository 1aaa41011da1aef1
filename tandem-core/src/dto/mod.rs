//! Data Transfer Objects for the remote proving API
//!
//! DTOs mirror the JSON bodies sent to and received from the service. They are
//! converted into domain types at the client boundary.

pub mod job;
