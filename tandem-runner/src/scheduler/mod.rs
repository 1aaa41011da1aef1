//! Scheduler layer for the runner
//!
//! This layer handles waiting on remote jobs. It owns the timing contract
//! (interval, budget, cancellation) but knows nothing about job kinds.

pub mod poller;

pub use poller::{JobPoller, PollError, PollOutcome};
