//! Tandem Runner
//!
//! Drives a circuit through the remote proving service: compile, then prove,
//! then persist the proof record.
//!
//! Architecture:
//! - Scheduler: the generic poller that waits on one remote job under a
//!   time budget
//! - Services: boundary collaborators (circuit packaging, record storage)
//! - Workflow: sequences the two stages and threads the compile job id into
//!   the prove request
//!
//! Stages run strictly one after the other; independent workflows share no
//! mutable state and may run concurrently.

pub mod error;
pub mod scheduler;
pub mod service;
pub mod workflow;

pub use error::{Result, WorkflowError};
pub use scheduler::{JobPoller, PollError, PollOutcome};
pub use workflow::{CompiledCircuit, Workflow};
