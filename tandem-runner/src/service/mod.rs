//! Service layer
//!
//! Boundary collaborators of the workflow: packaging circuit sources into an
//! uploadable archive, and persisting the final proof record.
//!
//! All services are trait-based to enable testing and dependency injection.

mod packaging;
mod sink;

// Re-export traits
pub use packaging::Packager;
pub use sink::{ArtifactSink, SinkError};

// Re-export implementations
pub use packaging::{ArchiveFile, DirectoryPackager, packager_for};
pub use sink::JsonFileSink;
