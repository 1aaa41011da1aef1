//! Artifact sink service
//!
//! Durable storage for the proof record produced at the end of a workflow.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tandem_core::domain::record::ProofRecord;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Errors raised while persisting a proof record
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize proof record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Service trait for persisting the final proof record
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Stores the record; returns only once it is durably written
    async fn persist(&self, record: &ProofRecord) -> Result<(), SinkError>;
}

/// Writes the record as pretty-printed JSON to a file
///
/// The file is written next to its final location first and renamed into
/// place, so readers never observe a partial record.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ArtifactSink for JsonFileSink {
    async fn persist(&self, record: &ProofRecord) -> Result<(), SinkError> {
        let bytes = serde_json::to_vec_pretty(record)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Err(e) = write_synced(&tmp, &bytes).await {
            discard(&tmp).await;
            return Err(self.io_error(e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            discard(&tmp).await;
            return Err(self.io_error(e));
        }

        info!(
            "Proof record for run {} written to {}",
            record.run_id,
            self.path.display()
        );

        Ok(())
    }
}

/// Writes `bytes` to `path` and flushes them to disk
async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

async fn discard(tmp: &Path) {
    match fs::remove_file(tmp).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            warn!("Failed to remove {}: {}", tmp.display(), e);
        }
        _ => {}
    }
}
