//! Packaging service
//!
//! Turns circuit sources into the gzipped tarball uploaded to the compile
//! stage.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use tandem_core::domain::job::ArtifactPayload;
use tokio::fs;
use tracing::debug;

/// Service trait producing the compile-stage upload
#[async_trait]
pub trait Packager: Send + Sync {
    /// Builds the archive bytes and the file name to announce with them
    async fn package(&self) -> io::Result<ArtifactPayload>;
}

/// Packs a circuit directory into `<dir>.tar.gz`
///
/// Entries are stored under the directory's own name (`circuit/...`), the
/// layout the proving service expects.
pub struct DirectoryPackager {
    dir: PathBuf,
}

impl DirectoryPackager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn folder_name(&self) -> String {
        self.dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "circuit".to_string())
    }
}

#[async_trait]
impl Packager for DirectoryPackager {
    async fn package(&self) -> io::Result<ArtifactPayload> {
        if !fs::metadata(&self.dir).await.is_ok_and(|meta| meta.is_dir()) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", self.dir.display()),
            ));
        }

        let folder = self.folder_name();

        // Walking and compressing the tree is blocking work
        let bytes = {
            let (folder, dir) = (folder.clone(), self.dir.clone());
            tokio::task::spawn_blocking(move || archive_dir(&folder, &dir))
                .await
                .map_err(io::Error::other)??
        };

        debug!(
            "Packaged {} into {} bytes",
            self.dir.display(),
            bytes.len()
        );

        Ok(ArtifactPayload::new(format!("{}.tar.gz", folder), bytes))
    }
}

fn archive_dir(folder: &str, dir: &Path) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    builder.append_dir_all(folder, dir)?;
    builder.into_inner()?.finish()
}

/// Uploads an archive that was built ahead of time
pub struct ArchiveFile {
    path: PathBuf,
}

impl ArchiveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Packager for ArchiveFile {
    async fn package(&self) -> io::Result<ArtifactPayload> {
        let bytes = fs::read(&self.path).await?;
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "circuit.tar.gz".to_string());

        Ok(ArtifactPayload::new(file_name, bytes))
    }
}

/// Picks a packager for `path`: directories are archived, files uploaded as-is
pub fn packager_for(path: &Path) -> Box<dyn Packager> {
    if path.is_dir() {
        Box::new(DirectoryPackager::new(path))
    } else {
        Box::new(ArchiveFile::new(path))
    }
}
