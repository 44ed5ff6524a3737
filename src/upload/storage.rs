//! Blob storage for uploaded files.
//!
//! Blobs are written flat into the upload directory:
//! ```text
//! {upload_dir}/
//! ├── 1718000000000-photo.png
//! └── 1718000000123-cat.gif
//! ```
//! The same name uploaded twice within one millisecond maps to the same
//! blob; the later write wins.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// Build the stored name for an upload: `<timestamp_millis>-<basename>`.
///
/// Directory components a client may include in the name are dropped, so
/// the blob always lands directly inside the upload directory.
pub fn generate_name(original_name: &str, timestamp_millis: i64) -> String {
    let basename = original_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("file");

    format!("{timestamp_millis}-{basename}")
}

/// A blob that has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Generated file name inside the upload directory.
    pub name: String,
    /// Public path the blob is served under, e.g. `/uploads/<name>`.
    pub filepath: String,
    /// Location on disk.
    pub disk_path: PathBuf,
    /// Number of bytes written.
    pub size: u64,
}

/// Filesystem-backed writer for uploaded bytes.
#[derive(Debug, Clone)]
pub struct BlobStore {
    dir: PathBuf,
    public_prefix: String,
}

impl BlobStore {
    /// Create a store writing into `dir`, served under `public_prefix`.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();

        Ok(Self { dir, public_prefix })
    }

    /// Directory blobs are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// URL prefix blobs are served under.
    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Public path for a stored name.
    pub fn public_path(&self, name: &str) -> String {
        format!("{}/{}", self.public_prefix, name)
    }

    /// Disk location for a stored name.
    pub fn disk_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write `content` under `generated_name`, replacing any existing blob.
    pub async fn write(&self, content: &[u8], generated_name: &str) -> io::Result<StoredBlob> {
        let disk_path = self.disk_path(generated_name);
        tokio::fs::write(&disk_path, content).await?;

        Ok(StoredBlob {
            name: generated_name.to_string(),
            filepath: self.public_path(generated_name),
            disk_path,
            size: content.len() as u64,
        })
    }

    /// Write `content` under a name generated from the current time.
    pub async fn store(&self, content: &[u8], original_name: &str) -> io::Result<StoredBlob> {
        let name = generate_name(original_name, Utc::now().timestamp_millis());
        self.write(content, &name).await
    }

    /// Check whether a blob exists.
    pub fn exists(&self, name: &str) -> bool {
        self.disk_path(name).is_file()
    }
}
