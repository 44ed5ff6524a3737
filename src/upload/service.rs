//! Upload service for imgdrop.
//!
//! Drives a single upload through the pipeline:
//!
//! ```text
//! Idle → Receiving → Validating → WritingBlob → PersistingMetadata → Success
//!            │            │             │                │
//!            └─ Rejected ─┘             └──── Failed ────┘
//! ```
//!
//! The blob is always written before the record insert is attempted, so a
//! record never points at a blob that failed to write. The reverse gap
//! (blob written, insert failed) leaves an orphaned blob, which is logged.

use tracing::{debug, error, info, warn};

use super::error::UploadError;
use super::policy::IntakePolicy;
use super::record::{FileRecord, MetadataStore, NewFileRecord};
use super::storage::BlobStore;

/// A file part received from the client.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Client-supplied filename.
    pub filename: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File content.
    pub content: Vec<u8>,
}

impl IncomingFile {
    /// Create a new incoming file.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content,
        }
    }
}

/// Pipeline stage of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    /// Nothing received yet.
    Idle,
    /// Reading the request body.
    Receiving,
    /// Checking the declared type against the policy.
    Validating,
    /// Writing the blob to disk.
    WritingBlob,
    /// Inserting the file record.
    PersistingMetadata,
    /// Blob written and record stored.
    Success,
    /// Refused for a reason the client can correct.
    Rejected,
    /// Failed on the server side.
    Failed,
}

impl UploadStage {
    /// Stage name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStage::Idle => "idle",
            UploadStage::Receiving => "receiving",
            UploadStage::Validating => "validating",
            UploadStage::WritingBlob => "writing_blob",
            UploadStage::PersistingMetadata => "persisting_metadata",
            UploadStage::Success => "success",
            UploadStage::Rejected => "rejected",
            UploadStage::Failed => "failed",
        }
    }

    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStage::Success | UploadStage::Rejected | UploadStage::Failed
        )
    }
}

impl std::fmt::Display for UploadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs one upload against a policy, a blob store and a metadata store.
pub struct UploadService<'a, M> {
    policy: &'a IntakePolicy,
    blobs: &'a BlobStore,
    store: M,
    stage: UploadStage,
    filename: Option<String>,
}

impl<'a, M: MetadataStore> UploadService<'a, M> {
    /// Create a new UploadService in the `Idle` stage.
    pub fn new(policy: &'a IntakePolicy, blobs: &'a BlobStore, store: M) -> Self {
        Self {
            policy,
            blobs,
            store,
            stage: UploadStage::Idle,
            filename: None,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> UploadStage {
        self.stage
    }

    /// Size cap of the policy this upload runs under.
    pub fn max_size(&self) -> u64 {
        self.policy.max_size()
    }

    /// Enter `Receiving` before the transport reads the request body.
    ///
    /// Errors raised while reading are then reported from `Receiving`
    /// through [`UploadService::abort`].
    pub fn start_receiving(&mut self) {
        if self.stage == UploadStage::Idle {
            self.enter(UploadStage::Receiving);
        }
    }

    /// Process a received file part (`None` when the request had none).
    ///
    /// # Returns
    /// The created file record.
    pub async fn process(
        &mut self,
        incoming: Option<IncomingFile>,
    ) -> Result<FileRecord, UploadError> {
        self.start_receiving();

        let file = match incoming {
            Some(file) => file,
            None => return Err(self.abort(UploadError::NoFileProvided)),
        };
        self.filename = Some(file.filename.clone());

        // Size is a receive-time limit; it is checked before any type rule.
        if let Err(e) = self.policy.check_size(file.content.len() as u64) {
            return Err(self.abort(e));
        }

        self.enter(UploadStage::Validating);
        if let Err(e) = self.policy.check_type(&file.filename, &file.content_type) {
            return Err(self.abort(e));
        }

        self.enter(UploadStage::WritingBlob);
        let blob = match self.blobs.store(&file.content, &file.filename).await {
            Ok(blob) => blob,
            Err(e) => return Err(self.abort(UploadError::BlobWriteFailure(e))),
        };
        debug!(
            filename = %file.filename,
            path = %blob.disk_path.display(),
            "Blob written"
        );

        self.enter(UploadStage::PersistingMetadata);
        let new_record =
            NewFileRecord::new(file.filename, blob.filepath, file.content_type, blob.size as i64);

        match self.store.insert(&new_record).await {
            Ok(record) => {
                self.enter(UploadStage::Success);
                info!(
                    id = record.id,
                    filename = %record.filename,
                    filepath = %record.filepath,
                    size = record.size,
                    "File uploaded"
                );
                Ok(record)
            }
            Err(e) => {
                warn!(
                    path = %blob.disk_path.display(),
                    "Orphaned blob left on disk after failed record insert"
                );
                Err(self.abort(UploadError::PersistenceFailure(e.to_string())))
            }
        }
    }

    /// Move to the terminal stage for `err` and hand the error back.
    ///
    /// Also used by the transport when receiving the body fails.
    pub fn abort(&mut self, err: UploadError) -> UploadError {
        let from = self.stage;
        self.stage = err.terminal_stage();
        let filename = self.filename.as_deref().unwrap_or("-");

        if err.is_client_error() {
            debug!(from = %from, to = %self.stage, filename, "Upload rejected: {}", err);
        } else {
            error!(from = %from, to = %self.stage, filename, "Upload failed: {}", err);
        }

        err
    }

    fn enter(&mut self, next: UploadStage) {
        debug!(
            from = %self.stage,
            to = %next,
            filename = self.filename.as_deref().unwrap_or("-"),
            "Upload stage transition"
        );
        self.stage = next;
    }
}
