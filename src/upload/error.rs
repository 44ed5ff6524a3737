//! Upload pipeline errors.

use thiserror::Error;

use super::service::UploadStage;

/// Reasons an upload did not reach `Success`.
///
/// The first four are client-correctable and end in `Rejected`; the last two
/// are server-side and end in `Failed`.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The request carried no file part.
    #[error("No file uploaded")]
    NoFileProvided,

    /// Declared extension or MIME type is not on the allow-list.
    #[error("Only image files ({allowed}) are allowed")]
    UnsupportedFileType {
        /// Comma-separated allow-list, as shown to the user.
        allowed: String,
    },

    /// The file exceeded the configured byte cap.
    #[error("File too large (max {})", format_limit(*.limit))]
    FileTooLarge {
        /// The cap in bytes.
        limit: u64,
    },

    /// The multipart body could not be parsed.
    #[error("Invalid upload request: {0}")]
    MalformedUpload(String),

    /// Writing the blob to disk failed.
    #[error("failed to write blob: {0}")]
    BlobWriteFailure(#[source] std::io::Error),

    /// Inserting the file record failed.
    #[error("failed to persist file record: {0}")]
    PersistenceFailure(String),
}

impl UploadError {
    /// Terminal state this error leads to.
    pub fn terminal_stage(&self) -> UploadStage {
        if self.is_client_error() {
            UploadStage::Rejected
        } else {
            UploadStage::Failed
        }
    }

    /// Whether the client can correct the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UploadError::NoFileProvided
                | UploadError::UnsupportedFileType { .. }
                | UploadError::FileTooLarge { .. }
                | UploadError::MalformedUpload(_)
        )
    }
}

/// Render a byte limit the way the form shows it ("5MB", "512KB", "100 bytes").
pub(crate) fn format_limit(limit: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if limit >= MB && limit % MB == 0 {
        format!("{}MB", limit / MB)
    } else if limit >= KB && limit % KB == 0 {
        format!("{}KB", limit / KB)
    } else {
        format!("{limit} bytes")
    }
}
