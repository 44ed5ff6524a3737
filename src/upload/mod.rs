//! Image upload intake for imgdrop.
//!
//! This module contains the upload pipeline:
//! - Intake policy (declared extension, MIME type and size)
//! - Blob storage with timestamp-prefixed naming
//! - File record persistence
//! - The upload service tying them together

mod error;
mod policy;
mod record;
mod service;
mod storage;

pub use error::UploadError;
pub use policy::IntakePolicy;
pub use record::{FileRecord, FileRecordRepository, MetadataStore, NewFileRecord, UnavailableStore};
pub use service::{IncomingFile, UploadService, UploadStage};
pub use storage::{generate_name, BlobStore, StoredBlob};

/// Default maximum upload size (5MB).
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 5 * 1024 * 1024;

/// Default accepted image types.
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// MIME type assumed when the client does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
