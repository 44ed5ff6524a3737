//! File record types and repository.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::db::DbPool;
use crate::{ImgdropError, Result};

/// Metadata for one stored upload.
///
/// Records are never updated or deleted once inserted.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique record ID.
    pub id: i64,
    /// Original client-supplied filename.
    pub filename: String,
    /// Public path of the blob (e.g. `/uploads/1718000000000-photo.png`).
    pub filepath: String,
    /// MIME type declared by the client.
    pub filetype: String,
    /// Blob size in bytes.
    pub size: i64,
    /// When the record was created.
    pub uploaded_at: DateTime<Utc>,
}

/// Data for inserting a new file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Original client-supplied filename.
    pub filename: String,
    /// Public path of the blob.
    pub filepath: String,
    /// Declared MIME type.
    pub filetype: String,
    /// Blob size in bytes.
    pub size: i64,
    /// Creation time.
    pub uploaded_at: DateTime<Utc>,
}

impl NewFileRecord {
    /// Create a new record stamped with the current time.
    pub fn new(
        filename: impl Into<String>,
        filepath: impl Into<String>,
        filetype: impl Into<String>,
        size: i64,
    ) -> Self {
        Self {
            filename: filename.into(),
            filepath: filepath.into(),
            filetype: filetype.into(),
            size,
            uploaded_at: Utc::now(),
        }
    }

    /// Override the creation time.
    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = uploaded_at;
        self
    }
}

/// Destination for file records produced by the upload pipeline.
pub trait MetadataStore {
    /// Persist a record and return it with its assigned ID.
    fn insert(&self, record: &NewFileRecord) -> impl Future<Output = Result<FileRecord>> + Send;
}

/// Repository for file record operations.
pub struct FileRecordRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileRecordRepository<'a> {
    /// Create a new FileRecordRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a record.
    ///
    /// Returns the created record with the assigned ID.
    pub async fn create(&self, record: &NewFileRecord) -> Result<FileRecord> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO files (filename, filepath, filetype, size, uploaded_at)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&record.filename)
        .bind(&record.filepath)
        .bind(&record.filetype)
        .bind(record.size)
        .bind(record.uploaded_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ImgdropError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ImgdropError::NotFound("file record".to_string()))
    }

    /// Get a record by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            "SELECT id, filename, filepath, filetype, size, uploaded_at
             FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ImgdropError::Database(e.to_string()))?;

        Ok(record)
    }

    /// Count all records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(self.pool)
            .await
            .map_err(|e| ImgdropError::Database(e.to_string()))?;
        Ok(count)
    }
}

impl MetadataStore for FileRecordRepository<'_> {
    async fn insert(&self, record: &NewFileRecord) -> Result<FileRecord> {
        self.create(record).await
    }
}

/// Store used when the database could not be reached at startup.
///
/// Every insert fails, so uploads end in `Failed` instead of crashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl MetadataStore for UnavailableStore {
    async fn insert(&self, _record: &NewFileRecord) -> Result<FileRecord> {
        Err(ImgdropError::DatabaseConnection(
            "database is not connected".to_string(),
        ))
    }
}
