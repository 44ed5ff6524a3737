//! Test helpers for HTTP integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use imgdrop::upload::{BlobStore, FileRecordRepository, IntakePolicy};
use imgdrop::web::create_router;
use imgdrop::{AppState, Database};
use tempfile::TempDir;

/// A running test server with its backing directory and database.
pub struct TestApp {
    pub server: TestServer,
    pub db: Option<Database>,
    pub upload_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    /// Create a test app with an in-memory database and default policy.
    pub async fn new() -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        Self::build(Some(db), IntakePolicy::default())
    }

    /// Create a test app whose database is unavailable.
    pub fn without_database() -> Self {
        Self::build(None, IntakePolicy::default())
    }

    /// Create a test app with a custom intake policy.
    pub async fn with_policy(policy: IntakePolicy) -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        Self::build(Some(db), policy)
    }

    fn build(db: Option<Database>, policy: IntakePolicy) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let upload_dir = temp_dir.path().join("uploads");
        let blobs = BlobStore::new(&upload_dir, "/uploads").expect("Failed to create blob store");

        let state = AppState::new(blobs, policy).with_database(db.clone());
        let router = create_router(Arc::new(state));
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            db,
            upload_dir,
            _temp_dir: temp_dir,
        }
    }

    /// Number of blobs in the upload directory.
    pub fn blob_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Number of file records in the database.
    pub async fn record_count(&self) -> i64 {
        let db = self.db.as_ref().expect("test app has no database");
        FileRecordRepository::new(db.pool())
            .count()
            .await
            .expect("Failed to count records")
    }
}

/// Build a form with a single `file` part.
pub fn file_form(filename: &str, mime_type: &str, content: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content)
            .file_name(filename)
            .mime_type(mime_type),
    )
}
