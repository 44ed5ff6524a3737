//! Request handlers for the web front-end.

pub mod upload;

pub use upload::*;

use crate::db::Database;
use crate::upload::{BlobStore, IntakePolicy};

/// Shared application state.
///
/// Read-only after startup; every request works on its own data.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle. `None` when the database was unreachable at startup.
    pub db: Option<Database>,
    /// Blob storage for uploaded files.
    pub blobs: BlobStore,
    /// Intake rules for uploads.
    pub policy: IntakePolicy,
}

impl AppState {
    /// Create a new AppState without a database.
    pub fn new(blobs: BlobStore, policy: IntakePolicy) -> Self {
        Self {
            db: None,
            blobs,
            policy,
        }
    }

    /// Attach the database handle.
    pub fn with_database(mut self, db: Option<Database>) -> Self {
        self.db = db;
        self
    }
}
