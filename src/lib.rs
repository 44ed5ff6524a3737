//! imgdrop - Image drop box
//!
//! A small web form that accepts one image at a time, stores it on disk and
//! records its metadata in a database.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod upload;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{ImgdropError, Result};
pub use upload::{
    BlobStore, FileRecord, FileRecordRepository, IncomingFile, IntakePolicy, UploadError,
    UploadService, UploadStage,
};
pub use web::{AppState, WebServer};
