//! Web front-end for imgdrop.
//!
//! Serves the upload form, accepts uploads and exposes stored files.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod views;

pub use error::PageError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
