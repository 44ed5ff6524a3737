//! Error pages for the web front-end.
//!
//! Every upload error is turned into a status code and a user-facing message
//! here, and nowhere else.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::views;
use crate::upload::UploadError;

/// Message shown for any server-side failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error uploading file";

/// Message shown when the multipart body could not be parsed.
pub const MALFORMED_UPLOAD_MESSAGE: &str = "Invalid upload request";

/// An error rendered as the upload form with a message.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    /// Create a new page error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message shown on the form.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// HTTP status for an upload error.
pub fn status_for(err: &UploadError) -> StatusCode {
    match err {
        UploadError::NoFileProvided
        | UploadError::UnsupportedFileType { .. }
        | UploadError::FileTooLarge { .. }
        | UploadError::MalformedUpload(_) => StatusCode::BAD_REQUEST,
        UploadError::BlobWriteFailure(_) | UploadError::PersistenceFailure(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// User-facing message for an upload error. Internal causes are never shown.
pub fn message_for(err: &UploadError) -> String {
    match err {
        UploadError::NoFileProvided
        | UploadError::UnsupportedFileType { .. }
        | UploadError::FileTooLarge { .. } => err.to_string(),
        UploadError::MalformedUpload(_) => MALFORMED_UPLOAD_MESSAGE.to_string(),
        UploadError::BlobWriteFailure(_) | UploadError::PersistenceFailure(_) => {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}

impl From<UploadError> for PageError {
    fn from(err: UploadError) -> Self {
        Self::new(status_for(&err), message_for(&err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, Html(views::upload_page(Some(&self.message)))).into_response()
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for PageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_bad_request() {
        let cases = [
            UploadError::NoFileProvided,
            UploadError::UnsupportedFileType {
                allowed: "png".to_string(),
            },
            UploadError::FileTooLarge { limit: 1024 },
            UploadError::MalformedUpload("boundary".to_string()),
        ];

        for err in cases {
            assert_eq!(status_for(&err), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn test_server_errors_are_internal() {
        let blob = UploadError::BlobWriteFailure(std::io::Error::other("disk full"));
        let db = UploadError::PersistenceFailure("database is locked".to_string());

        assert_eq!(status_for(&blob), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(&db), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_server_error_message_hides_cause() {
        let page: PageError =
            UploadError::PersistenceFailure("database is locked".to_string()).into();

        assert_eq!(page.message(), "Error uploading file");
        assert_eq!(page.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_error_messages() {
        assert_eq!(message_for(&UploadError::NoFileProvided), "No file uploaded");
        assert_eq!(
            message_for(&UploadError::MalformedUpload("unexpected eof".to_string())),
            "Invalid upload request"
        );
        assert_eq!(
            message_for(&UploadError::FileTooLarge {
                limit: 5 * 1024 * 1024
            }),
            "File too large (max 5MB)"
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = PageError::from(UploadError::NoFileProvided).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
