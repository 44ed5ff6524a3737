//! Upload form handlers.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;

use crate::upload::{
    FileRecordRepository, IncomingFile, MetadataStore, UnavailableStore, UploadError,
    UploadService, DEFAULT_MIME_TYPE,
};
use crate::web::error::PageError;
use crate::web::handlers::AppState;
use crate::web::views;

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// GET / - Render the upload form.
pub async fn upload_form() -> Html<String> {
    Html(views::upload_page(None))
}

/// POST /upload - Store one image and record it.
///
/// Request body: multipart/form-data with a "file" field.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, PageError> {
    match &state.db {
        Some(db) => {
            let service = UploadService::new(
                &state.policy,
                &state.blobs,
                FileRecordRepository::new(db.pool()),
            );
            run_upload(service, multipart).await
        }
        None => {
            let service = UploadService::new(&state.policy, &state.blobs, UnavailableStore);
            run_upload(service, multipart).await
        }
    }
}

async fn run_upload<M: MetadataStore>(
    mut service: UploadService<'_, M>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, PageError> {
    service.start_receiving();

    let received = match multipart {
        Ok(multipart) => receive_file(multipart, service.max_size()).await,
        Err(rejection) => {
            // Not a multipart request at all: there is no file part.
            tracing::debug!("Upload without multipart body: {}", rejection);
            Ok(None)
        }
    };
    let incoming = match received {
        Ok(incoming) => incoming,
        Err(e) => return Err(service.abort(e).into()),
    };

    let record = service.process(incoming).await?;
    Ok(Html(views::success_page(&record)))
}

/// Read the first named `file` part, enforcing the size cap while streaming.
///
/// File parts without a filename (an empty file input) are skipped, as are
/// all other fields.
async fn receive_file(
    mut multipart: Multipart,
    max_size: u64,
) -> Result<Option<IncomingFile>, UploadError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let mut content = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_size))?
        {
            if (content.len() + chunk.len()) as u64 > max_size {
                return Err(UploadError::FileTooLarge { limit: max_size });
            }
            content.extend_from_slice(&chunk);
        }

        return Ok(Some(IncomingFile::new(filename, content_type, content)));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError, max_size: u64) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::FileTooLarge { limit: max_size }
    } else {
        tracing::warn!("Failed to read multipart body: {}", err);
        UploadError::MalformedUpload(err.body_text())
    }
}
