//! HTTP integration tests for the upload form and upload endpoint.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use common::{file_form, TestApp};
use imgdrop::upload::{FileRecordRepository, IntakePolicy};

const MIB: usize = 1024 * 1024;

#[tokio::test]
async fn test_upload_form_is_served() {
    let app = TestApp::new().await;

    let response = app.server.get("/").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains(r#"action="/upload""#));
    assert!(body.contains(r#"enctype="multipart/form-data""#));
    assert!(body.contains(r#"name="file""#));
}

#[tokio::test]
async fn test_upload_png_succeeds() {
    let app = TestApp::new().await;
    let content = vec![0x89u8; 120_000];

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("photo.png", "image/png", content))
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("File uploaded"));
    assert!(body.contains("photo.png"));
    assert!(body.contains("image/png"));
    assert!(body.contains("/uploads/"));

    assert_eq!(app.record_count().await, 1);
    assert_eq!(app.blob_count(), 1);

    let db = app.db.as_ref().unwrap();
    let record = FileRecordRepository::new(db.pool())
        .get_by_id(1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.filetype, "image/png");
    assert_eq!(record.size, 120_000);
    assert!(record.filepath.starts_with("/uploads/"));
    assert!(record.filepath.ends_with("-photo.png"));
    assert_eq!(record.filename, "photo.png");
}

#[tokio::test]
async fn test_uploaded_file_is_served_at_public_path() {
    let app = TestApp::new().await;
    let content = b"GIF89a fake image bytes".to_vec();

    app.server
        .post("/upload")
        .multipart(file_form("anim.gif", "image/gif", content.clone()))
        .await
        .assert_status_ok();

    let db = app.db.as_ref().unwrap();
    let record = FileRecordRepository::new(db.pool())
        .get_by_id(1)
        .await
        .unwrap()
        .unwrap();

    let response = app.server.get(&record.filepath).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), content.as_slice());
}

#[tokio::test]
async fn test_upload_each_allowed_type() {
    let app = TestApp::new().await;
    let cases = [
        ("a.jpeg", "image/jpeg"),
        ("b.jpg", "image/jpg"),
        ("c.png", "image/png"),
        ("d.gif", "image/gif"),
        ("E.PNG", "image/PNG"),
    ];

    for (name, mime) in cases {
        app.server
            .post("/upload")
            .multipart(file_form(name, mime, vec![1, 2, 3]))
            .await
            .assert_status_ok();
    }

    assert_eq!(app.record_count().await, cases.len() as i64);
}

#[tokio::test]
async fn test_upload_pdf_rejected() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("doc.pdf", "application/pdf", vec![0u8; 2048]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response
        .text()
        .contains("Only image files (jpeg, jpg, png, gif) are allowed"));
    assert_eq!(app.record_count().await, 0);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_upload_mismatched_extension_rejected() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("photo.png", "application/pdf", vec![0u8; 16]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_upload_too_large_rejected() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("big.jpg", "image/jpeg", vec![0u8; 6 * MIB]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("File too large (max 5MB)"));
    assert_eq!(app.record_count().await, 0);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_upload_exactly_at_limit_accepted() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("edge.jpg", "image/jpeg", vec![0u8; 5 * MIB]))
        .await;

    response.assert_status_ok();
    assert_eq!(app.record_count().await, 1);
}

#[tokio::test]
async fn test_upload_at_limit_with_extra_form_fields() {
    let app = TestApp::new().await;

    let form = MultipartForm::new()
        .add_text("description", "x".repeat(200 * 1024))
        .add_part(
            "file",
            Part::bytes(vec![0u8; 5 * MIB])
                .file_name("edge.png")
                .mime_type("image/png"),
        );
    let response = app.server.post("/upload").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(app.record_count().await, 1);
}

#[tokio::test]
async fn test_upload_respects_custom_policy() {
    let app = TestApp::with_policy(IntakePolicy::new(["png"], 1024)).await;

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("photo.jpg", "image/jpeg", vec![0u8; 10]))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Only image files (png) are allowed"));

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("photo.png", "image/png", vec![0u8; 2048]))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("File too large (max 1KB)"));

    assert_eq!(app.record_count().await, 0);
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let app = TestApp::new().await;

    let form = MultipartForm::new().add_text("description", "no file here");
    let response = app.server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("No file uploaded"));
    assert_eq!(app.record_count().await, 0);
}

#[tokio::test]
async fn test_upload_file_under_other_field_name() {
    let app = TestApp::new().await;

    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(vec![1u8, 2, 3])
            .file_name("photo.png")
            .mime_type("image/png"),
    );
    let response = app.server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("No file uploaded"));
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_upload_text_field_named_file() {
    let app = TestApp::new().await;

    let form = MultipartForm::new().add_text("file", "not a file");
    let response = app.server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("No file uploaded"));
}

#[tokio::test]
async fn test_upload_non_multipart_body() {
    let app = TestApp::new().await;

    let response = app.server.post("/upload").text("just some text").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("No file uploaded"));
}

#[tokio::test]
async fn test_upload_takes_first_file_part() {
    let app = TestApp::new().await;

    let form = MultipartForm::new()
        .add_part(
            "file",
            Part::bytes(vec![1u8; 10])
                .file_name("first.png")
                .mime_type("image/png"),
        )
        .add_part(
            "file",
            Part::bytes(vec![2u8; 20])
                .file_name("second.gif")
                .mime_type("image/gif"),
        );
    let response = app.server.post("/upload").multipart(form).await;

    response.assert_status_ok();
    assert!(response.text().contains("first.png"));
    assert_eq!(app.record_count().await, 1);
    assert_eq!(app.blob_count(), 1);
}

#[tokio::test]
async fn test_upload_escapes_filename_in_page() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("<i>x.png", "image/png", vec![0u8; 4]))
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert!(!body.contains("<i>x.png"));
    assert!(body.contains("&lt;i&gt;x.png"));
}

#[tokio::test]
async fn test_upload_blob_write_failure() {
    let app = TestApp::new().await;
    std::fs::remove_dir_all(&app.upload_dir).unwrap();

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("photo.png", "image/png", vec![0u8; 64]))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("Error uploading file"));
    assert_eq!(app.record_count().await, 0);
}

#[tokio::test]
async fn test_upload_without_database_leaves_orphan_blob() {
    let app = TestApp::without_database();

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("photo.png", "image/png", vec![0u8; 64]))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("Error uploading file"));
    assert_eq!(app.blob_count(), 1);
}

#[tokio::test]
async fn test_failed_upload_page_offers_form_again() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/upload")
        .multipart(file_form("doc.pdf", "application/pdf", vec![0u8; 8]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains(r#"name="file""#));
}
