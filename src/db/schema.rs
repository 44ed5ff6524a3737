//! Database schema and migrations for imgdrop.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: uploaded file records
    r#"
CREATE TABLE files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    filename    TEXT NOT NULL,           -- original client-supplied name
    filepath    TEXT NOT NULL,           -- public path, e.g. /uploads/<ts>-<name>
    filetype    TEXT NOT NULL,           -- declared MIME type
    size        INTEGER NOT NULL,
    uploaded_at TEXT NOT NULL
);

CREATE INDEX idx_files_uploaded_at ON files(uploaded_at);
"#,
];
