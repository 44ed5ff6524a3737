//! Intake policy for uploaded files.
//!
//! Only client-declared metadata is checked: the filename extension, the
//! declared MIME type and the byte size. File contents are never sniffed.

use std::path::Path;

use super::error::UploadError;
use super::{DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_UPLOAD_SIZE};

/// Accept/reject rules applied before anything is persisted.
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    allowed_types: Vec<String>,
    max_size: u64,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_TYPES.iter().copied(), DEFAULT_MAX_UPLOAD_SIZE)
    }
}

impl IntakePolicy {
    /// Create a policy from an allow-list of type tokens and a size cap.
    ///
    /// Tokens are compared case-insensitively.
    pub fn new<I, S>(allowed_types: I, max_size: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_types: allowed_types
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            max_size,
        }
    }

    /// Maximum accepted size in bytes.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// The allow-list as shown to users, e.g. "jpeg, jpg, png, gif".
    pub fn allowed_display(&self) -> String {
        self.allowed_types.join(", ")
    }

    /// Reject content longer than the size cap.
    pub fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_size {
            return Err(UploadError::FileTooLarge {
                limit: self.max_size,
            });
        }
        Ok(())
    }

    /// Check the declared extension and MIME type.
    ///
    /// Both have to match the allow-list.
    pub fn check_type(&self, filename: &str, mime_type: &str) -> Result<(), UploadError> {
        let extension_ok = extension_of(filename)
            .map(|ext| self.is_allowed(&ext))
            .unwrap_or(false);
        let mime_ok = mime_subtype(mime_type)
            .map(|subtype| self.is_allowed(&subtype))
            .unwrap_or(false);

        if extension_ok && mime_ok {
            Ok(())
        } else {
            Err(UploadError::UnsupportedFileType {
                allowed: self.allowed_display(),
            })
        }
    }

    fn is_allowed(&self, token: &str) -> bool {
        self.allowed_types.iter().any(|t| t == token)
    }
}

/// Lower-cased extension of the final path component.
fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Legacy subtypes some browsers still send, with the token they stand for.
const SUBTYPE_ALIASES: &[(&str, &str)] = &[("pjpeg", "jpeg"), ("x-png", "png")];

/// Lower-cased subtype of a MIME type, without parameters.
///
/// `"image/PNG; charset=binary"` gives `"png"` and `"image/pjpeg"` gives `"jpeg"`.
fn mime_subtype(mime_type: &str) -> Option<String> {
    let essence = mime_type.split(';').next()?.trim();
    let (_, subtype) = essence.split_once('/')?;
    let subtype = subtype.trim().to_lowercase();
    if subtype.is_empty() {
        return None;
    }

    let canonical = SUBTYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == subtype)
        .map(|(_, token)| token.to_string());
    Some(canonical.unwrap_or(subtype))
}
