//! File uploads sent to the vision and file-analysis endpoints

use std::fmt;

/// Largest file the backend accepts
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// MIME types accepted by `POST /api/chat/respond/file`, with display names
pub const SUPPORTED_FILE_TYPES: &[(&str, &str)] = &[
    ("application/pdf", "PDF"),
    ("application/msword", "Word"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "Word",
    ),
    ("application/vnd.ms-excel", "Excel"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "Excel",
    ),
    ("application/vnd.ms-powerpoint", "PowerPoint"),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "PowerPoint",
    ),
    ("text/plain", "Text"),
    ("text/csv", "CSV"),
    ("image/jpeg", "JPEG"),
    ("image/png", "PNG"),
    ("image/gif", "GIF"),
    ("image/webp", "WebP"),
];

/// Display name for a supported MIME type.
pub fn file_type_name(mime_type: &str) -> Option<&'static str> {
    SUPPORTED_FILE_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(mime_type))
        .map(|(_, name)| *name)
}

// == Upload ==
/// An in-memory file headed for the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Checks the upload against the file-analysis limits.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate_document(&self) -> Option<String> {
        if file_type_name(&self.mime_type).is_none() {
            return Some(format!("File type {} is not supported.", self.mime_type));
        }
        self.validate_size()
    }

    /// Checks the upload against the image-analysis limits.
    pub fn validate_image(&self) -> Option<String> {
        if !self.mime_type.to_ascii_lowercase().starts_with("image/") {
            return Some(format!("File type {} is not an image.", self.mime_type));
        }
        self.validate_size()
    }

    fn validate_size(&self) -> Option<String> {
        if self.is_empty() {
            return Some(format!("File {} is empty.", self.file_name));
        }
        if self.len() > MAX_FILE_SIZE {
            return Some(format!(
                "File size must be less than {}.",
                format_file_size(MAX_FILE_SIZE)
            ));
        }
        None
    }
}

// Prints the byte count, not the bytes.
impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Human-readable size, e.g. `10 MB` or `1.5 KB`.
pub fn format_file_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let rounded = (size * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
