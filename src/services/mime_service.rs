use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raster formats treated as images even when MIME resolution fails.
const RASTER_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif"];

const ARCHIVE_MIMES: &[&str] = &[
    "application/zip",
    "application/x-rar-compressed",
    "application/vnd.rar",
    "application/x-7z-compressed",
    "application/x-tar",
    "application/gzip",
];

const DOCUMENT_MIMES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

const CODE_MIMES: &[&str] = &["application/json", "application/javascript", "application/xml"];

const EXECUTABLE_MIMES: &[&str] = &[
    "application/x-msdownload",
    "application/x-executable",
    "application/vnd.android.package-archive",
];

/// Coarse presentation category for a file; drives nothing but icon choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Code,
    Executable,
    Other,
}

pub fn mime_for_path(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|m| m.to_string())
}

pub fn is_raster_image(extension: &str) -> bool {
    RASTER_IMAGE_EXTENSIONS.contains(&extension.to_lowercase().as_str())
}

pub fn classify(mime_type: Option<&str>) -> FileCategory {
    let Some(mime) = mime_type else {
        return FileCategory::Other;
    };

    if mime.starts_with("image/") {
        FileCategory::Image
    } else if mime.starts_with("video/") {
        FileCategory::Video
    } else if mime.starts_with("audio/") {
        FileCategory::Audio
    } else if DOCUMENT_MIMES.contains(&mime) || mime.starts_with("text/") {
        FileCategory::Document
    } else if ARCHIVE_MIMES.contains(&mime) || mime.contains("zip") {
        FileCategory::Archive
    } else if CODE_MIMES.contains(&mime) {
        FileCategory::Code
    } else if EXECUTABLE_MIMES.contains(&mime) {
        FileCategory::Executable
    } else {
        FileCategory::Other
    }
}
