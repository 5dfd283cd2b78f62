use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Kinds of content the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(FileKind::Image),
            "pdf" => Ok(FileKind::Pdf),
            other => Err(format!("unknown file kind: {other}")),
        }
    }
}

/// Maps a declared content type to a [`FileKind`].
///
/// Any `image/*` subtype is an image, `application/pdf` is a PDF, everything else is
/// rejected. Case and parameters (`; charset=...`) are ignored.
pub fn classify_content_type(content_type: &str) -> Option<FileKind> {
    let mime: mime::Mime = content_type.trim().to_ascii_lowercase().parse().ok()?;

    if mime.type_() == mime::IMAGE {
        Some(FileKind::Image)
    } else if mime.essence_str() == mime::APPLICATION_PDF.essence_str() {
        Some(FileKind::Pdf)
    } else {
        None
    }
}

/// Extension of `filename` including the leading dot, or empty when there is none
/// or it contains anything but ASCII alphanumerics.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

/// Collision-free blob key: a random UUID followed by the original extension.
pub fn generate_storage_key(original_name: &str) -> String {
    format!("{}{}", Uuid::new_v4(), file_extension(original_name))
}

/// Keeps only the final path component and replaces reserved characters.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path components stripped from uploaded filename: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        "unnamed".to_string()
    } else {
        sanitized
    }
}

/// Content type used when serving stored bytes back to a client.
pub fn served_content_type(filename: &str, kind: FileKind) -> &'static str {
    match kind {
        FileKind::Pdf => "application/pdf",
        FileKind::Image => match file_extension(filename).to_ascii_lowercase().as_str() {
            ".jpg" | ".jpeg" => "image/jpeg",
            ".png" => "image/png",
            ".gif" => "image/gif",
            ".webp" => "image/webp",
            ".bmp" => "image/bmp",
            _ => "application/octet-stream",
        },
    }
}
