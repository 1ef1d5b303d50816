use std::path::Path;

use crate::errors::{AppError, AppResult};

/// Content type used when the extension is not in the table.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Guess a content type from the extension of `path`.
///
/// Fails when there is no file name to look at; the caller then has to
/// supply the type explicitly.
pub fn resolve(path: &Path) -> AppResult<&'static str> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            AppError::invalid_argument(format!(
                "cannot detect content type for {}: no file name, pass a content type explicitly",
                path.display()
            ))
        })?;

    Ok(lookup_extension(file_name))
}

/// Resolve for something that may or may not know its own name.
///
/// A declared type always wins over a guessed one.
pub fn resolve_for(file_name: Option<&str>, declared: Option<&str>) -> AppResult<String> {
    if let Some(declared) = declared.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(declared.to_string());
    }

    match file_name {
        Some(name) => resolve(Path::new(name)).map(str::to_string),
        None => Err(AppError::invalid_argument(
            "file has no path, pass a content type explicitly",
        )),
    }
}

fn lookup_extension(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") | Some("jpe") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("heic") => "image/heic",
        Some("avif") => "image/avif",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("md") => "text/markdown",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
