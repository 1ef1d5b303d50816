use regex::Regex;
use reqwest::Url;
use std::path::Path;
use std::sync::OnceLock;

use crate::errors::{AppError, AppResult};

pub struct InputValidator;

impl InputValidator {
    /// Parse `url` as an absolute http(s) URL.
    pub fn validate_source_url(url: &str) -> AppResult<Url> {
        let trimmed = url.trim();

        if trimmed.is_empty() {
            return Err(AppError::invalid_argument("source URL cannot be empty"));
        }

        let parsed = Url::parse(trimmed)
            .map_err(|e| AppError::invalid_argument(format!("invalid url {:?}: {}", trimmed, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::invalid_argument(format!(
                "invalid url {:?}: only http and https are supported",
                trimmed
            )));
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(AppError::invalid_argument(format!(
                "invalid url {:?}: missing host",
                trimmed
            )));
        }

        Ok(parsed)
    }

    /// A file we are about to upload must exist and be a regular file.
    pub fn validate_file_path(path: &Path) -> AppResult<()> {
        if path.as_os_str().is_empty() {
            return Err(AppError::invalid_argument("file path cannot be empty"));
        }

        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::invalid_argument(format!("cannot access {}: {}", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(AppError::invalid_argument(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        Ok(())
    }

    /// Replace only the characters that break a multipart `filename=`
    /// parameter; everything else is sent as the caller named it.
    pub fn sanitize_filename(filename: &str) -> String {
        static HEADER_BREAKING: OnceLock<Regex> = OnceLock::new();
        let unsafe_chars = HEADER_BREAKING
            .get_or_init(|| Regex::new(r#"["\\\x00-\x1f\x7f]"#).expect("valid filename pattern"));
        let sanitized = unsafe_chars.replace_all(filename, "_");

        if sanitized.trim().is_empty() {
            return "file".to_string();
        }

        // Limit length
        if sanitized.len() > 255 {
            let mut end = 252;
            while !sanitized.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &sanitized[..end])
        } else {
            sanitized.to_string()
        }
    }
}
