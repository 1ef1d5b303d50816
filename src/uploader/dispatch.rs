use super::target::{LocalFile, UploadTarget, Uploaded};
use super::UploadClient;
use crate::errors::{AppError, AppResult};
use crate::security::InputValidator;

const EXPECTED_INPUT: &str = "expected a File object, array of files, or a valid URL string";

impl UploadClient {
    /// Upload whatever `target` is, picking exactly one strategy:
    /// a file goes up directly, text must be an http(s) URL for the service
    /// to fetch, a sequence must contain only files and goes up in one batch,
    /// and an uploaded file is sent from its temp storage.
    pub async fn upload(&self, target: UploadTarget) -> AppResult<Uploaded<'_>> {
        log::debug!("Dispatching {} upload", target.kind());

        match target {
            UploadTarget::File(file) => self.upload_file(&file).await.map(Uploaded::One),
            UploadTarget::Text(text) => {
                if let Err(e) = InputValidator::validate_source_url(&text) {
                    return Err(AppError::invalid_argument(format!("{}: {}", EXPECTED_INPUT, e)));
                }
                self.upload_url(&text).await.map(Uploaded::One)
            }
            UploadTarget::Sequence(items) => {
                let files = only_files(items)?;
                self.upload_files(&files).await.map(Uploaded::Many)
            }
            UploadTarget::Uploaded(uploaded) => self
                .upload_uploaded_file(uploaded.as_ref())
                .await
                .map(Uploaded::One),
            UploadTarget::Unsupported { kind } => Err(AppError::invalid_argument(format!(
                "{}, got {}",
                EXPECTED_INPUT, kind
            ))),
        }
    }
}

fn only_files(items: Vec<UploadTarget>) -> AppResult<Vec<LocalFile>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            UploadTarget::File(file) => Ok(file),
            other => Err(AppError::invalid_argument(format!(
                "element {} of the batch is a {}, not a file",
                i,
                other.kind()
            ))),
        })
        .collect()
}
