use serde_json::Value;
use std::path::Path;

use super::payload::{UploadForm, UploadPayload};
use super::target::{LocalFile, UploadedFile};
use super::UploadClient;
use crate::errors::{AppError, AppResult};
use crate::handle::RemoteFile;
use crate::mime;
use crate::security::InputValidator;

pub const BASE_UPLOAD_PATH: &str = "/base/";

/// Form field carrying the public key on direct uploads.
pub const PUB_KEY_FIELD: &str = "UPLOADCARE_PUB_KEY";

impl UploadClient {
    /// Upload one local file, guessing its content type from the extension.
    pub async fn upload_file(&self, file: &LocalFile) -> AppResult<RemoteFile<'_>> {
        let payload = UploadPayload::from_path(file.path(), None, None).await?;
        self.send_single(payload).await
    }

    /// Same as [`upload_file`](Self::upload_file).
    pub async fn create_file(&self, file: &LocalFile) -> AppResult<RemoteFile<'_>> {
        self.upload_file(file).await
    }

    pub async fn upload_file_as(
        &self,
        file: &LocalFile,
        content_type: &str,
    ) -> AppResult<RemoteFile<'_>> {
        let payload = UploadPayload::from_path(file.path(), Some(content_type), None).await?;
        self.send_single(payload).await
    }

    /// Upload a temp file whose own name says nothing; `pathname` supplies
    /// the file name and content type.
    pub async fn upload_temp_file(
        &self,
        temp_path: &Path,
        pathname: &str,
    ) -> AppResult<RemoteFile<'_>> {
        InputValidator::validate_file_path(temp_path)?;
        let content_type = mime::resolve(Path::new(pathname))?;
        let file_name = Path::new(pathname)
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let data = tokio::fs::read(temp_path).await?;
        self.send_single(UploadPayload::new(&file_name, data, content_type, None))
            .await
    }

    /// Upload a framework-provided file from its temp storage, trusting its
    /// declared content type when present.
    pub async fn upload_uploaded_file(
        &self,
        uploaded: &dyn UploadedFile,
    ) -> AppResult<RemoteFile<'_>> {
        let temp_path = uploaded.temp_path();
        InputValidator::validate_file_path(temp_path)?;

        let temp_name = temp_path.file_name().and_then(|n| n.to_str());
        let file_name = uploaded.original_filename().or(temp_name);
        let content_type = mime::resolve_for(file_name, uploaded.content_type())?;

        let data = tokio::fs::read(temp_path).await?;
        let payload = UploadPayload::new(file_name.unwrap_or("file"), data, content_type, None);
        self.send_single(payload).await
    }

    /// Upload several files in a single request. Handles come back in the
    /// order the files were given.
    pub async fn upload_files(&self, files: &[LocalFile]) -> AppResult<Vec<RemoteFile<'_>>> {
        if files.is_empty() {
            return Err(AppError::invalid_argument("no files given for batch upload"));
        }

        // Nothing is sent unless every file is still there.
        for file in files {
            InputValidator::validate_file_path(file.path())?;
        }

        let mut form = UploadForm::new();
        form.add_text_field(PUB_KEY_FIELD, self.public_key());

        let mut field_names = Vec::with_capacity(files.len());
        for (i, file) in files.iter().enumerate() {
            let payload = UploadPayload::from_path(file.path(), None, Some(i)).await?;
            field_names.push(payload.field_name());
            form.add_payload(payload);
        }

        log::debug!("Uploading batch of {} files", files.len());
        let response = self
            .transport()
            .post_multipart(BASE_UPLOAD_PATH, form)
            .await?;

        let ids = ids_in_submission_order(&response, &field_names)?;
        log::info!("Uploaded batch of {} files", ids.len());

        Ok(ids.into_iter().map(|id| RemoteFile::new(self, id)).collect())
    }

    async fn send_single(&self, payload: UploadPayload) -> AppResult<RemoteFile<'_>> {
        let file_name = payload.file_name().to_string();

        let mut form = UploadForm::new();
        form.add_text_field(PUB_KEY_FIELD, self.public_key());
        form.add_payload(payload);

        let response = self
            .transport()
            .post_multipart(BASE_UPLOAD_PATH, form)
            .await?;

        let id = response
            .get("file")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::protocol("upload response has no \"file\" identifier"))?;

        log::info!("Uploaded {} as {}", file_name, id);
        Ok(RemoteFile::new(self, id))
    }
}

/// Look each submitted field up by its positional key (`file[i]`, or a bare
/// `i`) so the result follows input order whatever order the service uses.
fn ids_in_submission_order(response: &Value, field_names: &[String]) -> AppResult<Vec<String>> {
    let entries = response
        .as_object()
        .ok_or_else(|| AppError::protocol("batch upload response is not an object"))?;

    field_names
        .iter()
        .enumerate()
        .map(|(i, field)| {
            entries
                .get(field)
                .or_else(|| entries.get(&i.to_string()))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::protocol(format!(
                        "batch upload response has no identifier for {}",
                        field
                    ))
                })
        })
        .collect()
}
