use reqwest::multipart;
use std::path::Path;

use crate::errors::{AppError, AppResult};
use crate::mime;
use crate::security::InputValidator;

/// One file part of an upload request.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    file_name: String,
    data: Vec<u8>,
    content_type: String,
    index: Option<usize>,
}

impl UploadPayload {
    pub fn new(
        file_name: &str,
        data: Vec<u8>,
        content_type: impl Into<String>,
        index: Option<usize>,
    ) -> Self {
        Self {
            file_name: InputValidator::sanitize_filename(file_name),
            data,
            content_type: content_type.into(),
            index,
        }
    }

    /// Read `path` and pair it with a content type, guessing one from the
    /// extension when none is given.
    pub async fn from_path(
        path: &Path,
        content_type: Option<&str>,
        index: Option<usize>,
    ) -> AppResult<Self> {
        let content_type = match content_type {
            Some(declared) => declared.to_string(),
            None => mime::resolve(path)?.to_string(),
        };

        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self::new(&file_name, data, content_type, index))
    }

    /// `file` for a lone upload, `file[i]` inside a batch.
    pub fn field_name(&self) -> String {
        match self.index {
            Some(i) => format!("file[{}]", i),
            None => "file".to_string(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    fn into_part(self) -> AppResult<multipart::Part> {
        let content_type = self.content_type;
        multipart::Part::bytes(self.data)
            .file_name(self.file_name)
            .mime_str(&content_type)
            .map_err(|e| {
                AppError::invalid_argument(format!("invalid content type {:?}: {}", content_type, e))
            })
    }
}

/// Text fields plus file parts for one multipart request.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    text_fields: Vec<(String, String)>,
    payloads: Vec<UploadPayload>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.text_fields.push((key.into(), value.into()));
    }

    pub fn add_payload(&mut self, payload: UploadPayload) {
        self.payloads.push(payload);
    }

    pub fn text_fields(&self) -> &[(String, String)] {
        &self.text_fields
    }

    pub fn payloads(&self) -> &[UploadPayload] {
        &self.payloads
    }

    pub fn build_form(self) -> AppResult<multipart::Form> {
        let mut form = multipart::Form::new();

        for (key, value) in self.text_fields {
            form = form.text(key, value);
        }

        for payload in self.payloads {
            let field_name = payload.field_name();
            form = form.part(field_name, payload.into_part()?);
        }

        Ok(form)
    }
}
