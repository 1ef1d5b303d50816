use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::payload::UploadForm;
use crate::config::UploadConfig;
use crate::errors::{AppError, AppResult};

/// POST capability the uploaders talk to. Implementations return the decoded
/// JSON body of a successful response.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn post_multipart(&self, path: &str, form: UploadForm) -> AppResult<Value>;

    async fn post_form(&self, path: &str, fields: Vec<(String, String)>) -> AppResult<Value>;
}

/// `reqwest` backed transport rooted at the configured upload base URL.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &UploadConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.upload_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn post_multipart(&self, path: &str, form: UploadForm) -> AppResult<Value> {
        let url = self.endpoint(path);
        log::debug!(
            "POST {} (multipart, {} file part(s))",
            url,
            form.payloads().len()
        );

        let form = form.build_form()?;
        let response = self.client.post(&url).multipart(form).send().await?;
        decode_response(response).await
    }

    async fn post_form(&self, path: &str, fields: Vec<(String, String)>) -> AppResult<Value> {
        let url = self.endpoint(path);
        log::debug!("POST {}", url);

        let response = self.client.post(&url).form(&fields).send().await?;
        decode_response(response).await
    }
}

async fn decode_response(response: reqwest::Response) -> AppResult<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(AppError::Http {
            status: status.as_u16(),
            body,
        });
    }

    log::debug!(
        "Upload service response (first 300 chars): {}",
        body.chars().take(300).collect::<String>()
    );

    serde_json::from_str(&body)
        .map_err(|e| AppError::protocol(format!("response body is not valid JSON: {}", e)))
}
