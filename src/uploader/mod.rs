// Upload client - routes targets to the file, batch and URL strategies
//
// All strategies share one `UploadClient`, which owns the configuration and
// the transport. Nothing else is shared between calls.

pub mod dispatch;
pub mod files;
pub mod payload;
pub mod target;
pub mod transport;
pub mod url_ingest;

use std::fmt;
use std::sync::Arc;

use crate::config::{validate_config, UploadConfig};
use crate::errors::AppResult;

pub use payload::{UploadForm, UploadPayload};
pub use target::{LocalFile, StagedUpload, UploadTarget, Uploaded, UploadedFile};
pub use transport::{HttpTransport, UploadTransport};
pub use url_ingest::{IngestionJob, JobStatus, StatusResponse};

pub struct UploadClient {
    config: UploadConfig,
    transport: Arc<dyn UploadTransport>,
}

impl UploadClient {
    /// Client talking HTTP to `config.upload_base_url`.
    pub fn new(config: UploadConfig) -> AppResult<Self> {
        validate_config(&config)?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    pub fn with_transport(
        config: UploadConfig,
        transport: Arc<dyn UploadTransport>,
    ) -> AppResult<Self> {
        validate_config(&config)?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn public_key(&self) -> &str {
        &self.config.public_key
    }

    pub(crate) fn transport(&self) -> &dyn UploadTransport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for UploadClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadClient")
            .field("upload_base_url", &self.config.upload_base_url)
            .finish_non_exhaustive()
    }
}
