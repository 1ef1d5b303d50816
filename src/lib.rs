//! Upload local files, batches of files and remote URLs to a hosted file
//! service.
//!
//! [`UploadClient::upload`] takes any [`UploadTarget`] and picks the matching
//! strategy. URL uploads are asynchronous on the service side; the client
//! polls the job until it succeeds or fails.

pub mod config;
pub mod errors;
pub mod handle;
pub mod mime;
pub mod security;
pub mod uploader;

pub use config::UploadConfig;
pub use errors::{AppError, AppResult};
pub use handle::RemoteFile;
pub use uploader::{
    LocalFile, StagedUpload, UploadClient, UploadTarget, UploadTransport, Uploaded, UploadedFile,
};
