use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::AppResult;
use crate::handle::RemoteFile;
use crate::security::InputValidator;

/// A regular file on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        InputValidator::validate_file_path(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A file received by a web framework and parked in temporary storage.
///
/// Host integrations implement this for their own request types so the
/// uploader never has to know about them.
pub trait UploadedFile: Send + Sync + fmt::Debug {
    fn temp_path(&self) -> &Path;

    /// Content type declared by the sender, if any.
    fn content_type(&self) -> Option<&str>;

    /// Name the file had on the sender's side.
    fn original_filename(&self) -> Option<&str> {
        None
    }
}

/// Plain [`UploadedFile`] for callers that already hold the pieces.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    temp_path: PathBuf,
    content_type: Option<String>,
    original_filename: Option<String>,
}

impl StagedUpload {
    pub fn new(temp_path: impl Into<PathBuf>, content_type: Option<String>) -> Self {
        Self {
            temp_path: temp_path.into(),
            content_type,
            original_filename: None,
        }
    }

    pub fn with_original_filename(mut self, name: impl Into<String>) -> Self {
        self.original_filename = Some(name.into());
        self
    }
}

impl UploadedFile for StagedUpload {
    fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn original_filename(&self) -> Option<&str> {
        self.original_filename.as_deref()
    }
}

/// Anything [`UploadClient::upload`](super::UploadClient::upload) accepts.
#[derive(Debug)]
pub enum UploadTarget {
    File(LocalFile),
    /// Only valid when it parses as an http(s) URL.
    Text(String),
    /// Every element must be a `File`.
    Sequence(Vec<UploadTarget>),
    Uploaded(Box<dyn UploadedFile>),
    /// Produced by boundary inference for inputs no strategy handles.
    Unsupported { kind: String },
}

impl UploadTarget {
    /// Classify a command-line style argument: an existing regular file is a
    /// file, any other existing path is unsupported, everything else is text.
    pub fn from_arg(arg: &str) -> Self {
        match std::fs::metadata(arg) {
            Ok(metadata) if metadata.is_file() => UploadTarget::File(LocalFile {
                path: PathBuf::from(arg),
            }),
            Ok(metadata) if metadata.is_dir() => UploadTarget::Unsupported {
                kind: format!("directory {}", arg),
            },
            Ok(_) => UploadTarget::Unsupported {
                kind: format!("special file {}", arg),
            },
            Err(_) => UploadTarget::Text(arg.to_string()),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            UploadTarget::File(_) => "file",
            UploadTarget::Text(_) => "text",
            UploadTarget::Sequence(_) => "sequence",
            UploadTarget::Uploaded(_) => "uploaded file",
            UploadTarget::Unsupported { kind } => kind,
        }
    }
}

impl From<LocalFile> for UploadTarget {
    fn from(file: LocalFile) -> Self {
        UploadTarget::File(file)
    }
}

impl From<Vec<LocalFile>> for UploadTarget {
    fn from(files: Vec<LocalFile>) -> Self {
        UploadTarget::Sequence(files.into_iter().map(UploadTarget::File).collect())
    }
}

impl From<String> for UploadTarget {
    fn from(text: String) -> Self {
        UploadTarget::Text(text)
    }
}

impl From<&str> for UploadTarget {
    fn from(text: &str) -> Self {
        UploadTarget::Text(text.to_string())
    }
}

impl From<StagedUpload> for UploadTarget {
    fn from(upload: StagedUpload) -> Self {
        UploadTarget::Uploaded(Box::new(upload))
    }
}

/// Result of a dispatched upload.
#[derive(Debug, Clone)]
pub enum Uploaded<'a> {
    One(RemoteFile<'a>),
    Many(Vec<RemoteFile<'a>>),
}

impl<'a> Uploaded<'a> {
    pub fn into_vec(self) -> Vec<RemoteFile<'a>> {
        match self {
            Uploaded::One(file) => vec![file],
            Uploaded::Many(files) => files,
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Uploaded::One(file) => vec![file.id()],
            Uploaded::Many(files) => files.iter().map(RemoteFile::id).collect(),
        }
    }
}
