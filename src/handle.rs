use std::fmt;

use crate::uploader::UploadClient;

/// A file stored by the upload service.
///
/// Borrows the client that produced it so follow-up calls reuse the same
/// configuration and transport.
#[derive(Clone)]
pub struct RemoteFile<'a> {
    client: &'a UploadClient,
    id: String,
}

impl<'a> RemoteFile<'a> {
    pub fn new(client: &'a UploadClient, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client(&self) -> &'a UploadClient {
        self.client
    }

    pub fn into_id(self) -> String {
        self.id
    }
}

impl fmt::Debug for RemoteFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteFile").field("id", &self.id).finish()
    }
}

impl fmt::Display for RemoteFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
