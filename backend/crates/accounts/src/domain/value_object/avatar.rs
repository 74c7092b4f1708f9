//! Avatar Value Objects

use serde::{Deserialize, Serialize};

/// Profile image reference kept on the user record
///
/// Both fields are empty when the user has no avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogo {
    pub url: String,
    pub file_name: String,
}

impl UserLogo {
    pub fn new(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_name: file_name.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// A file received from a client, not yet stored
#[derive(Clone)]
pub struct UploadedFile {
    /// Name as sent by the client
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
