//! Avatar Asset Store
//!
//! Stores profile images either on local disk (served back under
//! `/api/view/`) or in Cloudinary. The mode is fixed at startup.
//!
//! ## Failure policy
//! - Remote upload failure: logged, the avatar keeps its file name with an
//!   empty URL and the request proceeds.
//! - Local write failure and remote delete failure: propagated (500).
//! - Local delete of a missing file: logged, not fatal.

use std::path::{Component, Path, PathBuf};

use platform::cloudinary::{CloudinaryClient, CloudinaryError, public_id_from_url};
use uuid::Uuid;

use crate::application::config::StorageConfig;
use crate::domain::value_object::avatar::{UploadedFile, UserLogo};
use crate::error::{AccountError, AccountResult};

/// Route prefix under which local uploads are served
pub const VIEW_ROUTE: &str = "/api/view";

#[derive(Debug, Clone)]
pub enum AssetStore {
    Local(LocalAssets),
    Cloudinary(CloudinaryClient),
}

impl AssetStore {
    pub fn from_config(config: &StorageConfig) -> AccountResult<Self> {
        if config.local_upload {
            return Ok(AssetStore::Local(LocalAssets::new(&config.upload_dir)));
        }

        let cloudinary = config.cloudinary.clone().ok_or_else(|| {
            AccountError::Internal(
                "Cloudinary credentials are required when local upload is disabled".to_string(),
            )
        })?;

        Ok(AssetStore::Cloudinary(CloudinaryClient::new(cloudinary)))
    }

    /// Store an uploaded avatar
    ///
    /// `base_url` is `{scheme}://{host}` of the current request and is only
    /// used for local storage.
    pub async fn upload(&self, file: UploadedFile, base_url: &str) -> AccountResult<UserLogo> {
        match self {
            AssetStore::Local(local) => local.upload(file, base_url).await,
            AssetStore::Cloudinary(client) => {
                let file_name = file.file_name.clone();
                match client.upload(&file.file_name, file.bytes).await {
                    Ok(upload) => Ok(UserLogo::new(upload.delivery_url(), file_name)),
                    Err(e) => {
                        tracing::warn!(error = %e, file_name = %file_name, "Avatar upload failed, continuing without URL");
                        Ok(UserLogo::new("", file_name))
                    }
                }
            }
        }
    }

    /// Remove a previously stored avatar by its URL
    pub async fn remove(&self, url: &str) -> AccountResult<()> {
        if url.is_empty() {
            return Ok(());
        }

        match self {
            AssetStore::Local(local) => local.remove(url).await,
            AssetStore::Cloudinary(client) => {
                let public_id = public_id_from_url(url).ok_or_else(|| {
                    AccountError::Storage(format!("Cannot derive asset id from '{}'", url))
                })?;

                match client.destroy(&public_id).await {
                    Ok(()) => Ok(()),
                    Err(CloudinaryError::DestroyFailed(result)) if result == "not found" => {
                        tracing::warn!(public_id = %public_id, "Remote avatar already gone");
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Route and directory to mount for serving local uploads
    pub fn local_mount(&self) -> Option<(String, PathBuf)> {
        match self {
            AssetStore::Local(local) => Some((local.mount_route(), local.upload_dir.clone())),
            AssetStore::Cloudinary(_) => None,
        }
    }
}

// ============================================================================
// Local disk
// ============================================================================

#[derive(Debug, Clone)]
pub struct LocalAssets {
    upload_dir: PathBuf,
    /// `upload_dir` as a relative URL path, e.g. `public/temp`
    public_prefix: String,
}

impl LocalAssets {
    pub fn new(upload_dir: impl AsRef<Path>) -> Self {
        let upload_dir = upload_dir.as_ref().to_path_buf();
        let public_prefix = upload_dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        Self {
            upload_dir,
            public_prefix,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    fn mount_route(&self) -> String {
        if self.public_prefix.is_empty() {
            VIEW_ROUTE.to_string()
        } else {
            format!("{}/{}", VIEW_ROUTE, self.public_prefix)
        }
    }

    async fn upload(&self, file: UploadedFile, base_url: &str) -> AccountResult<UserLogo> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&file.file_name));
        let path = self.upload_dir.join(&stored_name);
        tokio::fs::write(&path, &file.bytes).await?;

        tracing::debug!(path = %path.display(), bytes = file.bytes.len(), "Stored avatar locally");

        let url = format!(
            "{}{}/{}",
            base_url.trim_end_matches('/'),
            self.mount_route(),
            stored_name
        );

        Ok(UserLogo::new(url, file.file_name))
    }

    async fn remove(&self, url: &str) -> AccountResult<()> {
        let Some(path) = self.path_for_url(url) else {
            tracing::warn!(url = %url, "Avatar URL does not point into the upload directory");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Avatar file already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Map a served URL back to its file; `None` if it points elsewhere
    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let mount = format!("{}/", self.mount_route());
        let (_, file_name) = url.split_once(&mount)?;

        let is_plain_name = !file_name.is_empty()
            && !file_name.contains(['/', '\\'])
            && file_name != "."
            && file_name != "..";

        is_plain_name.then(|| self.upload_dir.join(file_name))
    }
}

/// Keep only the final path component, with unusual characters replaced
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
