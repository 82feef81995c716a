/**
 * Media Store
 *
 * Accepts attachment buffers and hands back public URLs; deletes by URL.
 * `LocalMediaStore` keeps files under a directory that the router serves at
 * `/media`, so a URL is `{public_url}/{kind}/{uuid}.{ext}`.
 */

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::messaging::MediaKind;

/// One attachment as received from the client
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

impl MediaUpload {
    pub fn new(file_name: Option<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name,
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store the buffer and return its public URL
    async fn upload(&self, upload: &MediaUpload, kind: MediaKind) -> BackendResult<String>;

    /// Delete the object behind a URL previously returned by `upload`.
    /// Removing something that is already gone succeeds.
    async fn remove(&self, url: &str) -> BackendResult<()>;
}

/// Media store on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_url: String,
}

impl LocalMediaStore {
    pub async fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> BackendResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            BackendError::upstream("media", format!("cannot create {}: {}", root.display(), e))
        })?;
        tracing::info!("[Media] Storing uploads under {}", root.display());

        Ok(Self {
            root,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a public URL back to a file under the root, refusing anything
    /// that would escape it.
    fn path_for_url(&self, url: &str) -> BackendResult<PathBuf> {
        let relative = url
            .strip_prefix(&self.public_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| BackendError::upstream("media", format!("not a local media URL: {}", url)))?;

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                _ => {
                    return Err(BackendError::upstream(
                        "media",
                        format!("path traversal detected in {}", url),
                    ))
                }
            }
        }
        Ok(resolved)
    }
}

/// File extension for the stored object: the client's own if it is plain
/// alphanumeric, otherwise the MIME subtype.
fn extension_for(upload: &MediaUpload) -> String {
    let from_name = upload
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str());
    let from_mime = upload
        .content_type
        .split(';')
        .next()
        .and_then(|mime| mime.split('/').nth(1));

    from_name
        .or(from_mime)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(&self, upload: &MediaUpload, kind: MediaKind) -> BackendResult<String> {
        let relative = format!("{}/{}.{}", kind.as_str(), Uuid::new_v4(), extension_for(upload));
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BackendError::upstream("media", e.to_string()))?;
        }
        fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| BackendError::upstream("media", format!("failed to write {}: {}", relative, e)))?;

        tracing::debug!("[Media] Stored {} ({} bytes)", relative, upload.bytes.len());
        Ok(format!("{}/{}", self.public_url, relative))
    }

    async fn remove(&self, url: &str) -> BackendResult<()> {
        let path = self.path_for_url(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("[Media] Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::upstream("media", format!("failed to remove {}: {}", url, e))),
        }
    }
}
