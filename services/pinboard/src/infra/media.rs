use std::path::{Path, PathBuf};

use anyhow::Context as _;
use uuid::Uuid;

use crate::error::PinboardError;

/// Upload folders under the media root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pin,
    ProfilePhoto,
    BoardCover,
}

impl MediaKind {
    fn folder(self) -> &'static str {
        match self {
            MediaKind::Pin => "pins",
            MediaKind::ProfilePhoto => "profiles",
            MediaKind::BoardCover => "boards",
        }
    }
}

/// Stores uploads on local disk; files are served back under `/media/`.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a fresh name and return the path relative to the root.
    ///
    /// The extension of `original_name` is kept (lowercased) so the media type
    /// can still be told from the stored name.
    pub async fn save(
        &self,
        kind: MediaKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, PinboardError> {
        let name = match extension_of(original_name) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let relative = format!("{}/{name}", kind.folder());

        let dir = self.root.join(kind.folder());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create media dir {}", dir.display()))?;
        tokio::fs::write(dir.join(&name), bytes)
            .await
            .with_context(|| format!("write media file {relative}"))?;
        tracing::debug!(file = %relative, size = bytes.len(), "media stored");
        Ok(relative)
    }
}

/// Public URL of a stored file.
pub fn media_url(relative: &str) -> String {
    format!("/media/{relative}")
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
