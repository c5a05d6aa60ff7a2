//! Local disk storage for uploaded photos

use std::{
    io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::info;
use uuid::Uuid;

use crate::forms::UploadedFile;

/// URL prefix under which the upload root is served
pub const PUBLIC_PREFIX: &str = "uploads";

/// What a photo belongs to; decides its directory and file name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    Menu,
    Restaurant,
    Review,
}

impl PhotoKind {
    fn directory(&self) -> &'static str {
        match self {
            PhotoKind::Menu => "menus",
            PhotoKind::Restaurant => "restaurants",
            PhotoKind::Review => "reviews",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            PhotoKind::Menu => "menu",
            PhotoKind::Restaurant => "restaurant",
            PhotoKind::Review => "review",
        }
    }
}

/// Writes photos below a root directory
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
}

impl PhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a photo and return its public path, e.g.
    /// `uploads/menus/menu-1718000000000-<uuid>.jpg`
    pub async fn save(&self, kind: PhotoKind, file: &UploadedFile) -> io::Result<String> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let file_name = format!(
            "{}-{}-{}.{}",
            kind.prefix(),
            millis,
            Uuid::new_v4(),
            file.extension
        );

        let directory = self.root.join(kind.directory());
        tokio::fs::create_dir_all(&directory).await?;
        tokio::fs::write(directory.join(&file_name), &file.bytes).await?;

        let public = format!("{PUBLIC_PREFIX}/{}/{file_name}", kind.directory());
        info!(
            "Stored {} photo {} ({}, {} bytes) at {}",
            kind.prefix(),
            file.file_name,
            file.content_type,
            file.bytes.len(),
            public
        );
        Ok(public)
    }

    /// Delete a photo by the public path `save` returned
    pub async fn remove(&self, public: &str) -> io::Result<()> {
        let relative = public
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("not an upload path: {public}"))
            })?;
        tokio::fs::remove_file(self.root.join(relative)).await
    }
}
