//! Persisted session credentials
//!
//! The session is a single JSON file holding the token and the user it was
//! issued to. It is written through a temporary file and renamed into place
//! so a crash never leaves half a token behind.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use domain::{AuthResponse, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::ClientResult;

/// User fields kept alongside the token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub user: StoredUser,
    pub role: Role,
}

impl From<&AuthResponse> for Credentials {
    fn from(auth: &AuthResponse) -> Self {
        Self {
            token: auth.token.clone(),
            user: StoredUser {
                id: auth.id,
                name: auth.name.clone(),
                email: auth.email.clone(),
                profile_picture: auth.profile_picture.clone(),
            },
            role: auth.role,
        }
    }
}

/// Where the client keeps its session between runs
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> ClientResult<Option<Credentials>>;
    async fn save(&self, credentials: &Credentials) -> ClientResult<()>;
    async fn clear(&self) -> ClientResult<()>;
}

/// JSON file backed credential store
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> ClientResult<Option<Credentials>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, credentials: &Credentials) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(credentials)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Saved credentials for {}", credentials.user.email);
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Cleared stored credentials");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
