use std::path::PathBuf;

use crate::{error::ControlError, types::Credential};

/// Persists the single cached credential as pretty JSON.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        CredentialStore { path }
    }

    /// Reads the cached credential. A missing file is `Ok(None)`.
    pub async fn load(&self) -> Result<Option<Credential>, ControlError> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| ControlError::Storage(e.to_string()))?;
        let credential: Credential =
            serde_json::from_str(&content).map_err(|e| ControlError::Storage(e.to_string()))?;
        Ok(Some(credential))
    }

    pub async fn persist(&self, credential: &Credential) -> Result<(), ControlError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| ControlError::Storage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(credential)
            .map_err(|e| ControlError::Storage(e.to_string()))?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| ControlError::Storage(e.to_string()))
    }

    pub async fn clear(&self) -> Result<(), ControlError> {
        if !self.path.exists() {
            return Ok(());
        }
        async_fs::remove_file(&self.path)
            .await
            .map_err(|e| ControlError::Storage(e.to_string()))
    }
}
