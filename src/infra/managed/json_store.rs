use crate::core::managed::{ManagedData, ManagedStore, StoreError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// JSON file store for the managed-role mapping.
///
/// Saves go to a sibling `.tmp` file first and are renamed into place, so a
/// failed write leaves the previous file intact.
pub struct JsonManagedStore {
    path: PathBuf,
}

impl JsonManagedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl ManagedStore for JsonManagedStore {
    async fn load(&self) -> Result<ManagedData, StoreError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(ManagedData::default());
        }

        let text = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn save(&self, data: &ManagedData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let text = serde_json::to_string_pretty(data)?;
        let staging = self.staging_path();
        fs::write(&staging, text).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}
