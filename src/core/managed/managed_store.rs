use super::managed_models::ManagedData;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence port for the managed-role mapping.
///
/// The mapping is small, so stores deal in whole snapshots: `load` reads
/// everything, `save` replaces everything.
#[async_trait]
pub trait ManagedStore: Send + Sync {
    async fn load(&self) -> Result<ManagedData, StoreError>;
    async fn save(&self, data: &ManagedData) -> Result<(), StoreError>;
}
