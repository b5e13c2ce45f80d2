// Managed-role service - the single owner of the role-manager mapping.
//
// Every command reads and mutates the same in-memory copy. Mutations only
// touch memory; `save` writes the snapshot while still holding the lock, so
// concurrent commands are serialized and no write can clobber another.

use super::managed_models::{GuildManaged, ManagedData};
use super::managed_store::{ManagedStore, StoreError};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddManagerOutcome {
    Added,
    AlreadyManager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveManagerOutcome {
    /// `role_cleared` is set when the last manager left and the role entry was dropped.
    Removed { role_cleared: bool },
    NotManager,
    RoleNotManaged,
}

pub struct ManagedRoleService<S: ManagedStore> {
    store: S,
    data: Mutex<ManagedData>,
}

impl<S: ManagedStore> ManagedRoleService<S> {
    /// Create an empty service. Call [`reload`](Self::reload) to pull in persisted state.
    pub fn new(store: S) -> Self {
        Self {
            store,
            data: Mutex::new(ManagedData::default()),
        }
    }

    /// Replace the in-memory mapping with what the store holds.
    /// On failure the current mapping is left untouched.
    pub async fn reload(&self) -> Result<(), StoreError> {
        let loaded = self.store.load().await?;
        *self.data.lock().await = loaded;
        Ok(())
    }

    /// Write the current mapping to the store.
    pub async fn save(&self) -> Result<(), StoreError> {
        let data = self.data.lock().await;
        self.store.save(&data).await
    }

    /// Make sure the guild has an entry, even if nothing is managed yet.
    pub async fn ensure_guild(&self, guild_id: u64) {
        self.data.lock().await.guild_mut(guild_id);
    }

    /// Copy of a guild's mapping; empty when the guild was never configured.
    pub async fn guild_snapshot(&self, guild_id: u64) -> GuildManaged {
        self.data
            .lock()
            .await
            .guild(guild_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn add_manager(&self, guild_id: u64, role_id: u64, user_id: u64) -> AddManagerOutcome {
        let mut data = self.data.lock().await;
        let managers = data
            .guild_mut(guild_id)
            .role_managers
            .entry(role_id)
            .or_default();

        if managers.contains(&user_id) {
            AddManagerOutcome::AlreadyManager
        } else {
            managers.push(user_id);
            AddManagerOutcome::Added
        }
    }

    pub async fn remove_manager(
        &self,
        guild_id: u64,
        role_id: u64,
        user_id: u64,
    ) -> RemoveManagerOutcome {
        let mut data = self.data.lock().await;
        let guild = data.guild_mut(guild_id);

        let Some(managers) = guild.role_managers.get_mut(&role_id) else {
            return RemoveManagerOutcome::RoleNotManaged;
        };

        if !managers.contains(&user_id) {
            return RemoveManagerOutcome::NotManager;
        }

        managers.retain(|id| *id != user_id);
        let role_cleared = managers.is_empty();
        if role_cleared {
            guild.role_managers.remove(&role_id);
        }

        RemoveManagerOutcome::Removed { role_cleared }
    }

    pub async fn set_server_manager(&self, guild_id: u64, role_id: u64) {
        self.data.lock().await.guild_mut(guild_id).server_manager = Some(role_id);
    }
}
