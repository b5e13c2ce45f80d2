// Authorization rules for every command.
//
// Each predicate mirrors the gate a command has always used. The manager
// command has two gates for add/remove that don't agree with each other:
// the outer one lets administrators through, the inner one lets the bot
// owner through instead. Both are kept as-is; a caller has to pass both.

use super::managed_models::GuildManaged;

/// Who is running a command, flattened out of Discord's member/permission types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invoker {
    pub user_id: u64,
    pub is_guild_owner: bool,
    pub is_administrator: bool,
    pub can_manage_messages: bool,
    pub role_ids: Vec<u64>,
}

impl Invoker {
    pub fn holds_role(&self, role_id: u64) -> bool {
        self.role_ids.contains(&role_id)
    }

    pub fn is_server_manager(&self, guild: &GuildManaged) -> bool {
        guild
            .server_manager
            .is_some_and(|role_id| self.holds_role(role_id))
    }
}

/// Global access rules, parameterised by the configured bot owner.
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy {
    owner_id: u64,
}

impl AccessPolicy {
    pub fn new(owner_id: u64) -> Self {
        Self { owner_id }
    }

    pub fn is_bot_owner(&self, user_id: u64) -> bool {
        user_id == self.owner_id
    }

    /// `bc`: manage-messages permission or the bot owner.
    pub fn can_bulk_clear(&self, invoker: &Invoker) -> bool {
        invoker.can_manage_messages || self.is_bot_owner(invoker.user_id)
    }

    /// First gate of `manager add|remove`.
    pub fn can_edit_managers(&self, invoker: &Invoker, guild: &GuildManaged) -> bool {
        invoker.is_guild_owner || invoker.is_server_manager(guild) || invoker.is_administrator
    }

    /// Second gate of `manager add|remove`, checked after [`can_edit_managers`](Self::can_edit_managers).
    pub fn can_commit_manager_change(&self, invoker: &Invoker, guild: &GuildManaged) -> bool {
        invoker.is_guild_owner
            || invoker.is_server_manager(guild)
            || self.is_bot_owner(invoker.user_id)
    }

    /// `manager admin`.
    pub fn can_set_server_manager(&self, invoker: &Invoker) -> bool {
        invoker.is_guild_owner || invoker.is_administrator
    }

    /// `role add|remove|customize` for a specific role.
    pub fn can_manage_role(&self, invoker: &Invoker, guild: &GuildManaged, role_id: u64) -> bool {
        guild.is_manager(role_id, invoker.user_id)
            || invoker.is_server_manager(guild)
            || invoker.is_guild_owner
            || invoker.is_administrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: u64 = 1;

    fn guild_with_server_manager(role_id: u64) -> GuildManaged {
        GuildManaged {
            server_manager: Some(role_id),
            ..Default::default()
        }
    }

    #[test]
    fn test_bulk_clear_requires_permission_or_owner() {
        let policy = AccessPolicy::new(OWNER);

        let nobody = Invoker { user_id: 5, ..Default::default() };
        let moderator = Invoker { user_id: 5, can_manage_messages: true, ..Default::default() };
        let owner = Invoker { user_id: OWNER, ..Default::default() };

        assert!(!policy.can_bulk_clear(&nobody));
        assert!(policy.can_bulk_clear(&moderator));
        assert!(policy.can_bulk_clear(&owner));
    }

    #[test]
    fn test_manager_gates_disagree_on_admin_and_owner() {
        let policy = AccessPolicy::new(OWNER);
        let guild = GuildManaged::default();

        // Administrators pass the first gate but not the second.
        let admin = Invoker { user_id: 5, is_administrator: true, ..Default::default() };
        assert!(policy.can_edit_managers(&admin, &guild));
        assert!(!policy.can_commit_manager_change(&admin, &guild));

        // The bot owner passes the second gate but not the first.
        let owner = Invoker { user_id: OWNER, ..Default::default() };
        assert!(!policy.can_edit_managers(&owner, &guild));
        assert!(policy.can_commit_manager_change(&owner, &guild));
    }

    #[test]
    fn test_server_manager_role_passes_both_gates() {
        let policy = AccessPolicy::new(OWNER);
        let guild = guild_with_server_manager(42);
        let invoker = Invoker { user_id: 5, role_ids: vec![42], ..Default::default() };

        assert!(policy.can_edit_managers(&invoker, &guild));
        assert!(policy.can_commit_manager_change(&invoker, &guild));
        assert!(!policy.can_set_server_manager(&invoker));
    }

    #[test]
    fn test_role_manager_can_only_manage_their_role() {
        let policy = AccessPolicy::new(OWNER);
        let mut guild = GuildManaged::default();
        guild.role_managers.insert(10, vec![5]);

        let invoker = Invoker { user_id: 5, ..Default::default() };
        assert!(policy.can_manage_role(&invoker, &guild, 10));
        assert!(!policy.can_manage_role(&invoker, &guild, 11));

        let guild_owner = Invoker { user_id: 6, is_guild_owner: true, ..Default::default() };
        assert!(policy.can_manage_role(&guild_owner, &guild, 11));
    }
}
