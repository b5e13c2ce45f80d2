// Managed-role domain models.
//
// The on-disk shape is the one the bot has always written:
// { "<guild_id>": { "<role_id>": ["<user_id>", ...], "server_manager": "<role_id>" } }
// Snowflakes are stored as strings. In memory we keep typed ids and a
// separate slot for the server manager role.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved key holding the guild's server-manager role id.
pub const SERVER_MANAGER_KEY: &str = "server_manager";

/// Every guild's managed-role mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagedData {
    pub guilds: BTreeMap<u64, GuildManaged>,
}

impl ManagedData {
    pub fn guild(&self, guild_id: u64) -> Option<&GuildManaged> {
        self.guilds.get(&guild_id)
    }

    /// Get the guild entry, creating an empty one on first access.
    pub fn guild_mut(&mut self, guild_id: u64) -> &mut GuildManaged {
        self.guilds.entry(guild_id).or_default()
    }
}

/// Managed-role state for a single guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGuildEntries", into = "RawGuildEntries")]
pub struct GuildManaged {
    /// Role whose holders act as administrators for role management.
    pub server_manager: Option<u64>,
    /// Role id -> users allowed to hand that role out.
    pub role_managers: BTreeMap<u64, Vec<u64>>,
}

impl GuildManaged {
    pub fn managers_of(&self, role_id: u64) -> &[u64] {
        self.role_managers
            .get(&role_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_managed(&self, role_id: u64) -> bool {
        self.role_managers.contains_key(&role_id)
    }

    pub fn is_manager(&self, role_id: u64, user_id: u64) -> bool {
        self.managers_of(role_id).contains(&user_id)
    }
}

/// Minimal view of a guild role, enough to order and filter roles
/// without touching Discord types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    pub id: u64,
    pub position: u16,
    /// Integration-owned (bot, booster, ...) roles can't be handed out.
    pub managed: bool,
}

/// Non-integration roles that have managers, highest in the hierarchy first.
pub fn managed_roles_by_hierarchy<'a>(
    roles: &'a [RoleSummary],
    guild: &GuildManaged,
) -> Vec<&'a RoleSummary> {
    let mut ordered: Vec<&RoleSummary> = roles
        .iter()
        .filter(|role| !role.managed && guild.is_managed(role.id))
        .collect();
    ordered.sort_by(|a, b| b.position.cmp(&a.position));
    ordered
}

// ============================================================================
// JSON REPRESENTATION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn parse(&self) -> Result<u64, String> {
        match self {
            RawId::Text(text) => text
                .parse()
                .map_err(|_| format!("invalid snowflake {text:?}")),
            RawId::Number(id) => Ok(*id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Managers(Vec<RawId>),
    Role(RawId),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct RawGuildEntries(BTreeMap<String, RawEntry>);

impl TryFrom<RawGuildEntries> for GuildManaged {
    type Error = String;

    fn try_from(raw: RawGuildEntries) -> Result<Self, Self::Error> {
        let mut guild = GuildManaged::default();
        for (key, entry) in raw.0 {
            match (key.as_str(), entry) {
                (SERVER_MANAGER_KEY, RawEntry::Role(id)) => {
                    guild.server_manager = Some(id.parse()?);
                }
                (SERVER_MANAGER_KEY, RawEntry::Managers(_)) => {
                    return Err(format!("{SERVER_MANAGER_KEY} must be a single role id"));
                }
                (role, RawEntry::Managers(users)) => {
                    let role_id: u64 = role
                        .parse()
                        .map_err(|_| format!("invalid role id {role:?}"))?;
                    let users = users
                        .iter()
                        .map(RawId::parse)
                        .collect::<Result<Vec<_>, _>>()?;
                    guild.role_managers.insert(role_id, users);
                }
                (role, RawEntry::Role(_)) => {
                    return Err(format!("role {role:?} must map to a list of user ids"));
                }
            }
        }
        Ok(guild)
    }
}

impl From<GuildManaged> for RawGuildEntries {
    fn from(guild: GuildManaged) -> Self {
        let mut raw: BTreeMap<String, RawEntry> = guild
            .role_managers
            .into_iter()
            .map(|(role_id, users)| {
                let users = users
                    .into_iter()
                    .map(|id| RawId::Text(id.to_string()))
                    .collect();
                (role_id.to_string(), RawEntry::Managers(users))
            })
            .collect();

        if let Some(role_id) = guild.server_manager {
            raw.insert(
                SERVER_MANAGER_KEY.to_string(),
                RawEntry::Role(RawId::Text(role_id.to_string())),
            );
        }

        RawGuildEntries(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_legacy_layout() {
        let json = r#"{
            "111": {
                "222": ["333", "444"],
                "server_manager": "555"
            }
        }"#;

        let data: ManagedData = serde_json::from_str(json).unwrap();
        let guild = data.guild(111).unwrap();
        assert_eq!(guild.server_manager, Some(555));
        assert_eq!(guild.managers_of(222), &[333, 444]);
        assert!(guild.is_manager(222, 444));
        assert!(!guild.is_manager(222, 555));
    }

    #[test]
    fn test_writes_snowflakes_as_strings() {
        let mut data = ManagedData::default();
        let guild = data.guild_mut(1);
        guild.server_manager = Some(9);
        guild.role_managers.insert(2, vec![3]);

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["1"]["2"], serde_json::json!(["3"]));
        assert_eq!(value["1"][SERVER_MANAGER_KEY], serde_json::json!("9"));
    }

    #[test]
    fn test_rejects_list_for_server_manager() {
        let json = r#"{ "1": { "server_manager": ["2"] } }"#;
        assert!(serde_json::from_str::<ManagedData>(json).is_err());
    }

    #[test]
    fn test_hierarchy_skips_integration_and_unmanaged_roles() {
        let mut guild = GuildManaged::default();
        guild.role_managers.insert(10, vec![1]);
        guild.role_managers.insert(20, vec![1]);
        guild.role_managers.insert(30, vec![1]);

        let roles = vec![
            RoleSummary { id: 10, position: 1, managed: false },
            RoleSummary { id: 20, position: 5, managed: false },
            RoleSummary { id: 30, position: 9, managed: true },
            RoleSummary { id: 40, position: 7, managed: false },
        ];

        let ordered: Vec<u64> = managed_roles_by_hierarchy(&roles, &guild)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ordered, vec![20, 10]);
    }
}
