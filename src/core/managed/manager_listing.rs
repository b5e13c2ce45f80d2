// Text for `/manager list`.

const BULLET: &str = "__**•**__  ";

/// A manager as resolved from the guild at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerName {
    Found {
        username: String,
        /// Legacy `#1234` tag; `None` for accounts on the new username system.
        discriminator: Option<u16>,
    },
    NotFound(u64),
}

impl ManagerName {
    pub fn line(&self) -> String {
        match self {
            ManagerName::Found {
                username,
                discriminator: Some(tag),
            } => format!("{BULLET}{username}#{tag:04}"),
            ManagerName::Found { username, .. } => format!("{BULLET}{username}"),
            ManagerName::NotFound(user_id) => format!("{BULLET}User Not Found ({user_id})"),
        }
    }
}

/// One role and the managers found for it.
#[derive(Debug, Clone)]
pub struct RoleManagersBlock {
    pub role_id: u64,
    pub managers: Vec<ManagerName>,
}

/// Build the embed description. `server_manager` should only be set when
/// the configured role still exists in the guild.
pub fn render_manager_listing(server_manager: Option<u64>, blocks: &[RoleManagersBlock]) -> String {
    let mut sections = Vec::new();

    if let Some(role_id) = server_manager {
        sections.push(format!("**Server Managers**: <@&{role_id}>"));
    }

    for block in blocks.iter().filter(|b| !b.managers.is_empty()) {
        let lines: Vec<String> = block.managers.iter().map(ManagerName::line).collect();
        sections.push(format!("**Role**: <@&{}>\n{}", block.role_id, lines.join("\n")));
    }

    if sections.is_empty() {
        "No role managers have been added.".to_string()
    } else {
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_listing() {
        assert_eq!(
            render_manager_listing(None, &[]),
            "No role managers have been added."
        );
    }

    #[test]
    fn test_listing_layout() {
        let blocks = vec![RoleManagersBlock {
            role_id: 10,
            managers: vec![
                ManagerName::Found {
                    username: "alice".into(),
                    discriminator: None,
                },
                ManagerName::Found {
                    username: "bob".into(),
                    discriminator: Some(7),
                },
                ManagerName::NotFound(99),
            ],
        }];

        let text = render_manager_listing(Some(5), &blocks);
        assert_eq!(
            text,
            "**Server Managers**: <@&5>\n\n\
             **Role**: <@&10>\n\
             __**•**__  alice\n\
             __**•**__  bob#0007\n\
             __**•**__  User Not Found (99)"
        );
    }
}
