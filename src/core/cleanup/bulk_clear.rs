// Bulk-clear selection - decides which recent messages `bc` may delete.
//
// NO Discord dependencies here; the command layer turns fetched messages
// into `MessageSnapshot`s and deletes whatever ids come back.

use chrono::{DateTime, Duration, Utc};

/// How many recent messages are inspected per invocation.
pub const FETCH_LIMIT: u8 = 100;

/// Only messages younger than this are deleted.
pub const MAX_MESSAGE_AGE_SECS: i64 = 180;

/// How long the "Cleared N messages." confirmation stays up.
pub const CONFIRMATION_LIFETIME: std::time::Duration = std::time::Duration::from_secs(3);

/// Command prefixes of common bots; messages starting with one of these are
/// treated as bot invocations and cleared along with bot output.
pub const COMMAND_PREFIXES: &[&str] = &[
    "$", ",", "-", "t!", "t@", "!", "+", "_", ";", ".", "?", "s?", "p!", "r.", "do.", "0", "$$",
    "&&", "a!", "b!", "c!", "d!", "e!", "f!", "g!", "h!", "i!", "j!", "k!", "l!", "m!", "n!",
    "o!", "q!", "r!", "s!", "u!", "v!", "w!", "x!", "y!", "z!", "/", "//", "\\", "=", ">", "->",
    "`", ", ", "|", "[", "]", "ay!", "r-", "r+",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Only this bot's own messages.
    OwnMessages,
    /// Any bot's messages plus anything that looks like a bot command.
    All,
}

impl ClearScope {
    /// `self` selects own messages; anything else (or nothing) means all.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("self") => ClearScope::OwnMessages,
            _ => ClearScope::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearScope::OwnMessages => "self",
            ClearScope::All => "all",
        }
    }
}

/// The parts of a message the selection cares about.
#[derive(Debug, Clone)]
pub struct MessageSnapshot {
    pub id: u64,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearSelection {
    /// Messages matching the scope, before the age cut.
    pub matched: usize,
    /// Ids that should actually be deleted.
    pub to_delete: Vec<u64>,
}

pub fn starts_with_command_prefix(content: &str) -> bool {
    COMMAND_PREFIXES
        .iter()
        .any(|prefix| content.starts_with(prefix))
}

pub fn matches_scope(message: &MessageSnapshot, scope: ClearScope, bot_id: u64) -> bool {
    match scope {
        ClearScope::OwnMessages => message.author_id == bot_id,
        ClearScope::All => message.author_is_bot || starts_with_command_prefix(&message.content),
    }
}

pub fn select_for_deletion(
    messages: &[MessageSnapshot],
    scope: ClearScope,
    bot_id: u64,
    now: DateTime<Utc>,
) -> ClearSelection {
    let cutoff = now - Duration::seconds(MAX_MESSAGE_AGE_SECS);

    let matched: Vec<&MessageSnapshot> = messages
        .iter()
        .filter(|m| matches_scope(m, scope, bot_id))
        .collect();

    let to_delete = matched
        .iter()
        .filter(|m| m.created_at > cutoff)
        .map(|m| m.id)
        .collect();

    ClearSelection {
        matched: matched.len(),
        to_delete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: u64 = 1;

    fn message(id: u64, author_id: u64, bot: bool, content: &str, age_secs: i64) -> MessageSnapshot {
        MessageSnapshot {
            id,
            author_id,
            author_is_bot: bot,
            content: content.to_string(),
            created_at: now() - Duration::seconds(age_secs),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!(ClearScope::from_arg(Some("self")), ClearScope::OwnMessages);
        assert_eq!(ClearScope::from_arg(Some("all")), ClearScope::All);
        assert_eq!(ClearScope::from_arg(Some("anything")), ClearScope::All);
        assert_eq!(ClearScope::from_arg(None), ClearScope::All);
    }

    #[test]
    fn test_self_scope_only_takes_own_recent_messages() {
        let messages = vec![
            message(1, BOT, true, "hello", 10),
            message(2, BOT, true, "old", 500),
            message(3, 2, true, "other bot", 10),
            message(4, 3, false, "!play", 10),
        ];

        let selection = select_for_deletion(&messages, ClearScope::OwnMessages, BOT, now());
        assert_eq!(selection.matched, 2);
        assert_eq!(selection.to_delete, vec![1]);
    }

    #[test]
    fn test_all_scope_takes_bots_and_prefixed_commands() {
        let messages = vec![
            message(1, 2, true, "any bot output", 10),
            message(2, 3, false, "!play song", 10),
            message(3, 3, false, "t!rank", 10),
            message(4, 3, false, "just chatting", 10),
            message(5, 3, false, "0 is a prefix too", 10),
        ];

        let selection = select_for_deletion(&messages, ClearScope::All, BOT, now());
        assert_eq!(selection.to_delete, vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_age_cutoff_is_exclusive() {
        let messages = vec![
            message(1, BOT, true, "edge", MAX_MESSAGE_AGE_SECS),
            message(2, BOT, true, "inside", MAX_MESSAGE_AGE_SECS - 1),
        ];

        let selection = select_for_deletion(&messages, ClearScope::All, BOT, now());
        assert_eq!(selection.matched, 2);
        assert_eq!(selection.to_delete, vec![2]);
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert!(!starts_with_command_prefix("hello there"));
        assert!(starts_with_command_prefix("->next"));
        assert!(starts_with_command_prefix("\\shrug"));
    }
}
