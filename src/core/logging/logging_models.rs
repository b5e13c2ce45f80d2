use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A legacy prefix command invocation (`!bc self`).
#[derive(Debug, Clone)]
pub struct PrefixInvocation {
    pub command_name: String,
    pub args: Vec<String>,
    pub author_id: u64,
    pub author_name: String,
    pub channel_id: u64,
}

/// A slash command invocation.
#[derive(Debug, Clone)]
pub struct SlashInvocation {
    pub command_name: String,
    pub user_id: u64,
    pub user_name: String,
    pub channel_id: u64,
    /// Guild name and id, when invoked in a guild the cache knows about.
    pub guild: Option<(String, u64)>,
}

/// Where a log event came from; decides which extra lines and reports it gets.
#[derive(Debug, Clone, Default)]
pub enum CommandOrigin {
    #[default]
    Unknown,
    Prefix(PrefixInvocation),
    Slash(SlashInvocation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportField {
    pub name: String,
    pub value: String,
}

/// Error summary delivered to the bot owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub title: String,
    pub fields: Vec<ReportField>,
}

impl ErrorReport {
    fn new(title: String) -> Self {
        Self {
            title,
            fields: Vec::new(),
        }
    }

    fn field(mut self, name: &str, value: String) -> Self {
        self.fields.push(ReportField {
            name: name.to_string(),
            value,
        });
        self
    }

    pub fn for_prefix(invocation: &PrefixInvocation, message: &str) -> Self {
        Self::new(format!(
            "Error in prefix command: {}",
            invocation.command_name
        ))
        .field(
            "User",
            format!("{} <@{}>", invocation.author_name, invocation.author_id),
        )
        .field(
            "Channel",
            format!("<#{0}> (ID: {0})", invocation.channel_id),
        )
        .field("Error", message.to_string())
    }

    pub fn for_slash(invocation: &SlashInvocation, message: &str) -> Self {
        let server = invocation
            .guild
            .as_ref()
            .map(|(name, id)| format!("{name} | {id}"))
            .unwrap_or_else(|| "N/A".to_string());

        Self::new(format!(
            "Error in slash command: {}",
            invocation.command_name
        ))
        .field(
            "User",
            format!("{} <@{}>", invocation.user_name, invocation.user_id),
        )
        .field(
            "Channel",
            format!("<#{0}> (ID: {0})", invocation.channel_id),
        )
        .field("Server", server)
        .field("Error", message.to_string())
    }
}

/// `[2024-01-01T00:00:00.000Z] [INFO] message`
pub fn format_log_line(level: LogLevel, timestamp: DateTime<Utc>, message: &str) -> String {
    format!(
        "[{}] [{}] {}\n",
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        level,
        message
    )
}

pub fn prefix_detail_line(invocation: &PrefixInvocation) -> String {
    format!(
        "Prefix Command: {}, Args: {}, User: {}, Channel: {}\n",
        invocation.command_name,
        invocation.args.join(" "),
        invocation.author_id,
        invocation.channel_id
    )
}

pub fn prefix_error_line(invocation: &PrefixInvocation, message: &str) -> String {
    format!(
        "Error in prefix command: {}, User: {}, Channel: {}, Error: {}\n",
        invocation.command_name, invocation.author_id, invocation.channel_id, message
    )
}
