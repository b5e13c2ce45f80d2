// Environment-driven settings, read once at startup.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Create a .env file with your bot settings.")]
    Missing(&'static str),
    #[error("{name} must be a Discord user id, got {value:?}")]
    InvalidId { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub owner_id: u64,
    pub prefix: String,
    pub data_dir: PathBuf,
    pub managed_data_file: PathBuf,
    pub log_file: PathBuf,
    pub preview_dir: PathBuf,
    pub preview_font: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
        let owner_raw = get("OWNER_ID").ok_or(ConfigError::Missing("OWNER_ID"))?;
        let owner_id = owner_raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or(ConfigError::InvalidId {
                name: "OWNER_ID",
                value: owner_raw.clone(),
            })?;

        let data_dir = PathBuf::from(get("DATA_DIR").unwrap_or_else(|| "data".to_string()));
        let managed_data_file = get("MANAGED_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("managed.json"));
        let log_file = get("LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("bot.log"));

        Ok(Self {
            token,
            owner_id,
            prefix: get("BOT_PREFIX").unwrap_or_else(|| "!".to_string()),
            managed_data_file,
            log_file,
            preview_dir: PathBuf::from(get("PREVIEW_DIR").unwrap_or_else(|| "previews".to_string())),
            preview_font: PathBuf::from(
                get("PREVIEW_FONT").unwrap_or_else(|| "assets/preview.ttf".to_string()),
            ),
            data_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_fill_in_optional_values() {
        let config =
            BotConfig::from_lookup(lookup(&[("DISCORD_TOKEN", "abc"), ("OWNER_ID", "42")]))
                .unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.owner_id, 42);
        assert_eq!(config.prefix, "!");
        assert_eq!(config.managed_data_file, PathBuf::from("data/managed.json"));
        assert_eq!(config.log_file, PathBuf::from("data/bot.log"));
        assert_eq!(config.preview_dir, PathBuf::from("previews"));
        assert_eq!(config.preview_font, PathBuf::from("assets/preview.ttf"));
    }

    #[test]
    fn test_data_dir_moves_derived_files() {
        let config = BotConfig::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("OWNER_ID", "42"),
            ("DATA_DIR", "/var/lib/bot"),
            ("LOG_FILE", "/tmp/bot.log"),
        ]))
        .unwrap();

        assert_eq!(
            config.managed_data_file,
            PathBuf::from("/var/lib/bot/managed.json")
        );
        assert_eq!(config.log_file, PathBuf::from("/tmp/bot.log"));
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = BotConfig::from_lookup(lookup(&[("OWNER_ID", "42")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DISCORD_TOKEN"));
    }

    #[test]
    fn test_blank_owner_counts_as_missing() {
        let err = BotConfig::from_lookup(lookup(&[("DISCORD_TOKEN", "abc"), ("OWNER_ID", "  ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("OWNER_ID"));
    }

    #[test]
    fn test_non_numeric_owner_is_rejected() {
        let err = BotConfig::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("OWNER_ID", "not-a-user"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidId { name: "OWNER_ID", .. }));
    }
}
