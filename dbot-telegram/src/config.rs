//! Transport config: token, API URL, log file, long-poll settings and the dispatch options.
//! Loaded from environment variables; see [`TelegramConfig::from_env`].

use anyhow::{Context as _, Result};
use handler_chain::DispatchConfig;
use std::env;
use teloxide::types::ParseMode;

/// Long-poll timeout used when `POLL_TIMEOUT_SECS` is unset.
pub const DEFAULT_POLL_TIMEOUT_SECS: u32 = 60;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub log_file: Option<String>,
    /// Seconds the Bot API may hold a getUpdates request open.
    pub poll_timeout_secs: u32,
    /// Log every raw update at debug level.
    pub debug: bool,
    /// Parse mode for outbound text; `None` sends plain text.
    pub parse_mode: Option<ParseMode>,
    pub dispatch: DispatchConfig,
}

impl TelegramConfig {
    /// Loads from environment. BOT_TOKEN is required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Like [`from_env`](Self::from_env), but `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let mut config = Self::with_token(bot_token);

        config.telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        config.log_file = env::var("LOG_FILE").ok();
        if let Some(secs) = env_parsed::<u32>("POLL_TIMEOUT_SECS")? {
            config.poll_timeout_secs = secs;
        }
        config.debug = env_bool("TELEGRAM_DEBUG", false)?;
        if let Ok(mode) = env::var("TELEGRAM_PARSE_MODE") {
            config.parse_mode = parse_parse_mode(&mode)?;
        }

        let dispatch = &mut config.dispatch;
        dispatch.restrict_mention = env_bool("RESTRICT_MENTION", dispatch.restrict_mention)?;
        dispatch.allow_normal_messages =
            env_bool("ALLOW_NORMAL_MESSAGES", dispatch.allow_normal_messages)?;
        dispatch.only_whitelist = env_bool("ONLY_WHITELIST", dispatch.only_whitelist)?;
        dispatch.use_blacklist = env_bool("USE_BLACKLIST", dispatch.use_blacklist)?;
        dispatch.whitelist = env_id_list("WHITELIST_CHAT_IDS")?;
        dispatch.blacklist = env_id_list("BLACKLIST_CHAT_IDS")?;
        if let Some(n) = env_parsed::<usize>("MAX_CONCURRENCY")? {
            dispatch.max_concurrency = n;
        }

        Ok(config)
    }

    /// Uses the given token; every other field takes its default. Outbound text is sent as HTML.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            log_file: None,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            debug: false,
            parse_mode: Some(ParseMode::Html),
            dispatch: DispatchConfig::default(),
        }
    }

    /// Token must be non-empty; telegram_api_url must be a valid URL if set.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}

/// Maps `markdown`, `markdownv2`, `html` or `none` (case-insensitive) to a teloxide parse mode.
#[allow(deprecated)]
pub fn parse_parse_mode(value: &str) -> Result<Option<ParseMode>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "markdown" => Ok(Some(ParseMode::Markdown)),
        "markdownv2" => Ok(Some(ParseMode::MarkdownV2)),
        "html" => Ok(Some(ParseMode::Html)),
        "none" | "" => Ok(None),
        other => anyhow::bail!("unknown TELEGRAM_PARSE_MODE: {}", other),
    }
}

fn env_bool(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            "" => Ok(default),
            other => anyhow::bail!("{} must be a boolean, got {:?}", name, other),
        },
    }
}

fn env_parsed<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Err(_) => Ok(None),
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} is not a valid number: {:?}", name, raw)),
    }
}

/// Comma-separated chat ids; blank entries are skipped.
fn env_id_list(name: &str) -> Result<Vec<i64>> {
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(_) => return Ok(Vec::new()),
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("{} contains an invalid chat id: {:?}", name, s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "BOT_TOKEN",
        "TELEGRAM_API_URL",
        "TELOXIDE_API_URL",
        "LOG_FILE",
        "POLL_TIMEOUT_SECS",
        "TELEGRAM_DEBUG",
        "TELEGRAM_PARSE_MODE",
        "RESTRICT_MENTION",
        "ALLOW_NORMAL_MESSAGES",
        "ONLY_WHITELIST",
        "USE_BLACKLIST",
        "WHITELIST_CHAT_IDS",
        "BLACKLIST_CHAT_IDS",
        "MAX_CONCURRENCY",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_with_token() {
        let config = TelegramConfig::with_token("test_token".to_string());
        assert_eq!(config.bot_token, "test_token");
        assert!(config.telegram_api_url.is_none());
        assert!(config.log_file.is_none());
        assert_eq!(config.poll_timeout_secs, 60);
        assert_eq!(config.parse_mode, Some(ParseMode::Html));
        assert_eq!(config.dispatch, DispatchConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_requires_token() {
        clear_env();
        let err = TelegramConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    #[serial]
    fn test_load_token_overrides_env() {
        clear_env();
        env::set_var("BOT_TOKEN", "from_env");
        let config = TelegramConfig::load(Some("from_cli".to_string())).unwrap();
        assert_eq!(config.bot_token, "from_cli");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        env::set_var("BOT_TOKEN", "token");

        let config = TelegramConfig::from_env().unwrap();
        assert_eq!(config.bot_token, "token");
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
        assert_eq!(config.parse_mode, Some(ParseMode::Html));
        assert!(!config.debug);
        assert!(config.dispatch.restrict_mention);
        assert!(!config.dispatch.allow_normal_messages);
        assert!(config.dispatch.whitelist.is_empty());
        assert_eq!(config.dispatch.effective_max_concurrency(), 1000);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_custom_values() {
        clear_env();
        env::set_var("BOT_TOKEN", "token");
        env::set_var("TELOXIDE_API_URL", "http://localhost:8081");
        env::set_var("POLL_TIMEOUT_SECS", "30");
        env::set_var("TELEGRAM_DEBUG", "true");
        env::set_var("TELEGRAM_PARSE_MODE", "none");
        env::set_var("RESTRICT_MENTION", "false");
        env::set_var("ALLOW_NORMAL_MESSAGES", "1");
        env::set_var("ONLY_WHITELIST", "yes");
        env::set_var("WHITELIST_CHAT_IDS", "1, -1002, ,3");
        env::set_var("MAX_CONCURRENCY", "8");

        let config = TelegramConfig::from_env().unwrap();
        assert_eq!(config.telegram_api_url.as_deref(), Some("http://localhost:8081"));
        assert_eq!(config.poll_timeout_secs, 30);
        assert!(config.debug);
        assert!(config.parse_mode.is_none());
        assert!(!config.dispatch.restrict_mention);
        assert!(config.dispatch.allow_normal_messages);
        assert!(config.dispatch.only_whitelist);
        assert_eq!(config.dispatch.whitelist, vec![1, -1002, 3]);
        assert_eq!(config.dispatch.max_concurrency, 8);
        assert!(config.validate().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        env::set_var("BOT_TOKEN", "token");
        env::set_var("BLACKLIST_CHAT_IDS", "12,abc");
        assert!(TelegramConfig::from_env().is_err());

        env::remove_var("BLACKLIST_CHAT_IDS");
        env::set_var("USE_BLACKLIST", "maybe");
        assert!(TelegramConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    fn test_validate() {
        let mut config = TelegramConfig::with_token("token".to_string());
        config.telegram_api_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        let config = TelegramConfig::with_token("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_parse_mode() {
        assert_eq!(parse_parse_mode("HTML").unwrap(), Some(ParseMode::Html));
        assert_eq!(
            parse_parse_mode("markdownv2").unwrap(),
            Some(ParseMode::MarkdownV2)
        );
        assert_eq!(parse_parse_mode("none").unwrap(), None);
        assert!(parse_parse_mode("rtf").is_err());
    }
}
