//! Dispatch configuration, supplied once when the dispatcher is built.

use serde::{Deserialize, Serialize};

/// Concurrency bound used when `max_concurrency` is left at zero.
pub const DEFAULT_MAX_CONCURRENCY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Drop commands addressed to another bot (`/cmd@other_bot`).
    pub restrict_mention: bool,
    /// Process non-command messages through the default chain. Only commands otherwise.
    pub allow_normal_messages: bool,
    /// Only process chats listed in `whitelist`.
    pub only_whitelist: bool,
    /// Drop chats listed in `blacklist`.
    pub use_blacklist: bool,
    pub whitelist: Vec<i64>,
    pub blacklist: Vec<i64>,
    /// Maximum number of chains executing at once; 0 means [`DEFAULT_MAX_CONCURRENCY`].
    pub max_concurrency: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            restrict_mention: true,
            allow_normal_messages: false,
            only_whitelist: false,
            use_blacklist: false,
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl DispatchConfig {
    pub fn effective_max_concurrency(&self) -> usize {
        if self.max_concurrency == 0 {
            DEFAULT_MAX_CONCURRENCY
        } else {
            self.max_concurrency
        }
    }
}
