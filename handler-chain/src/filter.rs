//! Admission filter: chat lists, plain-message admission and mention restriction.
//!
//! Pure function of the update, the configuration and the bot's own username. Rules are applied
//! in a fixed order and the first matching rule decides.

use std::collections::HashSet;

use dbot_core::Update;

use crate::config::DispatchConfig;

/// Why the filter admitted or rejected an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Admit,
    Blacklisted,
    NotWhitelisted,
    NormalMessagesDisabled,
    /// Command addressed to a different bot.
    OtherBotMentioned,
}

impl FilterDecision {
    pub fn is_admitted(self) -> bool {
        self == FilterDecision::Admit
    }
}

#[derive(Debug, Clone)]
pub struct Filter {
    restrict_mention: bool,
    allow_normal_messages: bool,
    only_whitelist: bool,
    use_blacklist: bool,
    whitelist: HashSet<i64>,
    blacklist: HashSet<i64>,
    bot_username: String,
}

impl Filter {
    /// Builds the filter; the chat lists are copied into sets and never change afterwards.
    pub fn new(config: &DispatchConfig, bot_username: impl Into<String>) -> Self {
        Self {
            restrict_mention: config.restrict_mention,
            allow_normal_messages: config.allow_normal_messages,
            only_whitelist: config.only_whitelist,
            use_blacklist: config.use_blacklist,
            whitelist: config.whitelist.iter().copied().collect(),
            blacklist: config.blacklist.iter().copied().collect(),
            bot_username: bot_username.into(),
        }
    }

    pub fn check(&self, update: &Update) -> FilterDecision {
        let chat_id = update.chat.id;

        if self.use_blacklist && self.blacklist.contains(&chat_id) {
            return FilterDecision::Blacklisted;
        }

        if self.only_whitelist && !self.whitelist.contains(&chat_id) {
            return FilterDecision::NotWhitelisted;
        }

        if !update.is_command() && !self.allow_normal_messages {
            return FilterDecision::NormalMessagesDisabled;
        }

        if self.restrict_mention {
            if let Some(mention) = update.mention.as_deref() {
                if !mention.is_empty() && mention != self.bot_username {
                    return FilterDecision::OtherBotMentioned;
                }
            }
        }

        FilterDecision::Admit
    }

    pub fn admit(&self, update: &Update) -> bool {
        self.check(update).is_admitted()
    }
}
