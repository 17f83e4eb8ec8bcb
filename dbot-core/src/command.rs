//! Pure functions for recognizing bot commands (`/name@bot args`) in message text.

/// A parsed command token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToken {
    pub name: String,
    /// Username after `@`; `None` when absent or empty.
    pub mention: Option<String>,
    pub arguments: String,
}

/// Parses `text` as a bot command. Returns `None` when `text` does not start with `/` followed
/// by a non-empty command name.
pub fn parse_command(text: &str) -> Option<CommandToken> {
    let rest = text.strip_prefix('/')?;
    let (token, arguments) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };
    let (name, mention) = match token.split_once('@') {
        Some((name, at)) => (name, Some(at)),
        None => (token, None),
    };
    if name.is_empty() {
        return None;
    }
    Some(CommandToken {
        name: name.to_string(),
        mention: mention.filter(|m| !m.is_empty()).map(str::to_string),
        arguments: arguments.to_string(),
    })
}

/// Splits command arguments on runs of whitespace.
pub fn split_arguments(arguments: &str) -> Vec<String> {
    arguments.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let token = parse_command("/start").unwrap();
        assert_eq!(token.name, "start");
        assert_eq!(token.mention, None);
        assert_eq!(token.arguments, "");
    }

    #[test]
    fn test_parse_command_with_mention_and_args() {
        let token = parse_command("/ban@group_bot  user1   user2 ").unwrap();
        assert_eq!(token.name, "ban");
        assert_eq!(token.mention.as_deref(), Some("group_bot"));
        assert_eq!(token.arguments, "user1   user2");
        assert_eq!(split_arguments(&token.arguments), vec!["user1", "user2"]);
    }

    #[test]
    fn test_empty_mention_is_none() {
        let token = parse_command("/help@").unwrap();
        assert_eq!(token.name, "help");
        assert_eq!(token.mention, None);
    }

    #[test]
    fn test_not_a_command() {
        assert!(parse_command("hello /start").is_none());
        assert!(parse_command("/").is_none());
        assert!(parse_command("/@bot").is_none());
        assert!(parse_command("").is_none());
    }

    #[test]
    fn test_split_arguments_empty() {
        assert!(split_arguments("").is_empty());
        assert!(split_arguments("   ").is_empty());
    }
}
