// src/parsers/message.rs

use regex::Regex;

/// `#<seq> <LEVEL> #<CODE> <message to end of line>`
///
/// The message excludes the line terminator, `\n` or `\r\n`.
const MESSAGE_PATTERN: &str = r"#\d+\s+(?P<level>\w+)\s+#(?P<code>\d+)\s+(?P<message>[^\r\n]+)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFields<'a> {
    pub level: &'a str,
    pub code: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Clone)]
pub struct MessageMatcher {
    re: Regex,
}

impl MessageMatcher {
    pub fn new() -> Self {
        Self {
            re: Regex::new(MESSAGE_PATTERN).expect("Invalid message regex"),
        }
    }

    /// Searches anywhere in `entry`. The message group never crosses a newline.
    pub fn find<'a>(&self, entry: &'a str) -> Option<MessageFields<'a>> {
        let caps = self.re.captures(entry)?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

        Some(MessageFields {
            level: group("level"),
            code: group("code"),
            message: group("message"),
        })
    }
}

impl Default for MessageMatcher {
    fn default() -> Self {
        Self::new()
    }
}
