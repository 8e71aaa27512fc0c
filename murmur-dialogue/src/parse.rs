//! Splitting dialogue text into turns.

use std::fmt;
use std::str::FromStr;

use murmur_types::{ChatMessage, Role};
use serde::{Deserialize, Serialize};

const USER_PREFIX: &str = "user: ";
const ASSISTANT_PREFIX: &str = "assistant: ";

/// How continuation lines are glued onto the current turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStyle {
    /// Keep line breaks.
    #[default]
    Newline,
    /// Collapse the turn onto one line.
    Space,
}

impl JoinStyle {
    /// The separator placed between lines of a turn.
    #[must_use]
    pub fn separator(self) -> &'static str {
        match self {
            JoinStyle::Newline => "\n",
            JoinStyle::Space => " ",
        }
    }
}

impl fmt::Display for JoinStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinStyle::Newline => "newline",
            JoinStyle::Space => "space",
        })
    }
}

impl FromStr for JoinStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newline" => Ok(JoinStyle::Newline),
            "space" => Ok(JoinStyle::Space),
            other => Err(format!(
                "unknown join style `{other}` (expected `newline` or `space`)"
            )),
        }
    }
}

fn role_line(line: &str) -> Option<(Role, &str)> {
    if let Some(rest) = line.strip_prefix(USER_PREFIX) {
        Some((Role::User, rest))
    } else {
        line.strip_prefix(ASSISTANT_PREFIX)
            .map(|rest| (Role::Assistant, rest))
    }
}

/// Parse role-prefixed dialogue text into ordered messages.
///
/// A turn is flushed, joined with `join` and trimmed, when the next role
/// prefix appears or the text ends. Blank lines are skipped. Lines before the
/// first role prefix open the first turn; without any role prefix nothing is
/// returned.
///
/// ```
/// use murmur_dialogue::{JoinStyle, Role, parse_dialogue};
///
/// let turns = parse_dialogue("user: Hi\nassistant: Hello!\nWelcome.", JoinStyle::Space);
/// assert_eq!(turns.len(), 2);
/// assert_eq!(turns[1].role, Role::Assistant);
/// assert_eq!(turns[1].content, "Hello! Welcome.");
/// ```
#[must_use]
pub fn parse_dialogue(text: &str, join: JoinStyle) -> Vec<ChatMessage> {
    let mut messages = Vec::new();
    let mut current: Option<(Role, Vec<&str>)> = None;
    let mut preamble: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some((role, rest)) = role_line(line) {
            let parts = match current.take() {
                Some((prev, parts)) => {
                    messages.push(flush(prev, &parts, join));
                    vec![rest]
                }
                None => {
                    let mut parts = std::mem::take(&mut preamble);
                    parts.push(rest);
                    parts
                }
            };
            current = Some((role, parts));
        } else if !line.trim().is_empty() {
            match current.as_mut() {
                Some((_, parts)) => parts.push(line),
                None => preamble.push(line),
            }
        }
    }
    if let Some((role, parts)) = current {
        messages.push(flush(role, &parts, join));
    }

    if !preamble.is_empty() {
        tracing::debug!(lines = preamble.len(), "dialogue has no role prefix");
    }
    tracing::debug!(turns = messages.len(), %join, "parsed example dialogue");
    messages
}

fn flush(role: Role, parts: &[&str], join: JoinStyle) -> ChatMessage {
    ChatMessage::new(role, parts.join(join.separator()).trim())
}
