//! Where a dialogue comes from.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use murmur_types::{ChatMessage, DialogueError};
use serde::{Deserialize, Serialize};

use crate::parse::{JoinStyle, parse_dialogue};

/// A dialogue resource: a local file or an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DialogueSource {
    /// File on disk.
    Path(PathBuf),
    /// Remote text fetched with `GET`.
    Url(String),
}

impl From<&str> for DialogueSource {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DialogueSource::Url(trimmed.to_string())
        } else {
            DialogueSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl From<String> for DialogueSource {
    fn from(value: String) -> Self {
        DialogueSource::from(value.as_str())
    }
}

impl From<DialogueSource> for String {
    fn from(value: DialogueSource) -> Self {
        value.to_string()
    }
}

impl FromStr for DialogueSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DialogueSource::from(s))
    }
}

impl fmt::Display for DialogueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueSource::Path(path) => write!(f, "{}", path.display()),
            DialogueSource::Url(url) => f.write_str(url),
        }
    }
}

impl DialogueSource {
    /// Read the raw text of the resource.
    pub async fn read_text(&self) -> Result<String, DialogueError> {
        match self {
            DialogueSource::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| DialogueError::Io {
                        path: path.display().to_string(),
                        source,
                    })
            }
            DialogueSource::Url(url) => fetch(url).await,
        }
    }
}

async fn fetch(url: &str) -> Result<String, DialogueError> {
    let http_error = |message: String| DialogueError::Http {
        url: url.to_string(),
        message,
    };

    tracing::debug!(url = %url, "fetching example dialogue");
    let response = reqwest::get(url)
        .await
        .map_err(|e| http_error(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(http_error(format!("HTTP {status}")));
    }
    response.text().await.map_err(|e| http_error(e.to_string()))
}

/// Load and parse a dialogue.
///
/// Callers that treat the dialogue as optional context can fall back to an
/// empty history on error.
pub async fn load_dialogue(
    source: &DialogueSource,
    join: JoinStyle,
) -> Result<Vec<ChatMessage>, DialogueError> {
    let text = source.read_text().await?;
    tracing::debug!(source = %source, bytes = text.len(), "read example dialogue");
    Ok(parse_dialogue(&text, join))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_detected_by_scheme() {
        assert_eq!(
            DialogueSource::from("https://example.com/d.txt"),
            DialogueSource::Url("https://example.com/d.txt".into())
        );
        assert_eq!(
            DialogueSource::from("HTTP://host/x"),
            DialogueSource::Url("HTTP://host/x".into())
        );
        assert_eq!(
            DialogueSource::from("assets/example.txt"),
            DialogueSource::Path(PathBuf::from("assets/example.txt"))
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let source = DialogueSource::Url("http://h/x".into());
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, "\"http://h/x\"");
        let back: DialogueSource = serde_json::from_str("\"dialogue.txt\"").unwrap();
        assert_eq!(back, DialogueSource::Path(PathBuf::from("dialogue.txt")));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = DialogueSource::Path(PathBuf::from("/definitely/not/here.txt"));
        let err = load_dialogue(&source, JoinStyle::Newline)
            .await
            .unwrap_err();
        assert!(matches!(err, DialogueError::Io { .. }), "got {err:?}");
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
