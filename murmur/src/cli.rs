//! The `murmur` command line.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use murmur_chat::ChatMessage;
use murmur_dialogue::{DialogueError, DialogueSource, JoinStyle, load_dialogue};
use murmur_types::ServiceError;

use crate::config::{ConfigError, MurmurConfig};

/// Stream chat replies, synthesize speech and inspect example dialogues.
#[derive(Debug, Parser)]
#[command(name = "murmur", version, about)]
pub struct Cli {
    /// JSON configuration file (default: ./murmur.json when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a prompt and stream the reply to stdout.
    Chat(ChatArgs),
    /// Synthesize text to an audio file.
    Speak(SpeakArgs),
    /// Print a parsed example dialogue as JSON.
    Dialogue(DialogueArgs),
}

/// Arguments of `murmur chat`.
#[derive(Debug, Clone, Default, Args)]
pub struct ChatArgs {
    /// Prompt text (read from stdin when omitted).
    #[arg(long, short)]
    pub prompt: Option<String>,

    /// Example dialogue to send before the prompt.
    #[arg(long, value_name = "PATH|URL")]
    pub dialogue: Option<DialogueSource>,

    /// How continuation lines of the dialogue are joined.
    #[arg(long, value_name = "newline|space")]
    pub join: Option<JoinStyle>,

    /// Also synthesize the reply and write the audio here.
    #[arg(long, value_name = "OUT.mp3")]
    pub speak: Option<PathBuf>,

    /// Model override.
    #[arg(long)]
    pub model: Option<String>,

    /// API base URL override.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl ChatArgs {
    /// Apply flag overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut MurmurConfig) {
        if let Some(model) = &self.model {
            config.chat.model = model.clone();
        }
        if let Some(url) = &self.base_url {
            config.chat.base_url = url.clone();
        }
        if let Some(source) = &self.dialogue {
            config.dialogue.source = Some(source.clone());
        }
        if let Some(join) = self.join {
            config.dialogue.join = join;
        }
    }
}

/// Arguments of `murmur speak`.
#[derive(Debug, Clone, Args)]
pub struct SpeakArgs {
    /// Text to speak (read from stdin when omitted).
    #[arg(long, short)]
    pub text: Option<String>,

    /// Where to write the audio.
    #[arg(long, short, value_name = "OUT.mp3")]
    pub out: PathBuf,
}

/// Arguments of `murmur dialogue`.
#[derive(Debug, Clone, Args)]
pub struct DialogueArgs {
    /// Dialogue file or URL (default: `dialogue.source` from config).
    #[arg(value_name = "PATH|URL")]
    pub source: Option<DialogueSource>,

    /// How continuation lines are joined.
    #[arg(long, value_name = "newline|space")]
    pub join: Option<JoinStyle>,
}

/// Anything that makes the binary exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Bad or missing configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Chat or speech service failure.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Dialogue could not be loaded.
    #[error(transparent)]
    Dialogue(#[from] DialogueError),
    /// Local I/O failed.
    #[error("{what}: {source}")]
    Io {
        /// What was being done.
        what: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    /// The invocation cannot be carried out.
    #[error("{0}")]
    Usage(String),
}

fn io_error(what: impl Into<String>) -> impl FnOnce(std::io::Error) -> CliError {
    let what = what.into();
    move |source| CliError::Io { what, source }
}

/// Use `given`, or read all of stdin when it is `None`.
fn text_or_stdin(given: Option<&str>, what: &str) -> Result<String, CliError> {
    let text = match given {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(io_error("failed to read stdin"))?;
            buf
        }
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(CliError::Usage(format!("{what} is empty")));
    }
    Ok(text.to_string())
}

/// Load the configured example dialogue, treating failure as no history.
pub async fn history(config: &MurmurConfig) -> Vec<ChatMessage> {
    let Some(source) = &config.dialogue.source else {
        return Vec::new();
    };
    match load_dialogue(source, config.dialogue.join).await {
        Ok(turns) => {
            tracing::info!(source = %source, turns = turns.len(), "loaded example dialogue");
            turns
        }
        Err(err) => {
            tracing::warn!(error = %err, "example dialogue unavailable; continuing without it");
            Vec::new()
        }
    }
}

/// Stream a reply to `prompt` into `out` and return it.
///
/// With `speak` set, the reply is then synthesized and the audio written
/// to that path. Both clients are built before any request is sent.
pub async fn chat<W: Write>(
    config: &MurmurConfig,
    prompt: &str,
    speak: Option<&Path>,
    out: &mut W,
) -> Result<String, CliError> {
    let client = config.chat_client()?;
    let tts = match speak {
        Some(_) => Some(config.tts_client()?),
        None => None,
    };

    let mut messages = history(config).await;
    messages.push(ChatMessage::user(prompt));

    let mut reply = String::new();
    let mut write_error = None;
    let summary = client
        .stream_to(&messages, |delta| {
            reply.push_str(delta);
            if write_error.is_none() {
                if let Err(err) = out.write_all(delta.as_bytes()).and_then(|()| out.flush()) {
                    write_error = Some(err);
                }
            }
        })
        .await?;
    if let Some(err) = write_error {
        return Err(io_error("failed to write reply")(err));
    }
    writeln!(out).map_err(io_error("failed to write reply"))?;
    tracing::info!(
        deltas = summary.deltas,
        malformed_frames = summary.malformed_frames,
        terminated = summary.terminated,
        "reply complete"
    );

    if let (Some(tts), Some(path)) = (tts, speak) {
        match tts.synthesize_audio(&reply).await? {
            Some(audio) => write_audio(path, &audio).await?,
            None => tracing::warn!("reply has nothing left to speak"),
        }
    }
    Ok(reply)
}

/// Synthesize `text` and write the audio to `path`.
pub async fn speak(config: &MurmurConfig, text: &str, path: &Path) -> Result<(), CliError> {
    let tts = config.tts_client()?;
    let audio = tts.synthesize_audio(text).await?.ok_or_else(|| {
        CliError::Usage("nothing to speak once parenthesized asides are removed".into())
    })?;
    write_audio(path, &audio).await
}

async fn write_audio(path: &Path, audio: &[u8]) -> Result<(), CliError> {
    tokio::fs::write(path, audio)
        .await
        .map_err(io_error(format!("failed to write {}", path.display())))?;
    tracing::info!(path = %path.display(), bytes = audio.len(), "audio written");
    Ok(())
}

/// Load the dialogue named by `args` (or the config) as pretty JSON.
pub async fn dialogue_json(config: &MurmurConfig, args: &DialogueArgs) -> Result<String, CliError> {
    let source = args
        .source
        .clone()
        .or_else(|| config.dialogue.source.clone())
        .ok_or_else(|| CliError::Usage("no dialogue given and none configured".into()))?;
    let join = args.join.unwrap_or(config.dialogue.join);
    let turns = load_dialogue(&source, join).await?;
    Ok(serde_json::to_string_pretty(&turns)?)
}

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = MurmurConfig::load(cli.config.as_deref()).await?;
    match cli.command {
        Command::Chat(args) => {
            args.apply(&mut config);
            let prompt = text_or_stdin(args.prompt.as_deref(), "prompt")?;
            let mut stdout = std::io::stdout();
            chat(&config, &prompt, args.speak.as_deref(), &mut stdout).await?;
        }
        Command::Speak(args) => {
            let text = text_or_stdin(args.text.as_deref(), "text")?;
            speak(&config, &text, &args.out).await?;
        }
        Command::Dialogue(args) => {
            println!("{}", dialogue_json(&config, &args).await?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_chat_flags() {
        let cli = Cli::try_parse_from([
            "murmur",
            "chat",
            "--prompt",
            "hi",
            "--dialogue",
            "https://example.com/d.txt",
            "--join",
            "space",
            "--speak",
            "out.mp3",
        ])
        .unwrap();
        let Command::Chat(args) = cli.command else {
            panic!("expected chat");
        };
        assert_eq!(args.prompt.as_deref(), Some("hi"));
        assert_eq!(
            args.dialogue,
            Some(DialogueSource::Url("https://example.com/d.txt".into()))
        );
        assert_eq!(args.join, Some(JoinStyle::Space));
        assert_eq!(args.speak, Some(PathBuf::from("out.mp3")));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["murmur", "dialogue", "d.txt", "--config", "m.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("m.json")));
        let Command::Dialogue(args) = cli.command else {
            panic!("expected dialogue");
        };
        assert_eq!(args.source, Some(DialogueSource::Path("d.txt".into())));
    }

    #[test]
    fn rejects_unknown_join_style() {
        assert!(Cli::try_parse_from(["murmur", "dialogue", "d.txt", "--join", "tab"]).is_err());
    }

    #[test]
    fn speak_requires_out() {
        assert!(Cli::try_parse_from(["murmur", "speak", "--text", "hi"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let mut config = MurmurConfig::default();
        ChatArgs {
            model: Some("deepseek-reasoner".into()),
            join: Some(JoinStyle::Space),
            dialogue: Some(DialogueSource::from("d.txt")),
            ..ChatArgs::default()
        }
        .apply(&mut config);
        assert_eq!(config.chat.model, "deepseek-reasoner");
        assert_eq!(config.chat.base_url, "https://api.deepseek.com");
        assert_eq!(config.dialogue.join, JoinStyle::Space);
        assert!(config.dialogue.source.is_some());
    }

    #[test]
    fn blank_text_is_a_usage_error() {
        assert!(matches!(
            text_or_stdin(Some("  \n"), "prompt"),
            Err(CliError::Usage(_))
        ));
        assert_eq!(text_or_stdin(Some(" hi "), "prompt").unwrap(), "hi");
    }

    #[tokio::test]
    async fn missing_dialogue_source_is_a_usage_error() {
        let args = DialogueArgs {
            source: None,
            join: None,
        };
        let err = dialogue_json(&MurmurConfig::default(), &args)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[tokio::test]
    async fn unreadable_dialogue_gives_empty_history() {
        let mut config = MurmurConfig::default();
        config.dialogue.source = Some(DialogueSource::from("/no/such/dialogue.txt"));
        assert!(history(&config).await.is_empty());
    }

    #[tokio::test]
    async fn chat_without_key_fails_first() {
        let mut out = Vec::new();
        let err = chat(&MurmurConfig::default(), "hi", None, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Service(ServiceError::Config(_))));
        assert!(out.is_empty());
    }
}
