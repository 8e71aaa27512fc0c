//! Dialogue, chat and speech wired together against mock services.

use std::io::Write;

use futures::StreamExt;
use murmur::cli;
use murmur::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIALOGUE: &str = "\
user: Hello
assistant: (waves) Hi! How are you?
user: Fine.
";

const REPLY_STREAM: &str = concat!(
    ": keep-alive\n",
    "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"(smiles) \"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"Glad to hear\"}}]}\n\n",
    "data: {oops\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\" it!\"}}]}\n\n",
    "data: [DONE]\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n",
);

fn dialogue_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DIALOGUE.as_bytes()).unwrap();
    file
}

async fn mount_chat(server: &MockServer, expected_messages: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "stream": true,
            "messages": expected_messages
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(REPLY_STREAM),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn config_for(chat: &MockServer, tts: Option<&MockServer>) -> MurmurConfig {
    let mut config = MurmurConfig::default();
    config.chat.api_key = Some("sk-test".into());
    config.chat.base_url = chat.uri();
    config.tts = tts.map(|server| TtsConfig {
        base_url: server.uri(),
        ..TtsConfig::new("8088", "tok", "S_voice")
    });
    config
}

#[tokio::test]
async fn dialogue_primes_streamed_chat() {
    let chat = MockServer::start().await;
    mount_chat(
        &chat,
        json!([
            {"role": "user", "content": "Hello"},
            {"role": "assistant", "content": "(waves) Hi! How are you?"},
            {"role": "user", "content": "Fine."},
            {"role": "user", "content": "Any news?"}
        ]),
    )
    .await;

    let file = dialogue_file();
    let mut history = load_dialogue(
        &DialogueSource::Path(file.path().to_path_buf()),
        JoinStyle::Newline,
    )
    .await
    .unwrap();
    history.push(ChatMessage::user("Any news?"));

    let client = ChatClient::new("sk-test").base_url(chat.uri());
    let deltas: Vec<String> = client
        .stream(&history)
        .await
        .unwrap()
        .map(|d| d.unwrap())
        .collect()
        .await;

    assert_eq!(deltas, vec!["(smiles) ", "Glad to hear", " it!"]);
}

#[tokio::test]
async fn chat_command_streams_and_speaks() {
    let chat = MockServer::start().await;
    let tts = MockServer::start().await;
    mount_chat(
        &chat,
        json!([
            {"role": "user", "content": "Hello"},
            {"role": "assistant", "content": "(waves) Hi! How are you?"},
            {"role": "user", "content": "Fine."},
            {"role": "user", "content": "Any news?"}
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tts"))
        .and(body_partial_json(json!({
            "request": {"text": "Glad to hear it!"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 3000,
            "message": "Success",
            "data": "SUQzAwAAAAA="
        })))
        .expect(1)
        .mount(&tts)
        .await;

    let file = dialogue_file();
    let out_dir = tempfile::tempdir().unwrap();
    let audio_path = out_dir.path().join("reply.mp3");

    let mut config = config_for(&chat, Some(&tts));
    config.dialogue.source = Some(DialogueSource::Path(file.path().to_path_buf()));

    let mut stdout = Vec::new();
    let reply = cli::chat(&config, "Any news?", Some(audio_path.as_path()), &mut stdout)
        .await
        .unwrap();

    assert_eq!(reply, "(smiles) Glad to hear it!");
    assert_eq!(String::from_utf8(stdout).unwrap(), "(smiles) Glad to hear it!\n");
    assert_eq!(std::fs::read(&audio_path).unwrap(), b"ID3\x03\x00\x00\x00\x00");
}

#[tokio::test]
async fn missing_dialogue_falls_back_to_prompt_only() {
    let chat = MockServer::start().await;
    mount_chat(&chat, json!([{"role": "user", "content": "Any news?"}])).await;

    let mut config = config_for(&chat, None);
    config.dialogue.source = Some(DialogueSource::from("/no/such/dialogue.txt"));

    let mut stdout = Vec::new();
    let reply = cli::chat(&config, "Any news?", None, &mut stdout)
        .await
        .unwrap();
    assert_eq!(reply, "(smiles) Glad to hear it!");
}

#[tokio::test]
async fn speak_without_tts_config_sends_no_chat_request() {
    let chat = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&chat)
        .await;

    let config = config_for(&chat, None);
    let out_dir = tempfile::tempdir().unwrap();
    let err = cli::chat(
        &config,
        "hi",
        Some(out_dir.path().join("x.mp3").as_path()),
        &mut Vec::<u8>::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, cli::CliError::Config(ConfigError::Missing(_))), "got {err:?}");
}

#[tokio::test]
async fn dialogue_command_prints_turns() {
    let file = dialogue_file();
    let args = cli::DialogueArgs {
        source: Some(DialogueSource::Path(file.path().to_path_buf())),
        join: Some(JoinStyle::Space),
    };
    let printed = cli::dialogue_json(&MurmurConfig::default(), &args)
        .await
        .unwrap();
    let turns: Vec<ChatMessage> = serde_json::from_str(&printed).unwrap();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1].role, Role::Assistant);
}
