//! Loading dialogues from disk and over HTTP.

use std::io::Write;

use murmur_dialogue::{ChatMessage, DialogueError, DialogueSource, JoinStyle, load_dialogue};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAMPLE: &str = "\
user: What's the weather like?
assistant: (looks outside) Sunny,
with a light breeze.

user: Great, thanks!
";

#[tokio::test]
async fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let source = DialogueSource::Path(file.path().to_path_buf());
    let turns = load_dialogue(&source, JoinStyle::Newline).await.unwrap();

    assert_eq!(
        turns,
        vec![
            ChatMessage::user("What's the weather like?"),
            ChatMessage::assistant("(looks outside) Sunny,\nwith a light breeze."),
            ChatMessage::user("Great, thanks!"),
        ]
    );
}

#[tokio::test]
async fn loads_from_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets/example_conversation.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .expect(1)
        .mount(&server)
        .await;

    let source = DialogueSource::from(format!(
        "{}/assets/example_conversation.txt",
        server.uri()
    ));
    let turns = load_dialogue(&source, JoinStyle::Space).await.unwrap();

    assert_eq!(turns.len(), 3);
    assert_eq!(
        turns[1].content,
        "(looks outside) Sunny, with a light breeze."
    );
}

#[tokio::test]
async fn http_404_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = DialogueSource::Url(format!("{}/missing.txt", server.uri()));
    let err = load_dialogue(&source, JoinStyle::Newline)
        .await
        .unwrap_err();
    match err {
        DialogueError::Http { url, message } => {
            assert!(url.ends_with("/missing.txt"));
            assert!(message.contains("404"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_file_gives_empty_history() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let source = DialogueSource::Path(file.path().to_path_buf());
    let turns = load_dialogue(&source, JoinStyle::Newline).await.unwrap();
    assert!(turns.is_empty());
}
