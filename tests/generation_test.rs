//! Ollama client against a stub HTTP server

mod common;

use std::time::Duration;

use common::{StubServer, chat_body};
use shorthand::generation::{CommandGenerator, GenerationError, OllamaClient};
use shorthand::sanitize::sanitize;

fn client(server: &StubServer) -> OllamaClient {
    OllamaClient::new(server.url.as_str(), "cmdgen", Duration::from_secs(5))
}

#[test]
fn test_generate_posts_chat_request() {
    let server = StubServer::respond(200, &chat_body("ls -la"));
    let output = client(&server).generate("list files", false).unwrap();
    assert_eq!(output, "ls -la");

    let request = server.request();
    assert!(request.starts_with("POST /api/chat HTTP/1.1"), "{}", request);
    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "model": "cmdgen",
            "messages": [{"role": "user", "content": "list files"}],
            "stream": false
        })
    );
}

#[test]
fn test_unsafe_hint_reaches_the_model() {
    let server = StubServer::respond(200, &chat_body("rm -rf ./build"));
    client(&server).generate("clean build", true).unwrap();
    assert!(server.request().contains(r#""content":"clean build --unsafe""#));
}

#[test]
fn test_fenced_answer_is_returned_raw() {
    let raw = "```bash\n$ git status\n```";
    let server = StubServer::respond(200, &chat_body(raw));
    let output = client(&server).generate("repo state", false).unwrap();

    assert_eq!(output, raw);
    assert_eq!(sanitize(&output), "git status");
}

#[test]
fn test_whitespace_content_is_empty() {
    let server = StubServer::respond(200, &chat_body("  \n\t "));
    assert_eq!(client(&server).generate("nothing", false).unwrap(), "");
}

#[test]
fn test_error_status() {
    let server = StubServer::respond(404, r#"{"error":"model 'cmdgen' not found"}"#);
    match client(&server).generate("ls", false) {
        Err(GenerationError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_malformed_json() {
    let server = StubServer::respond(200, "this is not json");
    assert!(matches!(
        client(&server).generate("ls", false),
        Err(GenerationError::Malformed(_))
    ));
}

#[test]
fn test_missing_message() {
    let server = StubServer::respond(200, r#"{"model":"cmdgen","done":true}"#);
    assert!(matches!(
        client(&server).generate("ls", false),
        Err(GenerationError::Malformed(_))
    ));
}

#[test]
fn test_timeout() {
    let server = StubServer::stall(Duration::from_secs(3));
    let client = OllamaClient::new(server.url.as_str(), "cmdgen", Duration::from_millis(300));

    let err = client.generate("ls", false).unwrap_err();
    assert!(matches!(err, GenerationError::Timeout { .. }), "{:?}", err);
}

#[test]
fn test_is_available() {
    let server = StubServer::respond(200, r#"{"models":[]}"#);
    assert!(client(&server).is_available());
    assert!(server.request().starts_with("GET /api/tags HTTP/1.1"));

    let server = StubServer::respond(500, "{}");
    assert!(!client(&server).is_available());
}
