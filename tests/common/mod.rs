//! Shared test utilities: a one-shot HTTP stub standing in for Ollama

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Serves exactly one request, then exits
pub struct StubServer {
    pub url: String,
    handle: JoinHandle<String>,
}

enum Reply {
    Respond { status: u16, body: String },
    Stall(Duration),
}

impl StubServer {
    /// Answer the request with `status` and a JSON `body`
    pub fn respond(status: u16, body: &str) -> Self {
        Self::start(Reply::Respond {
            status,
            body: body.to_string(),
        })
    }

    /// Read the request and send nothing back for `delay`
    pub fn stall(delay: Duration) -> Self {
        Self::start(Reply::Stall(delay))
    }

    fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("Failed to accept connection");
            let request = read_request(&mut stream);

            match reply {
                Reply::Respond { status, body } => {
                    let response = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes());
                    let _ = stream.flush();
                }
                Reply::Stall(delay) => thread::sleep(delay),
            }
            request
        });

        Self { url, handle }
    }

    /// The raw request the server received (request line, headers, body)
    pub fn request(self) -> String {
        self.handle.join().expect("Stub server panicked")
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("Failed to set read timeout");

    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

/// A successful `/api/chat` response carrying `content`
pub fn chat_body(content: &str) -> String {
    serde_json::json!({
        "model": "cmdgen",
        "created_at": "2024-01-01T00:00:00Z",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
    .to_string()
}
