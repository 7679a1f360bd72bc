//! Minimal event-stream server for push client tests.
//!
//! Each accepted connection is answered with the next scripted body and then
//! closed. Once the script runs out, connections get a 503.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct TestStreamServer {
    /// Full URL of the stream endpoint.
    pub url: String,

    last_event_ids: Arc<Mutex<Vec<Option<String>>>>,
    task: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestStreamServer {
    pub async fn spawn(bodies: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener.local_addr().unwrap().port();

        let last_event_ids = Arc::new(Mutex::new(Vec::new()));
        let seen = last_event_ids.clone();
        let mut bodies: VecDeque<String> = bodies.into();

        let task = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let body = bodies.pop_front();
                if let Err(e) = serve(socket, body, &seen).await {
                    eprintln!("Test stream server error: {}", e);
                }
            }
        });

        Self {
            url: format!("http://127.0.0.1:{}/notifications/stream", port),
            last_event_ids,
            task,
        }
    }

    /// `Last-Event-ID` header of every request received so far.
    pub fn last_event_ids(&self) -> Vec<Option<String>> {
        self.last_event_ids.lock().unwrap().clone()
    }
}

impl Drop for TestStreamServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut socket: TcpStream,
    body: Option<String>,
    seen: &Mutex<Vec<Option<String>>>,
) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buf[..n]);
    }

    let request = String::from_utf8_lossy(&request);
    let last_event_id = request.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("last-event-id")
            .then(|| value.trim().to_string())
    });
    seen.lock().unwrap().push(last_event_id);

    let response = match body {
        Some(body) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n{}",
            body
        ),
        None => "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string(),
    };
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}
