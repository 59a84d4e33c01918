#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use itemlens::{GenerateResult, GenerationOptions, ItemLensError, LLMClient, MediaFile, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub const RARE_BOW_JSON: &str = r#"{"name":"","rarity":"Rare","baseType":"Expert Hunting Bow","league":"","explicitMods":["+50 to maximum life"],"tradeQuery":{"query":{"status":{"option":"online"},"type":"Expert Hunting Bow","stats":[{"type":"and","filters":[{"id":"to maximum life","value":{"min":50}}]}]}}}"#;

pub const RUST_SOCIAL_URL: &str = "https://www.rust-lang.org/static/images/rust-social-wide.jpg";

/// What the stub model answers with.
#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    Api(String),
    Timeout,
}

/// A request seen by the stub model.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub prompt: String,
    pub media: Vec<MediaFile>,
    pub options: GenerationOptions,
}

pub struct StubClient {
    reply: StubReply,
    seen: Mutex<Vec<SeenRequest>>,
}

impl StubClient {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(StubReply::Text(text.to_string()))
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMClient for StubClient {
    async fn generate_with_media(
        &self,
        prompt: &str,
        media: &[MediaFile],
        options: &GenerationOptions,
    ) -> Result<GenerateResult> {
        self.seen.lock().unwrap().push(SeenRequest {
            prompt: prompt.to_string(),
            media: media.to_vec(),
            options: options.clone(),
        });
        match &self.reply {
            StubReply::Text(text) => Ok(GenerateResult::from_text(text.clone())),
            StubReply::Api(msg) => Err(ItemLensError::ApiError(msg.clone())),
            StubReply::Timeout => Err(ItemLensError::Timeout),
        }
    }
}

/// Counts ERROR-level events seen by the subscriber it is installed in.
#[derive(Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Serve exactly one HTTP response on a local port.
///
/// Returns the base URL to point a client at and a handle resolving to the
/// raw request (head and body) the server received.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });

    (format!("http://{}/v1beta", addr), handle)
}

/// Send a response head and the start of a body, then stall until the
/// client hangs up.
pub async fn serve_stalled(status: &str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let partial = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: 4096\r\n\r\n{{\"error\":",
        status
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(partial.as_bytes()).await.unwrap();
        let mut sink = [0u8; 1024];
        // returns once the client drops the connection
        while matches!(socket.read(&mut sink).await, Ok(n) if n > 0) {}
    });

    (format!("http://{}/v1beta", addr), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8(buf).unwrap()
}

/// Split a raw request into its lowercased head and its JSON body.
pub fn split_request(raw: &str) -> (String, serde_json::Value) {
    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    (head.to_lowercase(), serde_json::from_str(body).unwrap())
}

/// Wrap reply text in a Gemini `generateContent` response envelope.
pub fn gemini_envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 1310,
            "candidatesTokenCount": 96,
            "totalTokenCount": 1406
        },
        "modelVersion": "gemini-2.5-flash"
    })
    .to_string()
}
