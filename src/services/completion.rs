use std::collections::VecDeque;
use std::env;
use std::pin::Pin;

use axum::body::Bytes;
use futures::stream::{Stream, StreamExt};
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const STAGE_MODEL: &str = "gpt-4o";
pub const TITLE_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("未配置 OpenAI API 密钥，请联系管理员")]
    MissingApiKey,
    #[error("API 密钥无效，请联系管理员")]
    InvalidApiKey,
    #[error("请求过于频繁，请稍后再试")]
    RateLimited,
    #[error("上游服务返回错误（{status}）：{detail}")]
    Upstream { status: StatusCode, detail: String },
    #[error("请求生成服务失败：{0}")]
    Transport(#[from] reqwest::Error),
    #[error("生成服务返回了空内容")]
    EmptyCompletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl CompletionClient {
    /// Reads OPENAI_API_KEY and the optional OPENAI_API_BASE_URL override.
    /// A missing key is a configuration error at construction time.
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| CompletionError::MissingApiKey)?;
        let api_base = env::var("OPENAI_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Ok(CompletionClient {
            client: Client::new(),
            api_key,
            api_base,
        })
    }

    async fn send_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: Option<f64>,
        max_tokens: Option<u32>,
        stream: bool,
    ) -> Result<reqwest::Response, CompletionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&chat_body(model, messages, temperature, max_tokens, stream))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CompletionError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(CompletionError::RateLimited),
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(CompletionError::Upstream { status, detail })
            }
        }
    }

    /// Single non-streaming completion, returns the full message content.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> Result<String, CompletionError> {
        let response = self
            .send_chat(model, messages, temperature, max_tokens, false)
            .await?;
        let completion: Value = response.json().await?;
        completion["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyCompletion)
    }

    /// Streaming completion. Fails here (before any fragment) on transport
    /// errors and non-2xx upstream responses; afterwards errors surface from
    /// `CompletionStream::next_fragment`.
    pub async fn stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<CompletionStream, CompletionError> {
        let response = self.send_chat(model, messages, None, None, true).await?;
        debug!("opened completion stream against {model}");
        Ok(CompletionStream::new(response))
    }
}

fn chat_body(
    model: &str,
    messages: &[ChatMessage],
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    stream: bool,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect::<Vec<_>>(),
        "stream": stream,
    });
    if let Some(temperature) = temperature {
        body["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    body
}

#[derive(Debug, PartialEq, Eq)]
enum StreamLine {
    Fragment(String),
    Done,
    Ignored,
}

/// One line of the upstream SSE body.
fn parse_stream_line(line: &str) -> StreamLine {
    let line = line.trim();
    if line == "data: [DONE]" {
        return StreamLine::Done;
    }
    if let Some(json_str) = line.strip_prefix("data: ") {
        if let Ok(parsed) = serde_json::from_str::<Value>(json_str) {
            if let Some(content) = parsed["choices"][0]["delta"]["content"].as_str() {
                if !content.is_empty() {
                    return StreamLine::Fragment(content.to_string());
                }
            }
        }
    }
    StreamLine::Ignored
}

/// Accumulates raw bytes and hands back complete lines. Network chunks can
/// split a line anywhere, including inside a multi-byte UTF-8 sequence, so
/// splitting happens on bytes and decoding on whole lines.
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        LineBuffer { buf: Vec::new() }
    }

    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    fn flush(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buf);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

pub struct CompletionStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    lines: LineBuffer,
    pending: VecDeque<String>,
    finished: bool,
}

impl CompletionStream {
    fn new(response: reqwest::Response) -> Self {
        CompletionStream {
            inner: Box::pin(response.bytes_stream()),
            lines: LineBuffer::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn ingest(&mut self, lines: Vec<String>) {
        for line in lines {
            match parse_stream_line(&line) {
                StreamLine::Fragment(text) => self.pending.push_back(text),
                StreamLine::Done => self.finished = true,
                StreamLine::Ignored => {}
            }
        }
    }

    /// Next text fragment in arrival order. None means the stream ended.
    pub async fn next_fragment(&mut self) -> Option<Result<String, CompletionError>> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Some(Ok(fragment));
            }
            if self.finished {
                return None;
            }
            match self.inner.next().await {
                Some(Ok(bytes)) => {
                    let lines = self.lines.push(&bytes);
                    self.ingest(lines);
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(CompletionError::Transport(e)));
                }
                None => {
                    self.finished = true;
                    if let Some(rest) = self.lines.flush() {
                        self.ingest(vec![rest]);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_line_with_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"你好"}}]}"#;
        assert_eq!(parse_stream_line(line), StreamLine::Fragment("你好".to_string()));
    }

    #[test]
    fn test_parse_done_marker() {
        assert_eq!(parse_stream_line("data: [DONE]"), StreamLine::Done);
    }

    #[test]
    fn test_parse_ignores_role_only_delta_and_noise() {
        let role_only = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_stream_line(role_only), StreamLine::Ignored);
        assert_eq!(parse_stream_line(""), StreamLine::Ignored);
        assert_eq!(parse_stream_line("event: ping"), StreamLine::Ignored);
        assert_eq!(parse_stream_line("data: not-json"), StreamLine::Ignored);
    }

    #[test]
    fn test_line_buffer_reassembles_split_lines() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"data: {\"choices\":[{\"delta\"").is_empty());
        let lines = buffer.push(b":{\"content\":\"a\"}}]}\ndata: [DONE]\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(
            parse_stream_line(&lines[0]),
            StreamLine::Fragment("a".to_string())
        );
        assert_eq!(parse_stream_line(&lines[1]), StreamLine::Done);
    }

    #[test]
    fn test_line_buffer_handles_multibyte_split() {
        // "好" is e5 a5 bd; split the chunk boundary inside it
        let payload = "data: {\"choices\":[{\"delta\":{\"content\":\"好\"}}]}\n".as_bytes();
        let (head, tail) = payload.split_at(30);
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(head).is_empty());
        let lines = buffer.push(tail);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            parse_stream_line(&lines[0]),
            StreamLine::Fragment("好".to_string())
        );
    }

    #[test]
    fn test_line_buffer_flush_returns_trailing_line() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"data: [DONE]");
        assert_eq!(buffer.flush(), Some("data: [DONE]".to_string()));
        assert_eq!(buffer.flush(), None);
    }

    #[test]
    fn test_chat_body_shape() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let body = chat_body(STAGE_MODEL, &messages, None, None, true);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "u");
        assert!(body.get("temperature").is_none());

        let body = chat_body(TITLE_MODEL, &messages, Some(0.7), Some(200), false);
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 200);
        assert_eq!(body["stream"], false);
    }
}
