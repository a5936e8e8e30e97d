use axum::{
    body::{Body, Bytes},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream::Stream;
use log::{error, info, warn};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::services::completion::{
    ChatMessage, CompletionClient, CompletionError, CompletionStream, STAGE_MODEL,
};
use crate::services::prompts;
use crate::services::title::generate_title;
use crate::types::{
    CodeRequest, DocRequest, ErrorResponse, PlanningRequest, StageKind, TitleRequest,
    TitleResponse,
};

/// Appended in-band when a stage fails after streaming has begun; by then the
/// status line is already on the wire.
pub const STREAM_FAILURE_NOTICE: &str = "\n\n生成失败，请重试";

pub struct TextStream {
    pub receiver: mpsc::Receiver<Result<Bytes, Infallible>>,
}

impl Stream for TextStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// JSON 405 for anything but POST on the generation routes.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse { error: "只支持 POST 请求".to_string() }),
    )
        .into_response()
}

fn error_status(error: &CompletionError) -> StatusCode {
    match error {
        CompletionError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: CompletionError) -> Response {
    (
        error_status(&error),
        Json(ErrorResponse { error: error.to_string() }),
    )
        .into_response()
}

pub async fn generate_title_handler(Json(payload): Json<TitleRequest>) -> Response {
    if payload.prompt.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: "请提供有效的描述文本".to_string() }),
        )
            .into_response();
    }

    let client = match CompletionClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!("title generation unavailable: {e}");
            return error_response(e);
        }
    };

    match generate_title(&client, &payload.prompt).await {
        Ok(title) => {
            info!("generated title: {title}");
            (StatusCode::OK, Json(TitleResponse { title })).into_response()
        }
        Err(e) => {
            error!("title generation failed: {e}");
            error_response(e)
        }
    }
}

pub async fn generate_planning(Json(payload): Json<PlanningRequest>) -> Response {
    let primary = prompts::planning_messages(&payload.title, payload.software_type);
    let continuation = prompts::planning_continuation(&payload.title, payload.software_type);
    stream_stage(StageKind::Planning, primary, continuation).await
}

pub async fn generate_code(Json(payload): Json<CodeRequest>) -> Response {
    let primary =
        prompts::code_messages(&payload.title, payload.software_type, &payload.planning);
    let continuation =
        prompts::code_continuation(&payload.title, payload.software_type, &payload.planning);
    stream_stage(StageKind::Code, primary, continuation).await
}

pub async fn generate_doc(Json(payload): Json<DocRequest>) -> Response {
    let primary = prompts::doc_messages(
        &payload.title,
        payload.software_type,
        &payload.planning,
        &payload.code,
    );
    let continuation = prompts::doc_continuation(
        &payload.title,
        payload.software_type,
        &payload.planning,
        &payload.code,
    );
    stream_stage(StageKind::Doc, primary, continuation).await
}

/// Opens the primary completion stream, then relays its fragments followed by
/// one continuation call through an unbuffered text response. Failures before
/// the first byte become a JSON error; failures after it become an in-band
/// notice on the already-open channel.
async fn stream_stage(
    kind: StageKind,
    primary: Vec<ChatMessage>,
    continuation: Vec<ChatMessage>,
) -> Response {
    let request_id = Uuid::new_v4();
    info!("{}: generation request {request_id}", kind.as_str());

    let client = match CompletionClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!("{}: {e}", kind.as_str());
            return error_response(e);
        }
    };

    let mut primary_stream = match client.stream(STAGE_MODEL, &primary).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("{}: completion request {request_id} failed: {e}", kind.as_str());
            return error_response(e);
        }
    };

    let (tx, rx) = mpsc::channel::<Result<Bytes, Infallible>>(64);
    let cancel_token = CancellationToken::new();

    tokio::spawn(async move {
        match relay_fragments(&mut primary_stream, &tx, &cancel_token).await {
            Relay::Completed => {}
            Relay::ClientGone => {
                info!("{}: client disconnected during request {request_id}", kind.as_str());
                return;
            }
            Relay::Failed => return,
        }

        // continuation strictly follows primary completion
        match client.stream(STAGE_MODEL, &continuation).await {
            Ok(mut continuation_stream) => {
                relay_fragments(&mut continuation_stream, &tx, &cancel_token).await;
            }
            Err(e) => {
                warn!("{}: continuation of request {request_id} failed: {e}", kind.as_str());
                let _ = tx.send(Ok(Bytes::from(STREAM_FAILURE_NOTICE))).await;
            }
        }
        info!("{}: generation request {request_id} finished", kind.as_str());
    });

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(TextStream { receiver: rx }),
    )
        .into_response()
}

#[derive(Debug, PartialEq, Eq)]
enum Relay {
    Completed,
    ClientGone,
    Failed,
}

async fn relay_fragments(
    stream: &mut CompletionStream,
    tx: &mpsc::Sender<Result<Bytes, Infallible>>,
    cancel_token: &CancellationToken,
) -> Relay {
    while let Some(fragment) = stream.next_fragment().await {
        if cancel_token.is_cancelled() {
            return Relay::ClientGone;
        }
        match fragment {
            Ok(text) => {
                if tx.send(Ok(Bytes::from(text))).await.is_err() {
                    // receiver dropped: the client hung up
                    cancel_token.cancel();
                    return Relay::ClientGone;
                }
            }
            Err(e) => {
                error!("completion stream failed mid-flight: {e}");
                let _ = tx.send(Ok(Bytes::from(STREAM_FAILURE_NOTICE))).await;
                return Relay::Failed;
            }
        }
    }
    Relay::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_method_not_allowed_is_json_405() {
        let response = method_not_allowed().await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "只支持 POST 请求");
    }

    #[tokio::test]
    async fn test_error_response_status_mapping() {
        let response = error_response(CompletionError::RateLimited);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = error_response(CompletionError::MissingApiKey);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(parsed.error.contains("请联系管理员"));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let response =
            generate_title_handler(Json(TitleRequest { prompt: "   ".to_string() })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "请提供有效的描述文本");
    }
}
