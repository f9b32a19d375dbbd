// rest/routes/stream.rs — The stream relay endpoint.
//
// POST /api/stream: validate the body, augment the system instructions with
// the prior transcript, open a streamed generation call, and forward only the
// text deltas as a raw byte stream. Pre-stream failures become classified
// JSON errors; once the body has started, a failure aborts the stream.

use axum::{body::Body, extract::State, http::header, response::Response};
use bytes::Bytes;
use futures_util::StreamExt;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};

use crate::chat::prompt::build_instructions;
use crate::provider::{ResponseEvent, ResponseRequest};
use crate::rest::error::ApiError;
use crate::validate::{ChatRequest, ValidationError};
use crate::AppContext;

pub async fn stream_chat(
    State(ctx): State<Arc<AppContext>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    // Parse the raw body ourselves so malformed JSON classifies as a
    // validation failure instead of a framework rejection.
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ValidationError::MalformedJson)?;
    let request = ChatRequest::parse(&value)?;

    info!(
        history_len = request.chat_history.len(),
        message_chars = request.message.chars().count(),
        "chat turn received"
    );

    let events = ctx
        .responses
        .stream(ResponseRequest {
            instructions: build_instructions(&request.chat_history),
            input: request.message,
            max_output_tokens: ctx.config.max_output_tokens,
            temperature: ctx.config.temperature,
        })
        .await?;

    // Deltas are forwarded the moment they arrive; every other event kind
    // contributes zero bytes. Client disconnect drops this stream, which
    // drops the upstream call with it.
    let bytes = events.filter_map(|event| async move {
        match event {
            Ok(ResponseEvent::OutputTextDelta { delta }) => Some(Ok(Bytes::from(delta))),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "generation stream failed mid-flight");
                Some(Err(io::Error::other(e.to_string())))
            }
        }
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
