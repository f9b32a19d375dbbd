// provider/openai.rs — ResponseClient backed by the OpenAI Responses API.
//
// POST {base_url}/v1/responses with stream:true, then decode the SSE body
// into ResponseEvents. Credentials and model are explicit construction-time
// configuration, not ambient globals.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};
use serde_json::json;
use tracing::debug;

use crate::provider::sse::SseDecoder;
use crate::provider::{
    ProviderError, ResponseClient, ResponseEvent, ResponseRequest, ResponseStream,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ResponseClient for OpenAiClient {
    async fn stream(&self, request: ResponseRequest) -> Result<ResponseStream, ProviderError> {
        let url = format!("{}/v1/responses", self.base_url);
        let body = json!({
            "model": self.model,
            "instructions": request.instructions,
            "input": request.input,
            "stream": true,
            "max_output_tokens": request.max_output_tokens,
            "temperature": request.temperature,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if status.is_server_error() {
            return Err(ProviderError::Unavailable(format!(
                "upstream status {status}"
            )));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(model = %self.model, "generation stream opened");
        Ok(event_stream(response.bytes_stream().boxed()))
    }
}

struct StreamState {
    body: BoxStream<'static, Result<Bytes, reqwest::Error>>,
    decoder: SseDecoder,
    pending: VecDeque<ResponseEvent>,
    done: bool,
}

/// Turn a raw SSE byte stream into an ordered ResponseEvent stream. A
/// transport error is yielded once and ends the stream.
fn event_stream(body: BoxStream<'static, Result<Bytes, reqwest::Error>>) -> ResponseStream {
    let state = StreamState {
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(event) = st.pending.pop_front() {
                return Some((Ok(event), st));
            }
            if st.done {
                return None;
            }
            match st.body.next().await {
                Some(Ok(chunk)) => {
                    let mut decoded = st.decoder.feed(&chunk);
                    st.pending.append(&mut decoded);
                }
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(ProviderError::Transport(e)), st));
                }
                None => return None,
            }
        }
    })
    .boxed()
}
