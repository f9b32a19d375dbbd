// provider/mod.rs — Generation-service boundary.
//
// The relay endpoint talks to an abstract streaming response client, not a
// concrete vendor SDK or a module-global handle. The real implementation
// (openai.rs) is injected at startup; tests inject scripted mocks.

pub mod openai;
pub mod sse;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

pub use openai::OpenAiClient;

/// One streamed generation call. Instructions carry the system prompt plus
/// any rendered conversation context; `input` is the new user message.
#[derive(Debug, Clone)]
pub struct ResponseRequest {
    pub instructions: String,
    pub input: String,
    /// Upper bound on generated tokens — the only hard cap on response size.
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Discriminated event from the upstream event stream. Only text deltas are
/// forwarded to callers; everything else is consumed and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    Created,
    OutputTextDelta { delta: String },
    Completed,
    /// Any event kind we do not act on, kept for logging.
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Upstream signaled rate limiting (HTTP 429).
    #[error("generation service rate limited the request")]
    RateLimited,
    /// Upstream unreachable or failing (connect error, 5xx).
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
    /// Upstream rejected the request outright (auth, bad model, ...).
    #[error("generation service error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Transport failure while reading the event stream.
    #[error("stream transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Ordered event stream for one generation call. Dropping it abandons the
/// upstream call — cancellation needs no extra plumbing.
pub type ResponseStream = BoxStream<'static, Result<ResponseEvent, ProviderError>>;

/// Streaming generation capability.
#[async_trait]
pub trait ResponseClient: Send + Sync {
    /// Open a streamed generation call. Errors returned here happen before
    /// any output exists and can still be reported structurally; errors after
    /// this point surface as items on the stream.
    async fn stream(&self, request: ResponseRequest) -> Result<ResponseStream, ProviderError>;
}
