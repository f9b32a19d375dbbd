//! Integration tests for the client transcript controller.
//! Runs a scripted relay server (chunked bodies, mid-stream aborts, error
//! statuses) and checks the transcript/loading/error state after each turn.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures_util::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use atlasd::chat::Role;
use atlasd::client::ChatController;

#[derive(Clone, Default)]
struct TestState {
    /// Bodies received by the /ok route, for request-shape assertions.
    captured: Arc<Mutex<Vec<Value>>>,
}

async fn ok_route(State(st): State<TestState>, body: Bytes) -> Response {
    let v: Value = serde_json::from_slice(&body).unwrap();
    st.captured.lock().unwrap().push(v);

    let chunks: Vec<&'static str> = vec!["Hello", " from", " Ljubljana"];
    let stream = stream::iter(chunks).then(|c| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<Bytes, io::Error>(Bytes::from_static(c.as_bytes()))
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(stream))
        .unwrap()
}

async fn empty_route() -> Response {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::empty())
        .unwrap()
}

async fn fail_mid_route() -> Response {
    let items: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from_static(b"par")),
        Err(io::Error::other("upstream died")),
    ];
    // Pace the items like ok_route so the headers and first chunk flush
    // before the abort; erroring immediately can tear the connection down
    // before the client even sees a response.
    let stream = stream::iter(items).then(|item| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        item
    });
    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(stream))
        .unwrap()
}

async fn rate_limit_route() -> impl IntoResponse {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({
            "error": "generation service rate limited the request",
            "type": "rate_limit_error",
        })),
    )
}

async fn bare_error_route() -> impl IntoResponse {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn_relay() -> (String, TestState) {
    let state = TestState::default();
    let router = Router::new()
        .route("/ok", post(ok_route))
        .route("/empty", post(empty_route))
        .route("/fail-mid", post(fail_mid_route))
        .route("/rate-limit", post(rate_limit_route))
        .route("/bare-error", post(bare_error_route))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn streams_reply_and_sends_full_transcript_as_history() {
    let (base, state) = spawn_relay().await;
    let mut ctl = ChatController::new(format!("{base}/ok"));

    ctl.send_message("  Slovenia  ").await;

    assert!(ctl.error().is_none());
    assert!(!ctl.is_loading());
    let messages = ctl.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "Slovenia");
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].content, "Hello from Ljubljana");

    // The request carried the trimmed message and the updated transcript.
    let captured = state.captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0]["message"], "Slovenia");
    let history = captured[0]["chatHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "assistant");
    assert_eq!(history[1]["role"], "user");
    assert_eq!(history[1]["content"], "Slovenia");
}

#[tokio::test]
async fn empty_stream_is_a_complete_turn() {
    let (base, _state) = spawn_relay().await;
    let mut ctl = ChatController::new(format!("{base}/empty"));

    ctl.send_message("Slovenia").await;

    // Natural EOF with no bytes: the empty assistant turn stays, no error.
    assert!(ctl.error().is_none());
    assert_eq!(ctl.messages().len(), 3);
    assert_eq!(ctl.messages()[2].content, "");
}

#[tokio::test]
async fn mid_stream_failure_removes_placeholder_and_keeps_user_turn() {
    let (base, _state) = spawn_relay().await;
    let mut ctl = ChatController::new(format!("{base}/fail-mid"));
    let before = ctl.messages().len();

    ctl.send_message("Slovenia").await;

    assert!(ctl.error().is_some());
    assert_eq!(ctl.messages().len(), before + 1);
    assert_eq!(ctl.messages().last().unwrap().role, Role::User);
    assert!(!ctl.is_loading());
}

#[tokio::test]
async fn rate_limit_rolls_back_to_pre_call_state() {
    let (base, _state) = spawn_relay().await;
    let mut ctl = ChatController::new(format!("{base}/rate-limit"));
    let before = ctl.messages().to_vec();

    ctl.send_message("Slovenia").await;

    assert_eq!(ctl.messages(), before.as_slice());
    assert!(ctl.error().unwrap().contains("rate limited"));
    assert!(!ctl.is_loading());
}

#[tokio::test]
async fn bare_http_error_reports_the_status() {
    let (base, _state) = spawn_relay().await;
    let mut ctl = ChatController::new(format!("{base}/bare-error"));

    ctl.send_message("Slovenia").await;

    assert_eq!(ctl.messages().len(), 1);
    assert!(ctl.error().unwrap().contains("500"));
}

#[tokio::test]
async fn trigger_fires_once_per_matching_turn_only() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let (base, _state) = spawn_relay().await;
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let mut ctl = ChatController::new(format!("{base}/ok")).on_trigger("slovenia", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    ctl.send_message("I choose SLOVENIA!").await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    ctl.send_message("What about Croatia?").await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
