//! Test utilities for spendwise-core
//!
//! A mock LLM server that speaks the Gemini, OpenAI-compatible and Ollama
//! wire formats. Every generation endpoint answers with the same canned
//! text, so a test chooses the model output up front.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::oneshot;

struct ServerState {
    reply: String,
    /// Non-success status returned by every endpoint instead of a reply
    fail_with: Option<StatusCode>,
    delay: Duration,
}

/// Mock LLM server for tests and development
pub struct MockLlmServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start a server whose models always answer `reply`
    pub async fn start(reply: impl Into<String>) -> Self {
        Self::spawn(ServerState {
            reply: reply.into(),
            fail_with: None,
            delay: Duration::ZERO,
        })
        .await
    }

    /// Start a server that answers every request with `status`
    pub async fn failing(status: u16) -> Self {
        Self::spawn(ServerState {
            reply: String::new(),
            fail_with: Some(StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)),
            delay: Duration::ZERO,
        })
        .await
    }

    /// Start a server that waits `delay` before answering generation requests
    pub async fn slow(reply: impl Into<String>, delay: Duration) -> Self {
        Self::spawn(ServerState {
            reply: reply.into(),
            fail_with: None,
            delay,
        })
        .await
    }

    async fn spawn(state: ServerState) -> Self {
        let app = Router::new()
            // Gemini: GET for model lookup, POST for `{model}:generateContent`
            .route("/v1beta/models/:model", get(handle_ok).post(handle_gemini))
            .route("/v1/models", get(handle_ok))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/api/tags", get(handle_ok))
            .route("/api/generate", post(handle_ollama))
            .with_state(Arc::new(state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Reply with the configured text wrapped by `wrap`, or the failure status
async fn respond(
    state: &ServerState,
    wrap: impl FnOnce(&str) -> serde_json::Value,
) -> Response {
    if let Some(status) = state.fail_with {
        return (status, "mock failure").into_response();
    }
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    Json(wrap(&state.reply)).into_response()
}

async fn handle_ok(State(state): State<Arc<ServerState>>) -> Response {
    match state.fail_with {
        Some(status) => (status, "mock failure").into_response(),
        None => Json(json!({"models": [{"name": "mock"}]})).into_response(),
    }
}

async fn handle_gemini(State(state): State<Arc<ServerState>>) -> Response {
    respond(&state, |text| {
        json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
    })
    .await
}

async fn handle_chat(State(state): State<Arc<ServerState>>) -> Response {
    respond(&state, |text| {
        json!({"choices": [{"message": {"role": "assistant", "content": text}}]})
    })
    .await
}

async fn handle_ollama(State(state): State<Arc<ServerState>>) -> Response {
    respond(&state, |text| {
        json!({"model": "mock", "response": text, "done": true})
    })
    .await
}
