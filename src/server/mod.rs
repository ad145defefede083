// Server module
// axum web surface hosting the chat session and the embedded UI


mod ui;

use axum::{
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::chat::{ChatSession, ChatTurn};
use crate::config::Config;
use crate::generation::Generator;
use crate::retriever::Retriever;
use crate::{GuideError, Result};

/// Preset example queries surfaced as one-click buttons in the UI
pub const EXAMPLE_QUERIES: &[&str] = &[
    "Best places for a boys adventure trip in winter under 15000 for 4 days",
    "Safe family trip during monsoon season",
    "Best beach spots for a girls trip",
];

/// Shared server state
///
/// One chat session per process; the mutex serializes submissions so each
/// turn blocks the session until its response is complete.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<ChatSession>>,
    retriever: Arc<Retriever>,
    generator: Arc<dyn Generator>,
    document_count: u64,
}

impl AppState {
    #[inline]
    pub fn new(
        retriever: Arc<Retriever>,
        generator: Arc<dyn Generator>,
        document_count: u64,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(ChatSession::new())),
            retriever,
            generator,
            document_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

/// Build the application router
#[inline]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/history", get(history_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/clear", post(clear_handler))
        .route("/api/examples", get(examples_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve the chat UI until the process is torn down
#[inline]
pub async fn start_server(config: &Config, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Chat server listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html(ui::INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "documents": state.document_count,
    }))
}

async fn history_handler(State(state): State<AppState>) -> Json<Vec<ChatTurn>> {
    let session = state.session.lock().await;
    Json(session.turns().to_vec())
}

async fn examples_handler() -> Json<Vec<&'static str>> {
    Json(EXAMPLE_QUERIES.to_vec())
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Message must not be empty"})),
        )
            .into_response();
    }

    // Holding the lock across the turn serializes submissions per session
    let mut session = state.session.lock().await;
    match session
        .submit(&state.retriever, state.generator.as_ref(), &message)
        .await
    {
        Ok(reply) => Json(ChatResponse { reply }).into_response(),
        Err(e) => ApiErrorResponse(e).into_response(),
    }
}

async fn clear_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.clear();
    Json(json!({"ok": true}))
}

struct ApiErrorResponse(GuideError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GuideError::Embedding(_) | GuideError::Inference(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!("Chat turn failed: {}", self.0);

        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}
