//! HTTP surface: the question page plus a small JSON API.
//!
//! ## Endpoints
//!
//! - `GET  /`            - Question form
//! - `POST /`            - Submit a question (form-encoded), re-render with results
//! - `POST /api/v1/ask`  - Same pipeline, JSON in and out
//! - `GET  /health`      - Liveness probe

pub mod page;

pub use page::{escape_html, render_page, PageView};

use crate::assistant::Assistant;
use crate::llm::SqlGenerator;
use crate::types::{Cell, ErrorKind, Result, SqlGenError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

// ── Shared state ────────────────────────────────────────────────────────

/// Shared state for page and API handlers.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Assistant<dyn SqlGenerator>,
    /// Database file name shown in the sidebar
    pub db_name: Arc<str>,
}

impl AppState {
    pub fn new(assistant: Assistant<dyn SqlGenerator>) -> Self {
        let db_name = assistant
            .executor()
            .db_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| assistant.executor().db_path().display().to_string());

        Self {
            assistant,
            db_name: Arc::from(db_name),
        }
    }
}

// ── Request / Response types ────────────────────────────────────────────

/// Form body for `POST /`.
#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// Request body for `POST /api/v1/ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Response body for `POST /api/v1/ask`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub sql: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub row_count: usize,
    /// Execution error, if the statement failed
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

// ── Router creation ─────────────────────────────────────────────────────

/// Build the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/v1/ask", post(ask_api_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
///
/// Returns `SqlGenError::Config` if the address cannot be bound
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            SqlGenError::config(format!(
                "Port {} is already in use. Pick another with --bind 127.0.0.1:{}",
                addr.port(),
                addr.port().wrapping_add(1)
            ))
        } else {
            SqlGenError::config(format!("Failed to bind {}: {}", addr, e))
        }
    })?;

    info!(addr = %addr, "Serving question page");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

// ── Handlers ────────────────────────────────────────────────────────────

/// `GET /` -- empty form.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&PageView::Empty, &state.db_name))
}

/// `POST /` -- run the pipeline and render everything on one page.
///
/// Always 200: failures are shown on the page, as the form expects.
async fn submit_handler(State(state): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    match state.assistant.ask(&form.question).await {
        Ok(answer) => Html(render_page(&PageView::Answered(&answer), &state.db_name)),
        Err(error) => {
            let view = PageView::Failed {
                question: &form.question,
                error: &error,
            };
            Html(render_page(&view, &state.db_name))
        }
    }
}

/// `POST /api/v1/ask` -- JSON variant of the pipeline.
async fn ask_api_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> std::result::Result<Json<AskResponse>, ApiError> {
    let answer = state.assistant.ask(&request.question).await?;

    let row_count = answer.fetch.result.row_count();
    Ok(Json(AskResponse {
        question: answer.question,
        sql: answer.sql,
        columns: answer.fetch.result.columns,
        rows: answer.fetch.result.rows,
        row_count,
        error: answer.fetch.error.map(|e| e.to_string()),
        elapsed_ms: answer.elapsed_ms,
    }))
}

/// `GET /health`
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ── Error type ──────────────────────────────────────────────────────────

/// API error wrapper; status follows the error kind.
#[derive(Debug)]
pub struct ApiError(pub SqlGenError);

impl From<SqlGenError> for ApiError {
    fn from(e: SqlGenError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::CredentialMissing | ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Transport => StatusCode::BAD_GATEWAY,
            ErrorKind::Execution => StatusCode::BAD_REQUEST,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            kind: kind.as_str(),
        });
        (status, body).into_response()
    }
}
