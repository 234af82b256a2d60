//! GeminiClient against a local stand-in for the generateContent endpoint.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use sqlgen::{compose, Assistant, Cell, Config, ErrorKind, GeminiClient, QueryExecutor, SqlGenerator};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<(String, String, Value)>>>,
}

async fn generate_content(
    State(stub): State<Stub>,
    Path(model_call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    stub.seen.lock().unwrap().push((model_call, key, body));
    (stub.status, Json(stub.reply.clone()))
}

async fn start_stub(status: StatusCode, reply: Value) -> (SocketAddr, Stub) {
    let stub = Stub {
        status,
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1beta/models/:model_call", post(generate_content))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, stub)
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }]
    })
}

fn client_for(addr: SocketAddr) -> GeminiClient {
    let config = Config {
        api_key: Some("test-key".to_string()),
        api_base: format!("http://{}", addr),
        ..Config::default()
    };
    GeminiClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_returns_mocked_sql_exactly() {
    let (addr, stub) = start_stub(StatusCode::OK, text_reply("SELECT COUNT(*) FROM STUDENT;")).await;
    let client = client_for(addr);

    let sql = client
        .generate(&compose("How many entries of records are present?"))
        .await
        .unwrap();
    assert_eq!(sql, "SELECT COUNT(*) FROM STUDENT;");

    let seen = stub.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (model_call, key, body) = &seen[0];
    assert_eq!(model_call, "gemini-pro:generateContent");
    assert_eq!(key, "test-key");

    // Two parts, instructions first
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["text"], sqlgen::llm::SQL_INSTRUCTIONS);
    assert_eq!(parts[1]["text"], "How many entries of records are present?");
}

#[tokio::test]
async fn test_error_status_is_transport() {
    let (addr, _stub) = start_stub(
        StatusCode::FORBIDDEN,
        json!({"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}),
    )
    .await;
    let client = client_for(addr);

    let err = client.generate(&compose("anything")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn test_no_candidates_is_transport() {
    let (addr, _stub) = start_stub(StatusCode::OK, json!({"candidates": []})).await;
    let client = client_for(addr);

    let err = client.generate(&compose("anything")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_unreachable_api_is_transport() {
    // Bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    let err = client.generate(&compose("anything")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_missing_key_is_credential_missing() {
    let config = Config::default();
    let err = GeminiClient::from_config(&config).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
}

#[tokio::test]
async fn test_full_pipeline_through_stub() {
    let (addr, _stub) = start_stub(StatusCode::OK, text_reply("SELECT COUNT(*) FROM STUDENT;")).await;

    let dir = tempdir().unwrap();
    let path = dir.path().join("student.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE STUDENT (NAME TEXT, CLASS TEXT, SECTION TEXT);
         INSERT INTO STUDENT VALUES ('Alice', 'Data Science', 'A');
         INSERT INTO STUDENT VALUES ('Bob', 'ML', 'B');",
    )
    .unwrap();
    drop(conn);

    let generator: Arc<dyn SqlGenerator> = Arc::new(client_for(addr));
    let assistant = Assistant::new(generator, QueryExecutor::new(&path));

    let answer = assistant.ask("How many entries of records are present?").await.unwrap();
    assert_eq!(answer.sql, "SELECT COUNT(*) FROM STUDENT;");
    assert_eq!(answer.fetch.result.rows, vec![vec![Cell::Integer(2)]]);
    assert_eq!(assistant.executor().open_connections(), 0);
}
