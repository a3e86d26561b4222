//! End-to-end checks of `HttpGenerator` against a local stub of the
//! message-generation service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use haui_chat_engine::{ChatSession, Config, HttpGenerator, Role, FALLBACK_REPLY, GENERATE_PATH};

type Seen = Arc<Mutex<Vec<(Value, HashMap<String, String>)>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn generator_for(endpoint: String) -> HttpGenerator {
    let config = Config {
        endpoint,
        ..Config::default()
    };
    HttpGenerator::from_config(&config).unwrap()
}

async fn echo(
    State(seen): State<Seen>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let question = body["question"].as_str().unwrap_or_default().to_string();
    let session = body["session_id"].as_str().unwrap_or("abc").to_string();
    seen.lock().unwrap().push((body, query));
    Json(json!({ "answer": format!("echo: {question}"), "session_id": session }))
}

#[tokio::test]
async fn test_round_trip_establishes_session() {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route(GENERATE_PATH, post(echo))
        .with_state(Arc::clone(&seen));
    let generator = generator_for(serve(router).await);

    let mut session = ChatSession::new();
    assert!(session.send(&generator, "Hello").await);
    assert!(session.send(&generator, "Again").await);

    let conversation: Vec<(Role, &str)> = session
        .conversation()
        .iter()
        .map(|m| (m.role(), m.content()))
        .collect();
    assert_eq!(
        conversation,
        vec![
            (Role::User, "Hello"),
            (Role::Bot, "echo: Hello"),
            (Role::User, "Again"),
            (Role::Bot, "echo: Again"),
        ]
    );
    assert_eq!(session.session_id(), Some("abc"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, json!({ "question": "Hello", "session_id": null }));
    assert_eq!(seen[1].0, json!({ "question": "Again", "session_id": "abc" }));
    assert!(seen[0].1.is_empty());
}

#[tokio::test]
async fn test_query_parameters_forwarded() {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route(GENERATE_PATH, post(echo))
        .with_state(Arc::clone(&seen));
    let config = Config {
        endpoint: serve(router).await,
        collection_name: Some("tuyen_sinh".into()),
        max_tokens: Some(300),
        ..Config::default()
    };
    let generator = HttpGenerator::from_config(&config).unwrap();

    let mut session = ChatSession::new();
    session.send(&generator, "Học phí?").await;

    let seen = seen.lock().unwrap();
    let query = &seen[0].1;
    assert_eq!(query.get("collection_name").map(String::as_str), Some("tuyen_sinh"));
    assert_eq!(query.get("max_tokens").map(String::as_str), Some("300"));
}

#[tokio::test]
async fn test_server_error_becomes_fallback() {
    let router = Router::new().route(
        GENERATE_PATH,
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let generator = generator_for(serve(router).await);

    let mut session = ChatSession::new();
    session.send(&generator, "Test").await;

    assert_eq!(session.conversation().len(), 2);
    assert_eq!(session.conversation().get(1).unwrap().content(), FALLBACK_REPLY);
    assert_eq!(session.session_id(), None);
}

#[tokio::test]
async fn test_missing_fields_become_fallback() {
    let router = Router::new().route(
        GENERATE_PATH,
        post(|| async { Json(json!({ "answer": "no session here" })) }),
    );
    let generator = generator_for(serve(router).await);

    let mut session = ChatSession::new();
    session.send(&generator, "Test").await;

    assert_eq!(session.conversation().get(1).unwrap().content(), FALLBACK_REPLY);
    assert_eq!(session.session_id(), None);
}

#[tokio::test]
async fn test_connection_refused_becomes_fallback() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let generator = generator_for(format!("http://{addr}"));

    let mut session = ChatSession::new();
    session.send(&generator, "Test").await;

    let last = session.conversation().last().unwrap();
    assert_eq!(last.role(), Role::Bot);
    assert_eq!(last.content(), FALLBACK_REPLY);
}
