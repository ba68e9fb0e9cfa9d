use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.create_user("alice", "secret").await.unwrap();
    engine.create_user("bob", "hunter2").await.unwrap();
    engine
}

async fn app() -> Router {
    server::router(engine().await)
}

fn basic(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

fn request(method: &str, uri: &str, user: (&str, &str), body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic(user.0, user.1));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

const ALICE: (&str, &str) = ("alice", "secret");
const BOB: (&str, &str) = ("bob", "hunter2");

#[tokio::test]
async fn missing_credentials_are_unauthorized() {
    let app = app().await;
    let req = Request::builder()
        .uri("/expenses/total-spent")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = app().await;
    let (status, _) = send(
        &app,
        request("GET", "/expenses/total-spent", ("alice", "nope"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn total_spent_is_zero_without_expenses() {
    let app = app().await;
    let (status, body) = send(&app, request("GET", "/expenses/total-spent", ALICE, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": "0.00" }));
}

#[tokio::test]
async fn create_then_total_spent() {
    let app = app().await;

    for amount in ["40", "2.5"] {
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/expenses",
                ALICE,
                Some(json!({ "title": "Lunch", "amount": amount, "date": "2024-05-01" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["userId"], "alice");
        assert_eq!(body["date"], "2024-05-01");
        assert!(body["createdAt"].is_string());
    }

    send(
        &app,
        request(
            "POST",
            "/expenses",
            BOB,
            Some(json!({ "title": "Bike", "amount": "300", "date": "2024-05-02" })),
        ),
    )
    .await;

    let (status, body) = send(&app, request("GET", "/expenses/total-spent", ALICE, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": "42.50" }));
}

#[tokio::test]
async fn invalid_expense_returns_field_issues() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/expenses",
            ALICE,
            Some(json!({
                "title": "ab",
                "description": "x".repeat(256),
                "amount": "12.345",
                "date": "2024-05-01"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["issues"],
        json!([
            { "path": ["title"], "message": "Title must be at least 3 characters" },
            { "path": ["description"], "message": "Description is to long" },
            { "path": ["amount"], "message": "Amount must be a valid monetary value" }
        ])
    );

    let (_, body) = send(&app, request("GET", "/expenses", ALICE, None)).await;
    assert_eq!(body["expenses"], json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/expenses")
        .header(header::AUTHORIZATION, basic("alice", "secret"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn other_users_expenses_are_not_found() {
    let app = app().await;

    let (_, created) = send(
        &app,
        request(
            "POST",
            "/expenses",
            ALICE,
            Some(json!({ "title": "Books", "amount": "15", "date": "2024-05-01" })),
        ),
    )
    .await;
    let uri = format!("/expenses/{}", created["id"]);

    let (status, _) = send(&app, request("GET", &uri, BOB, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, request("DELETE", &uri, BOB, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, request("GET", &uri, ALICE, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], "15.00");

    let (status, _) = send(&app, request("DELETE", &uri, ALICE, None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, request("GET", &uri, ALICE, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn goal_defaults_to_zero_and_latest_wins() {
    let app = app().await;

    let (status, _) = send(&app, request("GET", "/goal", ALICE, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, request("POST", "/goal", ALICE, Some(json!({})))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["spentGoal"], 0);

    let (status, _) = send(
        &app,
        request("POST", "/goal", ALICE, Some(json!({ "spentGoal": 250 }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, request("GET", "/goal", ALICE, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spentGoal"], 250);
}

#[tokio::test]
async fn negative_goal_is_rejected() {
    let app = app().await;
    let (status, body) = send(
        &app,
        request("POST", "/goal", ALICE, Some(json!({ "spentGoal": -1 }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["issues"][0]["message"],
        "Number must be greater than or equal to 0"
    );
}

#[tokio::test]
async fn goal_progress_reports_remaining_budget() {
    let app = app().await;

    send(
        &app,
        request("POST", "/goal", ALICE, Some(json!({ "spentGoal": 100 }))),
    )
    .await;
    send(
        &app,
        request(
            "POST",
            "/expenses",
            ALICE,
            Some(json!({ "title": "Shoes", "amount": "120", "date": "2024-05-01" })),
        ),
    )
    .await;

    let (status, body) = send(&app, request("GET", "/goal/progress", ALICE, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "total": "120.00", "goal": 100, "remaining": "-20.00", "exceeded": true })
    );
}

#[tokio::test]
async fn mistyped_expense_fields_are_field_issues() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/expenses",
            ALICE,
            Some(json!({ "title": 42, "amount": 12.5, "date": "2024-05-01" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation failed");
    assert_eq!(
        body["issues"],
        json!([
            { "path": ["title"], "message": "Expected string, received number" },
            { "path": ["amount"], "message": "Expected string, received number" }
        ])
    );

    let (_, body) = send(&app, request("GET", "/expenses", ALICE, None)).await;
    assert_eq!(body["expenses"], json!([]));
}

#[tokio::test]
async fn string_goal_is_a_field_issue() {
    let app = app().await;
    let (status, body) = send(
        &app,
        request("POST", "/goal", ALICE, Some(json!({ "spentGoal": "100" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["issues"],
        json!([{ "path": ["spentGoal"], "message": "Expected number, received string" }])
    );

    let (status, _) = send(&app, request("GET", "/goal", ALICE, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn serves_on_a_bound_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(server::run_with_listener(engine().await, listener));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /expenses/total-spent HTTP/1.1\r\nHost: {addr}\r\nAuthorization: {}\r\nConnection: close\r\n\r\n",
        basic("alice", "secret")
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with(r#"{"total":"0.00"}"#), "{response}");

    server.abort();
}
