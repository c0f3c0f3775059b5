//! Router-level tests against the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use marksheet_api::{app, AppState, MemoryStore, Settings, Store, TokenService};
use serde_json::{json, Value};
use tower::ServiceExt;

const PASSWORD: &str = "Abcdef1!";

fn test_app() -> Router {
    test_app_with_store().0
}

/// App plus a handle on its store for checking what a request persisted.
fn test_app_with_store() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let settings = Settings::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret".into()),
        _ => None,
    })
    .unwrap();
    let state = AppState::new(
        Arc::new(store.clone()),
        TokenService::new(&settings.jwt_secret, settings.token_ttl),
    );
    (app(state, &settings), store)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/v1/auth/",
            None,
            Some(json!({"firstName": "Ada", "lastName": "Lovelace", "email": email, "password": PASSWORD})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create_sheet(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        request(Method::POST, "/api/v1/sheets/", Some(token), Some(json!({"name": name}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_returns_token_and_rejects_duplicate_email() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    assert!(!token.is_empty());

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/",
            None,
            Some(json!({"firstName": "Bob", "lastName": "Smith", "email": "a@b.co", "password": PASSWORD})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Email already exists."}));
}

#[tokio::test]
async fn register_validates_input() {
    let app = test_app();
    let cases = [
        (json!({"firstName": "", "lastName": "L", "email": "a@b.co", "password": PASSWORD}), "First name must be between 1-50 characters."),
        (json!({"firstName": "A", "lastName": "L", "email": "not-an-email", "password": PASSWORD}), "Please provide a valid email."),
        (json!({"firstName": "A", "lastName": "L", "email": "a@b.co", "password": "abcdefgh"}), "Password must contain a special character."),
    ];
    for (payload, message) in cases {
        let (status, body) = send(&app, request(Method::POST, "/api/v1/auth/", None, Some(payload))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn login_checks_email_then_password() {
    let app = test_app();
    register(&app, "a@b.co").await;

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/auth/", None, Some(json!({"email": "a@b.co", "password": PASSWORD}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["token"].is_string());

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/auth/", None, Some(json!({"email": "a@b.co", "password": "Wrong123!"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Wrong password.");

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/v1/auth/login", None, Some(json!({"email": "x@y.co", "password": PASSWORD}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email does not exist.");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/v1/sheets/", None, Some(json!({"name": "Week 1"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, request(Method::GET, "/api/v1/sheets/", Some("garbage"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send(&app, request(Method::GET, "/api/v1/sheets/", Some(&token), None)).await;
    assert_eq!(body, json!({"success": true, "data": []}));
}

#[tokio::test]
async fn sheet_lifecycle() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    let sheet_id = create_sheet(&app, &token, "Week 1").await;

    let (status, body) = send(
        &app,
        request(
            Method::PATCH,
            &format!("/api/v1/sheets/{sheet_id}"),
            Some(&token),
            Some(json!({"col": "name", "val": "Week 2"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, body) = send(&app, request(Method::GET, "/api/v1/sheets", Some(&token), None)).await;
    assert_eq!(body["data"][0]["name"], "Week 2");
    assert_eq!(body["data"][0]["id"], sheet_id.as_str());

    let (status, _) = send(
        &app,
        request(Method::DELETE, &format!("/api/v1/sheets/{sheet_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, request(Method::GET, "/api/v1/sheets", Some(&token), None)).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn updates_reject_forbidden_and_unknown_columns() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    let sheet_id = create_sheet(&app, &token, "Week 1").await;
    let uri = format!("/api/v1/sheets/{sheet_id}");

    let (status, body) = send(
        &app,
        request(Method::PATCH, &uri, Some(&token), Some(json!({"col": "user_id", "val": "x"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'user_id' cannot be updated.");

    let (status, body) = send(
        &app,
        request(Method::PATCH, &uri, Some(&token), Some(json!({"col": "colour", "val": "red"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown field 'colour'.");

    let (status, body) = send(
        &app,
        request(Method::PATCH, "/api/v1/auth/", Some(&token), Some(json!({"col": "email", "val": "z@z.co"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'email' cannot be updated.");
}

#[tokio::test]
async fn other_accounts_cannot_touch_a_sheet() {
    let app = test_app();
    let owner = register(&app, "a@b.co").await;
    let intruder = register(&app, "c@d.co").await;
    let sheet_id = create_sheet(&app, &owner, "Week 1").await;
    let uri = format!("/api/v1/sheets/{sheet_id}");

    let (status, _) = send(
        &app,
        request(Method::PATCH, &uri, Some(&intruder), Some(json!({"col": "name", "val": "Mine"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&intruder), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, request(Method::GET, "/api/v1/sheets", Some(&owner), None)).await;
    assert_eq!(body["data"][0]["name"], "Week 1");
    let (_, body) = send(&app, request(Method::GET, "/api/v1/sheets", Some(&intruder), None)).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn entry_lifecycle() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    let sheet_id = create_sheet(&app, &token, "Week 1").await;
    let entries_uri = format!("/api/v1/sheets/{sheet_id}/entries/");

    let (status, body) = send(
        &app,
        request(Method::POST, &entries_uri, Some(&token), Some(json!({"name": "Alice"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["markCount"], 0);
    assert_eq!(body["data"]["sheetId"], sheet_id.as_str());
    let entry_id = body["data"]["id"].as_str().unwrap().to_string();
    let entry_uri = format!("/api/v1/sheets/{sheet_id}/entries/{entry_id}");

    let (status, _) = send(
        &app,
        request(Method::PATCH, &entry_uri, Some(&token), Some(json!({"col": "markCount", "val": 3}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request(Method::PATCH, &entry_uri, Some(&token), Some(json!({"col": "sheet_id", "val": "x"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'sheet_id' cannot be updated.");

    let (_, body) = send(&app, request(Method::GET, &entries_uri, Some(&token), None)).await;
    assert_eq!(body["data"][0]["markCount"], 3);

    let (status, _) = send(&app, request(Method::DELETE, &entry_uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, request(Method::GET, &entries_uri, Some(&token), None)).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn entry_on_missing_sheet_is_rejected() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    let uri = format!("/api/v1/sheets/{}/entries", uuid::Uuid::new_v4());
    let (status, body) = send(&app, request(Method::POST, &uri, Some(&token), Some(json!({"name": "Alice"})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Referenced resource does not exist.");
}

#[tokio::test]
async fn single_item_reads_are_unimplemented() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    let sheet_id = create_sheet(&app, &token, "Week 1").await;

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/v1/sheets/{sheet_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/v1/sheets/{sheet_id}/entries/{}", uuid::Uuid::new_v4()),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn password_change_then_login() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/pass-change",
            Some(&token),
            Some(json!({"oldPassword": "Nope123!", "newPassword": "Newpass1!"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Wrong password.");

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/pass-change",
            Some(&token),
            Some(json!({"oldPassword": PASSWORD, "newPassword": "Newpass1!"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(Method::POST, "/api/v1/auth/login", None, Some(json!({"email": "a@b.co", "password": PASSWORD}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/v1/auth/login", None, Some(json!({"email": "a@b.co", "password": "Newpass1!"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleting_account_removes_its_sheets() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    create_sheet(&app, &token, "Week 1").await;

    let (status, _) = send(&app, request(Method::DELETE, "/api/v1/auth/", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/auth/", None, Some(json!({"email": "a@b.co", "password": PASSWORD}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email does not exist.");
    let (_, body) = send(&app, request(Method::GET, "/api/v1/sheets", Some(&token), None)).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn health_and_ready() {
    let app = test_app();
    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, body) = send(&app, request(Method::GET, "/ready", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
    let (status, body) = send(&app, request(Method::GET, "/version", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "marksheet-api");
}

#[tokio::test]
async fn malformed_bodies_use_the_error_envelope() {
    let app = test_app();
    let raw = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, raw).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("JSON"), "{body}");

    let untyped = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/")
        .body(Body::from(json!({"email": "a@b.co"}).to_string()))
        .unwrap();
    let (status, body) = send(&app, untyped).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn account_name_update_persists() {
    let (app, store) = test_app_with_store();
    let token = register(&app, "a@b.co").await;

    for (col, val) in [("name", "Grace"), ("lastName", "Hopper")] {
        let (status, body) = send(
            &app,
            request(Method::PATCH, "/api/v1/auth/", Some(&token), Some(json!({"col": col, "val": val}))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    let account = store.account_by_email("a@b.co").await.unwrap().unwrap();
    assert_eq!(account.name, "Grace");
    assert_eq!(account.surname, "Hopper");
}

#[tokio::test]
async fn entry_changes_under_the_wrong_sheet_do_nothing() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    let sheet_id = create_sheet(&app, &token, "Week 1").await;
    let other_sheet = create_sheet(&app, &token, "Week 2").await;

    let entries_uri = format!("/api/v1/sheets/{sheet_id}/entries");
    let (_, body) = send(
        &app,
        request(Method::POST, &entries_uri, Some(&token), Some(json!({"name": "Alice"}))),
    )
    .await;
    let entry_id = body["data"]["id"].as_str().unwrap().to_string();
    let wrong_uri = format!("/api/v1/sheets/{other_sheet}/entries/{entry_id}");

    let (status, body) = send(
        &app,
        request(Method::PATCH, &wrong_uri, Some(&token), Some(json!({"col": "name", "val": "Mallory"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    let (status, body) = send(&app, request(Method::DELETE, &wrong_uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, body) = send(&app, request(Method::GET, &entries_uri, Some(&token), None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Alice");
}

#[tokio::test]
async fn password_change_for_deleted_account_is_rejected() {
    let app = test_app();
    let token = register(&app, "a@b.co").await;
    let (status, _) = send(&app, request(Method::DELETE, "/api/v1/auth/", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/pass-change",
            Some(&token),
            Some(json!({"oldPassword": PASSWORD, "newPassword": "Newpass1!"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Account does not exist."}));
}
