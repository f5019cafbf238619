use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{AppState, accounts, messages};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route(
            "/messages",
            get(messages::get_messages).post(messages::create_message),
        )
        .route(
            "/messages/{message_id}",
            get(messages::get_message)
                .delete(messages::delete_message)
                .patch(messages::update_message),
        )
        .route("/accounts/{account_id}/messages", get(messages::get_account_messages))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use murmur_db::Database;

    use super::*;
    use crate::AppStateInner;

    fn app() -> Router {
        let db = Arc::new(Database::open_in_memory().unwrap());
        router(AppStateInner::new(db))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn register(app: &Router, username: &str, password: &str) -> i64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/register",
            Some(json!({ "username": username, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        json_of(&body)["accountId"].as_i64().unwrap()
    }

    async fn post_message(app: &Router, posted_by: i64, text: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/messages",
            Some(json!({ "postedBy": posted_by, "messageText": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        json_of(&body)
    }

    #[tokio::test]
    async fn register_statuses() {
        let app = app();
        register(&app, "alice", "pass1").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/register",
            Some(json!({ "username": "alice", "password": "pass2" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body)["status"], "409 Conflict");

        let (status, _) = send(
            &app,
            Method::POST,
            "/register",
            Some(json!({ "username": "", "password": "pass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(&app, Method::POST, "/register", Some(json!({ "username": "bob" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_statuses() {
        let app = app();
        let id = register(&app, "alice", "pass1").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "username": "alice", "password": "pass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_of(&body),
            json!({ "accountId": id, "username": "alice", "password": "pass1" })
        );

        let (status, _) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "username": "alice", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_message_validation() {
        let app = app();
        let id = register(&app, "alice", "pass1").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/messages",
            Some(json!({ "postedBy": id, "messageText": "x".repeat(256) })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/messages",
            Some(json!({ "postedBy": id + 100, "messageText": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(&app, Method::POST, "/messages", Some(json!({ "messageText": "hi" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/messages",
            Some(json!({ "postedBy": id, "messageText": "hi", "timePostedEpoch": 1669947792 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["timePostedEpoch"], 1669947792);
    }

    #[tokio::test]
    async fn null_fields_fail_validation() {
        let app = app();
        let id = register(&app, "alice", "pass1").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/register",
            Some(json!({ "username": null, "password": "pass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["message"], "Invalid account data");

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "username": null, "password": null })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json_of(&body)["message"], "Invalid credentials");

        let (status, body) = send(
            &app,
            Method::POST,
            "/messages",
            Some(json!({ "postedBy": id, "messageText": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["message"], "Invalid message data");

        let (status, body) =
            send(&app, Method::PATCH, "/messages/1", Some(json!({ "messageText": null }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["message"], "Message text is required");
    }

    #[tokio::test]
    async fn message_failures_report_fixed_reasons() {
        let app = app();

        // Invalid text without an author still reads as invalid data.
        let (status, body) =
            send(&app, Method::POST, "/messages", Some(json!({ "messageText": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json_of(&body),
            json!({ "status": "400 Bad Request", "message": "Invalid message data" })
        );

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/messages/9999",
            Some(json!({ "messageText": "valid" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["message"], "Failed to update message");
    }

    #[tokio::test]
    async fn missing_message_is_empty_ok() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/messages/42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (status, body) = send(&app, Method::DELETE, "/messages/42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn delete_returns_row_count() {
        let app = app();
        let id = register(&app, "alice", "pass1").await;
        let message_id = post_message(&app, id, "bye").await["messageId"].as_i64().unwrap();

        let uri = format!("/messages/{message_id}");
        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body), json!(1));

        let (_, body) = send(&app, Method::GET, &uri, None).await;
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn patch_message() {
        let app = app();
        let id = register(&app, "alice", "pass1").await;
        let message_id = post_message(&app, id, "first").await["messageId"].as_i64().unwrap();
        let uri = format!("/messages/{message_id}");

        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(&app, Method::PATCH, &uri, Some(json!({ "messageText": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/messages/9999",
            Some(json!({ "messageText": "valid" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            send(&app, Method::PATCH, &uri, Some(json!({ "messageText": "second" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body), json!(1));

        let (_, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(json_of(&body)["messageText"], "second");
    }

    #[tokio::test]
    async fn end_to_end_flow() {
        let app = app();
        let n = register(&app, "alice", "pass1").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "username": "alice", "password": "pass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["accountId"], n);

        let now = chrono::Utc::now().timestamp();
        let message = post_message(&app, n, "hello").await;
        assert_eq!(message["postedBy"], n);
        assert!((message["timePostedEpoch"].as_i64().unwrap() - now).abs() <= 2);

        let (status, body) = send(&app, Method::GET, &format!("/accounts/{n}/messages"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body), json!([message]));

        let (_, body) = send(&app, Method::GET, "/messages", None).await;
        assert_eq!(json_of(&body), json!([message]));

        let (status, body) = send(&app, Method::GET, "/accounts/9999/messages", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body), json!([]));
    }
}
