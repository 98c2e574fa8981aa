//! HTTP route table

use crate::handlers;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/gifts",
            get(handlers::gifts::list).post(handlers::gifts::create),
        )
        .route(
            "/gifts/:id",
            get(handlers::gifts::get).put(handlers::gifts::update),
        )
        .route(
            "/user-gifts",
            get(handlers::user_gifts::list).post(handlers::user_gifts::send),
        )
        .route(
            "/user-gifts/:id",
            get(handlers::user_gifts::get).delete(handlers::user_gifts::delete),
        )
        .route("/user-gifts/:id/read", post(handlers::user_gifts::mark_read))
        .route("/users/:user_id/gifts", get(handlers::users::received))
        .route(
            "/users/:user_id/gifts/read-all",
            post(handlers::users::read_all),
        )
        .route(
            "/users/:user_id/gifts/new-count",
            get(handlers::users::new_count),
        )
        .route(
            "/users/:user_id/gifts/recount",
            post(handlers::users::recount),
        )
        .route("/stats/tally", get(handlers::users::tally_stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{GiftCatalog, GiftService, GiftTallyCache};
    use crate::storage::{Database, MemoryCache};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use gift_core::ports::NullNotifier;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = Arc::new(Database::in_memory().await.unwrap());
        let cache = Arc::new(MemoryCache::new());
        let tally = Arc::new(GiftTallyCache::new(cache, db.clone(), None));
        let state = AppState {
            catalog: Arc::new(GiftCatalog::new(db.clone())),
            gifts: Arc::new(GiftService::new(
                db.clone(),
                db,
                tally.clone(),
                Arc::new(NullNotifier),
            )),
            tally,
        };
        router(state)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        // axum's own extractor rejections are plain text
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    fn send_body(gift_id: i64) -> Value {
        json!({
            "from": { "id": 1, "name": "Alice" },
            "to": { "id": 2, "name": "Bob" },
            "gift_id": gift_id,
            "message": "hi"
        })
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app().await;
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn send_then_count_and_read() {
        let app = app().await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/gifts",
            Some(json!({ "name": "Barnstar", "description": "For work" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let gift_id = body["gift"]["id"].as_i64().unwrap();

        let (status, body) = call(&app, Method::POST, "/api/v1/user-gifts", Some(send_body(gift_id))).await;
        assert_eq!(status, StatusCode::CREATED);
        let user_gift_id = body["user_gift_id"].as_i64().unwrap();

        let (status, body) = call(&app, Method::GET, "/api/v1/users/2/gifts/new-count", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["source"], "storage");

        let (_, body) = call(&app, Method::GET, "/api/v1/users/2/gifts/new-count", None).await;
        assert_eq!(body["source"], "cache");

        let (status, body) = call(&app, Method::GET, "/api/v1/users/2/gifts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["gifts"][0]["gift_name"], "Barnstar");

        let uri = format!("/api/v1/user-gifts/{}/read", user_gift_id);
        let (status, _) = call(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = call(&app, Method::GET, "/api/v1/users/2/gifts/new-count", None).await;
        assert_eq!(body["count"], 0);
        assert_eq!(body["source"], "cache");

        let (_, body) = call(&app, Method::GET, "/api/v1/stats/tally", None).await;
        assert_eq!(body["hits"], 2);
        assert_eq!(body["misses"], 1);
    }

    #[tokio::test]
    async fn read_all_reports_changed_rows() {
        let app = app().await;
        let (_, body) = call(
            &app,
            Method::POST,
            "/api/v1/gifts",
            Some(json!({ "name": "Kitten" })),
        )
        .await;
        let gift_id = body["gift"]["id"].as_i64().unwrap();
        for _ in 0..2 {
            call(&app, Method::POST, "/api/v1/user-gifts", Some(send_body(gift_id))).await;
        }

        let (status, body) = call(&app, Method::POST, "/api/v1/users/2/gifts/read-all", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["changed"], 2);

        let (_, body) = call(&app, Method::POST, "/api/v1/users/2/gifts/recount", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let app = app().await;
        for uri in ["/api/v1/gifts/99", "/api/v1/gifts/abc", "/api/v1/user-gifts/0"] {
            let (status, body) = call(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(body["code"], "not_found");
        }

        let (status, _) = call(&app, Method::POST, "/api/v1/user-gifts", Some(send_body(42))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn send_to_non_positive_user_is_rejected() {
        let app = app().await;
        let (_, body) = call(
            &app,
            Method::POST,
            "/api/v1/gifts",
            Some(json!({ "name": "Rose" })),
        )
        .await;
        let gift_id = body["gift"]["id"].as_i64().unwrap();

        let mut send = send_body(gift_id);
        send["to"]["id"] = json!(-5);
        let (status, _) = call(&app, Method::POST, "/api/v1/user-gifts", Some(send)).await;
        assert!(status.is_client_error(), "{}", status);

        let (_, body) = call(&app, Method::GET, "/api/v1/user-gifts", None).await;
        assert_eq!(body["user_gifts"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn blank_gift_name_is_rejected() {
        let app = app().await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/gifts",
            Some(json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");
    }
}
