use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use crate::server::{
    router::router,
    service::{ai::test_support::ScriptedChat, storage::test_support::MemoryStorage},
    startup::connect_to_session,
    state::AppState,
    util::password::hash_password,
};
use entity::user::Role;
use test_utils::{builder::TestBuilder, factory::user::UserFactory};

mod access;
mod rejection;

const PASSWORD: &str = "secret123";

/// Full application router over an in-memory database, driven with `oneshot`.
struct TestApp {
    db: DatabaseConnection,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let session = connect_to_session(&test.db).await.unwrap();

        let state = AppState::new(
            test.db.clone(),
            Arc::new(MemoryStorage::default()),
            ScriptedChat::unavailable(),
            "@connect.polyu.hk".to_string(),
            "123456".to_string(),
        );

        Self {
            db: test.db,
            router: router().with_state(state).layer(session),
        }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Creates a user with the given role, logs in and returns the session cookie.
    async fn login_as(&self, role: Role) -> String {
        let user = UserFactory::new(&self.db)
            .role(role)
            .password_hash(hash_password(PASSWORD).unwrap())
            .build()
            .await
            .unwrap();

        let body = serde_json::json!({ "username": user.username, "password": PASSWORD });
        let response = self
            .send(json_request(Method::POST, "/api/auth/login", None, &body.to_string()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
            .unwrap()
    }
}

fn json_request(method: Method, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Multipart request with an empty form, enough to reach the handler's guard.
fn multipart_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=X");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from("--X--\r\n")).unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
