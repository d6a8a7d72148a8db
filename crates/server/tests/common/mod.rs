use axum::{
    body::Body,
    http::{
        header::{ACCEPT, CONTENT_TYPE, COOKIE, SET_COOKIE},
        Method, Request, StatusCode,
    },
    Router,
};
use serde_json::{json, Value};
use server::{build_router, build_state, cli::Cli};
use tempfile::TempDir;
use tower::ServiceExt;

/// Router over a fresh database in a temporary directory. Keeps the session
/// cookie between requests like a browser would
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    _dir: Option<TempDir>,
}

impl TestApp {
    pub async fn new() -> Self {
        shared::configure_tracing_once();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let (state, store) = build_state(Cli::with_database(path.to_str().unwrap())).await.unwrap();
        let router = build_router(state, store).unwrap();
        Self { router, cookie: None, _dir: Some(dir) }
    }

    /// A second client on the same server, without a session
    pub fn anonymous(&self) -> Self {
        Self { router: self.router.clone(), cookie: None, _dir: None }
    }

    pub async fn request(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder =
            Request::builder().method(method).uri(uri).header(ACCEPT, "application/json");
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response.headers().get(SET_COOKIE) {
            let cookie = set_cookie.to_str().unwrap().split(';').next().unwrap().to_owned();
            self.cookie = Some(cookie);
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Register and stay logged in
    pub async fn register(&mut self, username: &str) -> Value {
        let (status, profile) = self
            .post(
                "/api/auth/register",
                json!({ "username": username, "password": "correct horse" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{profile}");
        profile
    }
}

pub fn challenge_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Every day in June",
        "start_date": "2024-06-01T09:00:00",
        "end_date": "2024-06-30T09:00:00",
        "entry_fee": 5.0
    })
}

pub fn id_of(row: &Value, field: &str) -> String {
    row[field].as_str().unwrap().to_owned()
}
