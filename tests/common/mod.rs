#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use property_portal::{
    AppConfig, AppState, MemoryRepository, MockStorageService, create_router,
    auth::{SESSION_COOKIE, issue_session},
    repository::RepositoryState,
    storage::StorageState,
};
use std::sync::Arc;

pub const BOUNDARY: &str = "portal-test-boundary";

/// Test harness: the router plus handles on the in-memory stores behind it.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryRepository>,
    pub storage: MockStorageService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(MemoryRepository::new(), MockStorageService::new())
    }

    pub fn with(repo: MemoryRepository, storage: MockStorageService) -> Self {
        Self::with_config(repo, storage, AppConfig::default())
    }

    pub fn with_config(repo: MemoryRepository, storage: MockStorageService, config: AppConfig) -> Self {
        let repo = Arc::new(repo);
        let router = build_router(
            repo.clone() as RepositoryState,
            Arc::new(storage.clone()) as StorageState,
            config,
        );

        Self {
            router,
            repo,
            storage,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        send_to(&self.router, request).await
    }
}

/// Full application router over arbitrary stores.
pub fn build_router(repo: RepositoryState, storage: StorageState, config: AppConfig) -> Router {
    let state = AppState::new(repo, storage, config).expect("application state builds");
    create_router(state)
}

pub async fn send_to(router: &Router, request: Request<Body>) -> Response<Body> {
    use tower::ServiceExt;
    router.clone().oneshot(request).await.unwrap()
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// `Cookie` header value of a valid admin session.
pub fn admin_cookie() -> String {
    let token = issue_session(&AppConfig::default(), true).unwrap();
    format!("{}={}", SESSION_COOKIE, token)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn admin_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, admin_cookie())
        .body(Body::empty())
        .unwrap()
}

pub fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, admin_cookie())
        .body(Body::empty())
        .unwrap()
}

pub fn form_post(uri: &str, body: &str, cookie: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn multipart_post(uri: &str, body: MultipartBody) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::COOKIE, admin_cookie())
        .body(Body::from(body.finish()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, filename
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.buf
    }
}
