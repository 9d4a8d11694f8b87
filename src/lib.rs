use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use utoipa::OpenApi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod proxy;
pub mod repository;
pub mod storage;
pub mod views;

// Public and admin-gated routers.
pub mod routes;
use auth::AdminSession;
use routes::{admin, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{LocalDiskStorage, MockStorageService, StorageState};
pub use views::Views;

/// ApiDoc
///
/// OpenAPI description of the JSON endpoints (the HTML pages are not
/// described). Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::search::search_properties,
        handlers::pages::list_icons,
        handlers::leads::add_user,
    ),
    components(schemas(
        models::Property, models::PropertyDetails, models::PropertyMedia,
        models::AddUserRequest, models::MessageResponse, models::ErrorResponse,
    )),
    tags((name = "property-portal", description = "Property portal JSON endpoints"))
)]
pub struct ApiDoc;

/// AppState
///
/// The single container of shared services, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Document store (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Upload store.
    pub storage: StorageState,
    pub config: AppConfig,
    /// Compiled page templates.
    pub views: Views,
    /// Outbound HTTP client for the `/api` and font passthroughs.
    pub http: reqwest::Client,
}

impl AppState {
    /// Builds a state around the given stores with a fresh HTTP client and the
    /// embedded templates.
    pub fn new(
        repo: RepositoryState,
        storage: StorageState,
        config: AppConfig,
    ) -> Result<Self, error::AppError> {
        Ok(Self {
            repo,
            storage,
            config,
            views: Views::new()?,
            http: proxy::build_client()?,
        })
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Views {
    fn from_ref(app_state: &AppState) -> Views {
        app_state.views.clone()
    }
}

impl FromRef<AppState> for reqwest::Client {
    fn from_ref(app_state: &AppState) -> reqwest::Client {
        app_state.http.clone()
    }
}

/// admin_gate
///
/// Route layer for the admin router. `AdminSession` rejects non-admin
/// requests with the access-code page before the handler runs.
async fn admin_gate(_admin: AdminSession, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// static_routes
///
/// Directories served as-is. Unmatched paths fall back to files under
/// `views/`.
fn static_routes(config: &AppConfig) -> Router<AppState> {
    let root = &config.static_dir;
    Router::new()
        .nest_service("/images", ServeDir::new(root.join("images")))
        .nest_service("/icons", ServeDir::new(root.join("icons")))
        .nest_service("/reras", ServeDir::new(root.join("reras")))
        .nest_service("/files", ServeDir::new(&config.uploads_dir))
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .nest_service("/property-backend/views", ServeDir::new(root.join("views")))
        .fallback_service(ServeDir::new(root.join("views")))
}

/// create_router
///
/// Assembles the routing tree, the admin gate, and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(public::public_routes())
        .merge(
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), admin_gate)),
        )
        .merge(static_routes(&state.config))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
