use crate::{
    AppState,
    handlers::{blogs, careers, leads, pages, search, session},
    proxy,
};
use axum::{
    Router,
    routing::{any, get, post},
};

/// Public Router Module
///
/// Endpoints reachable without an admin session: the public pages, the lead
/// form, JSON search, the access-code exchange and the upstream passthrough.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe.
        .route("/health", get(|| async { "ok" }))
        // --- Pages ---
        .route("/", get(pages::home))
        .route("/property/{id}", get(pages::property_detail))
        .route("/properties/location/{location}", get(pages::properties_by_location))
        .route("/developers", get(pages::developers_page))
        .route("/developer/{id}", get(pages::developer_detail))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/term", get(pages::term))
        .route("/policy", get(pages::policy))
        .route("/career", get(careers::careers))
        .route("/trending", get(blogs::trending))
        .route("/blogdetails/{id}", get(blogs::blog_details))
        // --- JSON ---
        // GET /search?q=...
        .route("/search", get(search::search_properties))
        .route("/list-icons", get(pages::list_icons))
        // POST /add-user
        // Lead capture from the enquiry forms (JSON or urlencoded).
        .route("/add-user", post(leads::add_user).get(leads::add_user_info))
        // --- Admin gate ---
        .route("/verify-code", post(session::verify_code))
        .route("/logout", get(session::logout))
        // --- Upstream ---
        .route("/proxy-font", get(proxy::proxy_font))
        .route("/api", any(proxy::forward_api))
        .route("/api/{*rest}", any(proxy::forward_api))
}
