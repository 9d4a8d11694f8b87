use crate::{
    AppState,
    handlers::{admin, blogs, careers, developers, leads, properties, testimonials},
};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Admin Router Module
///
/// Content management routes. `create_router` wraps this whole router in the
/// admin gate (`AdminSession`), so handlers here assume an admin caller.
/// Paths keep the site's historical names (`/addDev`, `/addTest`, `/new`),
/// which is why they are not nested under one prefix.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin?developer=&status=&search=
        // Dashboard with every collection and the listing filters.
        .route("/admin", get(admin::dashboard))
        // POST /admin/delete/{id}
        // Removes the id from whichever collection holds it.
        .route("/admin/delete/{id}", post(admin::delete_entry))
        // --- Listings ---
        .route(
            "/add",
            get(properties::add_property_form).post(properties::create_property),
        )
        .route("/admin/edit/property/{id}", get(properties::edit_property_form))
        .route("/admin/update/property/{id}", post(properties::update_property))
        // --- Developers ---
        .route("/addDev", get(developers::add_developer_form))
        .route(
            "/add-developer",
            get(developers::add_developer_form).post(developers::create_developer),
        )
        .route("/admin/edit/developer/{id}", get(developers::edit_developer_form))
        .route("/admin/update/developer/{id}", post(developers::update_developer))
        // --- Testimonials ---
        .route(
            "/addTest",
            get(testimonials::add_testimonial_form).post(testimonials::create_testimonial),
        )
        .route("/admin/edit/test/{id}", get(testimonials::edit_testimonial_form))
        .route("/admin/update/test/{id}", post(testimonials::update_testimonial))
        // --- Blog ---
        .route("/new", get(blogs::new_blog_form).post(blogs::create_blog))
        .route(
            "/admin/edit/{id}",
            get(blogs::edit_blog_form).post(blogs::update_blog),
        )
        // --- Careers ---
        .route("/career-form", get(careers::career_form))
        .route("/career", post(careers::create_career))
        .route("/career/{id}", delete(careers::delete_career))
        // POST /upload
        // Stand-alone single file upload.
        .route("/upload", post(leads::upload_file))
}
