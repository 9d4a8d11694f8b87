use axum::{
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
};
use minijinja::context;

use super::{parse_id, see_other};
use crate::{AppState, error::AppError, forms::MultipartForm, models::Testimonial};

pub async fn add_testimonial_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.views.render("test.html", context! { is_admin => true })
}

/// create_testimonial
///
/// [Admin Route] Stores a testimonial with an optional `logo` upload.
pub async fn create_testimonial(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = MultipartForm::parse(multipart, state.storage.as_ref(), &["logo"]).await?;
    let testimonial = state
        .repo
        .create_testimonial(Testimonial::from_form(&form))
        .await?;

    tracing::info!(id = %testimonial.id, "testimonial created");
    Ok(see_other("/"))
}

pub async fn edit_testimonial_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&id, "Test not found")?;
    let test = state
        .repo
        .get_testimonial(id)
        .await?
        .ok_or_else(|| AppError::not_found("Test not found"))?;

    state
        .views
        .render("edit-test.html", context! { test, is_admin => true })
}

/// update_testimonial
///
/// [Admin Route] The logo falls back to the `existingLogo` field when no new
/// file is uploaded.
pub async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id, "Test not found")?;
    let form = MultipartForm::parse(multipart, state.storage.as_ref(), &["logo"]).await?;

    let mut testimonial = state
        .repo
        .get_testimonial(id)
        .await?
        .ok_or_else(|| AppError::not_found("Test not found"))?;
    testimonial.apply_update(&form);

    state
        .repo
        .update_testimonial(testimonial)
        .await?
        .ok_or_else(|| AppError::not_found("Test not found"))?;

    tracing::info!(id = %id, "testimonial updated");
    Ok(see_other("/"))
}
