use axum::{
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
};
use minijinja::context;

use super::{parse_id, see_other};
use crate::{AppState, error::AppError, forms::MultipartForm, models::Developer};

/// add_developer_form
///
/// [Admin Route] Served under both `/addDev` and `/add-developer`.
pub async fn add_developer_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.views.render(
        "add-developer.html",
        context! { developer => Developer::default(), is_admin => true },
    )
}

/// create_developer
///
/// [Admin Route] Creates a developer profile; `logo` is the only file input.
pub async fn create_developer(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = MultipartForm::parse(multipart, state.storage.as_ref(), &["logo"]).await?;
    let developer = state.repo.create_developer(Developer::from_form(&form)).await?;

    tracing::info!(id = %developer.id, name = %developer.name, "developer created");
    Ok(see_other("/"))
}

pub async fn edit_developer_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&id, "Developer not found")?;
    let developer = state
        .repo
        .get_developer(id)
        .await?
        .ok_or_else(|| AppError::not_found("Developer not found"))?;

    state.views.render(
        "edit-developer.html",
        context! { developer, is_admin => true },
    )
}

/// update_developer
///
/// [Admin Route] Applies the edit form. Without a new upload the logo keeps
/// the value posted back by the form, or the stored one.
pub async fn update_developer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id, "Developer not found")?;
    let form = MultipartForm::parse(multipart, state.storage.as_ref(), &["logo"]).await?;

    let mut developer = state
        .repo
        .get_developer(id)
        .await?
        .ok_or_else(|| AppError::not_found("Developer not found"))?;
    developer.apply_update(&form);

    state
        .repo
        .update_developer(developer)
        .await?
        .ok_or_else(|| AppError::not_found("Developer not found"))?;

    tracing::info!(id = %id, "developer updated");
    Ok(see_other("/"))
}
