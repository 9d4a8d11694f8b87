use axum::{
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
};
use minijinja::context;

use super::{parse_id, see_other};
use crate::{AppState, auth::Session, error::AppError, forms::MultipartForm, models::Blog};

const BLOG_FILE_FIELDS: &[&str] = &["image", "imgOne"];

/// trending
///
/// [Public Route] Blog index, newest first.
pub async fn trending(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let blogs = state.repo.list_blogs().await?;
    state
        .views
        .render("trending.html", context! { blogs, is_admin => session.is_admin })
}

pub async fn blog_details(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&id, "Blog not found")?;
    let blog = state
        .repo
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;

    state
        .views
        .render("blogdetails.html", context! { blog, is_admin => session.is_admin })
}

pub async fn new_blog_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.views.render("new.html", context! { is_admin => true })
}

/// create_blog
///
/// [Admin Route] Publishes a post. Every text field except `dates` and both
/// images are required; a missing one is a 400 naming the field.
pub async fn create_blog(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = MultipartForm::parse(multipart, state.storage.as_ref(), BLOG_FILE_FIELDS).await?;
    let blog = Blog::from_form(&form).inspect_err(|e| tracing::warn!("blog rejected: {}", e))?;
    let blog = state.repo.create_blog(blog).await?;

    tracing::info!(id = %blog.id, heading = %blog.heading, "blog created");
    Ok(see_other("/trending"))
}

pub async fn edit_blog_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&id, "Blog not found")?;
    let blog = state
        .repo
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;

    state.views.render("edit.html", context! { blog, is_admin => true })
}

/// update_blog
///
/// [Admin Route] Applies the edit form; images are replaced only when a new
/// file is uploaded.
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id, "Blog not found")?;
    let form = MultipartForm::parse(multipart, state.storage.as_ref(), BLOG_FILE_FIELDS).await?;

    let mut blog = state
        .repo
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;
    blog.apply_update(&form);

    state
        .repo
        .update_blog(blog)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;

    tracing::info!(id = %id, "blog updated");
    Ok(see_other("/admin"))
}
