use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use minijinja::context;

use super::{parse_id, see_other};
use crate::{
    AppState,
    auth::Session,
    error::AppError,
    models::{Career, CareerForm},
};

/// careers
///
/// [Public Route] Open positions.
pub async fn careers(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let careers = state.repo.list_careers().await?;
    state
        .views
        .render("career.html", context! { careers, is_admin => session.is_admin })
}

pub async fn career_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.views.render("career-form.html", context! { is_admin => true })
}

/// create_career
///
/// [Admin Route] Urlencoded form with role, experience and location.
pub async fn create_career(
    State(state): State<AppState>,
    Form(form): Form<CareerForm>,
) -> Result<Redirect, AppError> {
    let career = state.repo.create_career(Career::from(form)).await?;

    tracing::info!(id = %career.id, role = %career.role, "career created");
    Ok(see_other("/career"))
}

/// delete_career
///
/// [Admin Route] Removes a posting. Deleting an unknown id still redirects.
pub async fn delete_career(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id, "Career not found")?;
    let removed = state.repo.delete_career(id).await?;

    tracing::info!(id = %id, removed, "career delete");
    Ok(see_other("/career"))
}
