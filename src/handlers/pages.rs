use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;
use serde::Deserialize;

use super::{parse_id, search::sanitize_query};
use crate::{
    AppState,
    auth::Session,
    error::AppError,
    models::{CategorisedProperties, PropertyFilter, split_list},
};

/// HomeQuery
///
/// Query parameters of the home page.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Comma separated category labels.
    pub categories: Option<String>,
    pub search: Option<String>,
}

/// home
///
/// [Public Route] Landing page. Listings matching the optional category and
/// search filters are bucketed by category; developers, testimonials and the
/// per-location summary are loaded alongside.
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<HomeQuery>,
) -> Result<Html<String>, AppError> {
    let selected_categories = params
        .categories
        .as_deref()
        .map(split_list)
        .unwrap_or_default();
    let search_query = params.search.as_deref().map(sanitize_query).unwrap_or_default();

    let filter = PropertyFilter {
        categories: selected_categories.clone(),
        search: Some(search_query.clone()).filter(|q| !q.is_empty()),
        ..PropertyFilter::default()
    };

    let (properties, developers, tests, locations) = tokio::try_join!(
        state.repo.list_properties(filter),
        state.repo.list_developers(),
        state.repo.list_testimonials(),
        state.repo.location_summaries(),
    )?;

    state.views.render(
        "home.html",
        context! {
            properties => CategorisedProperties::from_properties(&properties),
            developers,
            tests,
            locations,
            is_admin => session.is_admin,
            search_query,
            selected_categories,
        },
    )
}

/// property_detail
///
/// [Public Route] One listing with its developer. A malformed id is a 400
/// here, unlike the other detail pages.
pub async fn property_detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = uuid::Uuid::parse_str(&id).map_err(|_| {
        tracing::warn!(id = %id, "invalid property id");
        AppError::bad_request("Invalid property ID")
    })?;

    let property = state
        .repo
        .get_property(id)
        .await?
        .ok_or_else(|| AppError::not_found("Property not found"))?;

    let developer = match property.developer {
        Some(developer_id) => state.repo.get_developer(developer_id).await?,
        None => None,
    };

    state.views.render(
        "property.html",
        context! {
            categories => property.categories.clone(),
            property,
            developer,
            is_admin => session.is_admin,
        },
    )
}

/// properties_by_location
///
/// [Public Route] Listings whose location equals the (already URL-decoded)
/// path segment.
pub async fn properties_by_location(
    State(state): State<AppState>,
    session: Session,
    Path(location): Path<String>,
) -> Result<Html<String>, AppError> {
    let properties = state.repo.properties_by_location(&location).await?;

    state.views.render(
        "location.html",
        context! { properties, location, is_admin => session.is_admin },
    )
}

/// developers_page
///
/// [Public Route] Every developer with every listing.
pub async fn developers_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let (developers, properties) = tokio::try_join!(
        state.repo.list_developers(),
        state.repo.list_properties(PropertyFilter::default()),
    )?;

    state.views.render(
        "developers.html",
        context! { developers, properties, is_admin => session.is_admin },
    )
}

/// developer_detail
///
/// [Public Route] One developer profile with its listings.
pub async fn developer_detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&id, "Developer not found")?;

    let developer = state
        .repo
        .get_developer(id)
        .await?
        .ok_or_else(|| AppError::not_found("Developer not found"))?;
    let properties = state.repo.properties_by_developer(developer.id).await?;

    state.views.render(
        "developers.html",
        context! { developer, properties, is_admin => session.is_admin },
    )
}

async fn static_page(state: &AppState, session: &Session, name: &str) -> Result<Html<String>, AppError> {
    state
        .views
        .render(name, context! { is_admin => session.is_admin })
}

pub async fn about(State(state): State<AppState>, session: Session) -> Result<Html<String>, AppError> {
    static_page(&state, &session, "about.html").await
}

pub async fn contact(State(state): State<AppState>, session: Session) -> Result<Html<String>, AppError> {
    static_page(&state, &session, "contact.html").await
}

pub async fn term(State(state): State<AppState>, session: Session) -> Result<Html<String>, AppError> {
    static_page(&state, &session, "term.html").await
}

pub async fn policy(State(state): State<AppState>, session: Session) -> Result<Html<String>, AppError> {
    static_page(&state, &session, "policy.html").await
}

/// list_icons
///
/// [Public Route] File names found in the static `icons/` directory, used by
/// the admin icon picker.
#[utoipa::path(
    get,
    path = "/list-icons",
    responses(
        (status = 200, description = "Icon file names", body = [String]),
        (status = 500, description = "Directory unreadable")
    )
)]
pub async fn list_icons(State(state): State<AppState>) -> Response {
    let dir = state.config.static_dir.join("icons");
    match state.storage.list_dir(&dir).await {
        Ok(names) => Json(names).into_response(),
        Err(e) => {
            tracing::error!("Unable to scan directory {}: {}", dir.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error reading directory.").into_response()
        }
    }
}
