use axum::{
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
};
use minijinja::context;

use super::{parse_id, see_other};
use crate::{
    AppState,
    error::AppError,
    forms::MultipartForm,
    models::{
        CATEGORY_AFFORDABLE, CATEGORY_LUXURY, CATEGORY_PREMIUM, CATEGORY_TRENDING, CATEGORY_ULTRA,
        Property, PropertyDetails, PropertyMedia,
    },
};

const CATEGORIES: [&str; 5] = [
    CATEGORY_TRENDING,
    CATEGORY_ULTRA,
    CATEGORY_LUXURY,
    CATEGORY_PREMIUM,
    CATEGORY_AFFORDABLE,
];

/// add_property_form
///
/// [Admin Route] Empty listing form with the developer picker.
pub async fn add_property_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let developers = state.repo.list_developers().await?;
    state.views.render(
        "add.html",
        context! {
            developers,
            text_fields => PropertyDetails::FORM_FIELDS,
            categories => CATEGORIES,
            is_admin => true,
        },
    )
}

/// create_property
///
/// [Admin Route] Creates a listing from the multipart form. The referenced
/// developer must exist, otherwise 404 `Unknown Developer`.
pub async fn create_property(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form =
        MultipartForm::parse(multipart, state.storage.as_ref(), PropertyMedia::FILE_FIELDS).await?;

    let developer_id = form
        .text("developerId")
        .and_then(|raw| uuid::Uuid::parse_str(raw.trim()).ok())
        .ok_or_else(|| AppError::not_found("Unknown Developer"))?;
    let developer = state
        .repo
        .get_developer(developer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Unknown Developer"))?;

    let property = state
        .repo
        .create_property(Property::from_form(&form, developer.id))
        .await?;

    tracing::info!(id = %property.id, developer = %developer.id, "property created");
    Ok(see_other("/"))
}

/// edit_property_form
///
/// [Admin Route] Listing edit form, prefilled.
pub async fn edit_property_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&id, "Property not found")?;
    let property = state
        .repo
        .get_property(id)
        .await?
        .ok_or_else(|| AppError::not_found("Property not found"))?;
    let developers = state.repo.list_developers().await?;

    state.views.render(
        "edit-property.html",
        context! {
            property,
            developers,
            text_fields => PropertyDetails::FORM_FIELDS,
            categories => CATEGORIES,
            is_admin => true,
        },
    )
}

/// update_property
///
/// [Admin Route] Applies the edit form. Only `imageUrl` may be re-uploaded;
/// other media stays as stored.
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id, "Property not found")?;
    let form = MultipartForm::parse(multipart, state.storage.as_ref(), &["imageUrl"]).await?;

    let mut property = state
        .repo
        .get_property(id)
        .await?
        .ok_or_else(|| AppError::not_found("Property not found"))?;
    property.apply_update(&form);

    state
        .repo
        .update_property(property)
        .await?
        .ok_or_else(|| AppError::not_found("Property not found"))?;

    tracing::info!(id = %id, "property updated");
    Ok(see_other("/"))
}
