use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    error::AppError,
    forms::MultipartForm,
    models::{AddUserRequest, MessageResponse},
    repository::RepositoryState,
};

/// add_user
///
/// [Public Route] Stores an enquiry lead. Accepts JSON or an urlencoded form;
/// all of name, email and number must be non-blank.
#[utoipa::path(
    post,
    path = "/add-user",
    request_body(
        content = AddUserRequest,
        content_type = "application/json",
        description = "Also accepted as application/x-www-form-urlencoded"
    ),
    responses(
        (status = 201, description = "Lead stored", body = MessageResponse),
        (status = 400, description = "A field is missing"),
        (status = 500, description = "Repository failure")
    )
)]
pub async fn add_user(State(repo): State<RepositoryState>, request: Request) -> Response {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    let payload = if is_json {
        Json::<AddUserRequest>::from_request(request, &())
            .await
            .map(|Json(payload)| payload)
            .ok()
    } else {
        Form::<AddUserRequest>::from_request(request, &())
            .await
            .map(|Form(payload)| payload)
            .ok()
    };

    let Some(user) = payload.and_then(AddUserRequest::into_user) else {
        return (StatusCode::BAD_REQUEST, "All fields are required").into_response();
    };

    match repo.create_user(user).await {
        Ok(user) => {
            tracing::info!(id = %user.id, "lead stored");
            (
                StatusCode::CREATED,
                Json(MessageResponse {
                    message: "User successfully saved!".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error saving user: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub async fn add_user_info() -> &'static str {
    "Please submit the form via POST."
}

/// upload_file
///
/// [Admin Route] Stores a single `file` upload without attaching it to any
/// record.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<&'static str, AppError> {
    let form = MultipartForm::parse(multipart, state.storage.as_ref(), &["file"]).await?;
    match form.file("file") {
        Some(file) => tracing::info!(path = %file.path, size = file.size, "file uploaded"),
        None => tracing::warn!("upload request without a file"),
    }
    Ok("File uploaded successfully")
}
