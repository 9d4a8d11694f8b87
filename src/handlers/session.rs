use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::see_other;
use crate::{
    auth::{issue_session, removal_cookie, session_cookie},
    config::AppConfig,
    error::AppError,
};

/// VerifyCodeForm
///
/// Body of POST /verify-code.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyCodeForm {
    #[serde(default)]
    pub code: String,
}

/// verify_code
///
/// [Public Route] Exchanges the shared access code for an admin session
/// cookie. A wrong code is a plain 401.
pub async fn verify_code(
    State(config): State<AppConfig>,
    jar: CookieJar,
    Form(form): Form<VerifyCodeForm>,
) -> Result<Response, AppError> {
    if form.code.trim() != config.admin_access_code {
        tracing::warn!("admin access code rejected");
        return Err(AppError::Unauthorized);
    }

    let token = issue_session(&config, true)?;
    tracing::info!("admin session opened");
    Ok((jar.add(session_cookie(&config, token)), see_other("/admin")).into_response())
}

/// logout
///
/// [Public Route] Drops the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(removal_cookie()), see_other("/"))
}
