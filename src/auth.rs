use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use minijinja::context;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    views::Views,
};

/// Name of the cookie carrying the signed session.
pub const SESSION_COOKIE: &str = "portal_session";

/// Sessions expire after 12 hours.
const SESSION_TTL_SECS: i64 = 12 * 60 * 60;

/// Claims
///
/// Payload of the session token. The token is signed with the configured
/// session secret, so `admin` cannot be flipped by the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Random per-session id.
    pub sub: Uuid,
    pub admin: bool,
    pub iat: usize,
    pub exp: usize,
}

/// issue_session
///
/// Signs a new session token. `admin` is the flag the admin gate checks.
pub fn issue_session(config: &AppConfig, admin: bool) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4(),
        admin,
        iat: now as usize,
        exp: (now + SESSION_TTL_SECS) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Decodes a session token, `None` if it is forged, malformed or expired.
pub fn decode_session(config: &AppConfig, token: &str) -> Option<Claims> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

/// Builds the HttpOnly cookie holding `token`.
pub fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.env == Env::Production)
        .path("/")
        .build()
}

/// Cookie used to clear the session on logout.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Session
///
/// The visitor's session as read from the cookie. Never rejects: a missing,
/// expired or forged cookie yields an anonymous session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub id: Option<Uuid>,
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let session = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| decode_session(&config, cookie.value()))
            .map(|claims| Session {
                id: Some(claims.sub),
                is_admin: claims.admin,
            })
            .unwrap_or_default();

        Ok(session)
    }
}

/// AdminSession
///
/// Extractor guarding the admin routes. Requests without an admin session get
/// the access-code page with a 401 instead of reaching the handler.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
    Views: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(session) = Session::from_request_parts(parts, state).await;
        if session.is_admin {
            return Ok(AdminSession(session));
        }

        tracing::info!(path = %parts.uri.path(), "admin route requested without admin session");

        let views = Views::from_ref(state);
        let page = views
            .render("verify-code.html", context! {})
            .map_err(IntoResponse::into_response)?;
        Err((StatusCode::UNAUTHORIZED, page).into_response())
    }
}
