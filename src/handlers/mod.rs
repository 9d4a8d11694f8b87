//! Request handlers, grouped by the content they manage.
//!
//! Every handler follows the same shape: extract, validate, call the
//! repository, then redirect (303) or render a template.

use axum::response::Redirect;
use uuid::Uuid;

use crate::error::AppError;

pub mod admin;
pub mod blogs;
pub mod careers;
pub mod developers;
pub mod leads;
pub mod pages;
pub mod properties;
pub mod search;
pub mod session;
pub mod testimonials;

/// Parses a path id. Unknown and malformed ids are indistinguishable to the
/// client: both are a 404 with `message`.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(message))
}

/// 303 See Other to `path`.
pub(crate) fn see_other(path: &str) -> Redirect {
    Redirect::to(path)
}
