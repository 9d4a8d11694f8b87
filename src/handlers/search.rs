use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::{
    models::{ErrorResponse, Property},
    repository::RepositoryState,
};

static NON_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?(</script\s*>|$)|<style\b[^>]*>.*?(</style\s*>|$)").unwrap()
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>?").unwrap());

/// sanitize_query
///
/// Strips HTML from free-text search input and trims it. `<script>` and
/// `<style>` elements go together with their contents; other tags are
/// removed and their text kept.
pub fn sanitize_query(input: &str) -> String {
    let without_code = NON_TEXT.replace_all(input, "");
    TAG.replace_all(&without_code, "").trim().to_string()
}

/// SearchQuery
///
/// Query parameters of GET /search.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free text matched against listing name and description.
    pub q: Option<String>,
}

/// search_properties
///
/// [Public Route] JSON search over listings. A missing or (after sanitising)
/// empty query returns every listing.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching listings", body = [Property]),
        (status = 500, description = "Repository failure", body = ErrorResponse)
    )
)]
pub async fn search_properties(
    State(repo): State<RepositoryState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.q.as_deref().map(sanitize_query).unwrap_or_default();

    match repo.search_properties(&query).await {
        Ok(properties) => {
            tracing::debug!(query = %query, hits = properties.len(), "search");
            Json(properties).into_response()
        }
        Err(e) => {
            tracing::error!("Error fetching search results: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal Server Error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_query;

    #[test]
    fn strips_tags_and_trims() {
        assert_eq!(sanitize_query("  <b>Sky</b> villa "), "Sky villa");
    }

    #[test]
    fn drops_script_and_style_contents() {
        assert_eq!(sanitize_query("<script>alert(1)</script>"), "");
        assert_eq!(sanitize_query("sea <SCRIPT type=\"x\">a()</SCRIPT >view"), "sea view");
        assert_eq!(sanitize_query("<style>p{color:red}</style>loft"), "loft");
        assert_eq!(sanitize_query("villa<script>never closed"), "villa");
    }

    #[test]
    fn leaves_plain_text() {
        assert_eq!(sanitize_query("2 BHK & more"), "2 BHK & more");
    }
}
