use axum::{
    body::Bytes,
    extract::State,
    http::{
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
        header::{self, HeaderName},
    },
    response::{IntoResponse, Response},
};

use crate::{config::AppConfig, error::AppError};

/// Hop-by-hop, origin and credential headers that are not forwarded
/// upstream. The session cookie must never reach the proxy target.
const SKIPPED_REQUEST_HEADERS: [HeaderName; 7] = [
    header::HOST,
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::COOKIE,
    header::AUTHORIZATION,
];

/// Upstream response headers passed back to the client besides the body.
const RELAYED_RESPONSE_HEADERS: [HeaderName; 3] =
    [header::CONTENT_TYPE, header::LOCATION, header::SET_COOKIE];

/// build_client
///
/// Outbound client for the passthroughs. Redirects are not followed so that
/// a 3xx from the upstream reaches the browser with its `Location`.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// upstream_url
///
/// Maps a request under `/api` onto the proxy target: the prefix is dropped,
/// the query string is kept.
pub fn upstream_url(target: &str, uri: &Uri) -> String {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path());
    let path = if path.is_empty() { "/" } else { path };
    match uri.query() {
        Some(query) => format!("{}{}?{}", target, path, query),
        None => format!("{}{}", target, path),
    }
}

/// forward_api
///
/// [Public Route] Passes any `/api/...` request through to the configured
/// upstream and relays its status, body, content type, `Location` and
/// `Set-Cookie`. The upstream sees its own host in the Host header.
pub async fn forward_api(
    State(config): State<AppConfig>,
    State(http): State<reqwest::Client>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let url = upstream_url(&config.proxy_target, &uri);

    let mut forwarded = HeaderMap::new();
    for (name, value) in headers.iter() {
        if !SKIPPED_REQUEST_HEADERS.contains(name) {
            forwarded.append(name.clone(), value.clone());
        }
    }

    tracing::debug!(%method, url = %url, "proxying request");

    let upstream = http
        .request(method, &url)
        .headers(forwarded)
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("{}: {}", url, e)))?;

    relay(upstream).await
}

async fn relay(upstream: reqwest::Response) -> Result<Response, AppError> {
    let status = upstream.status();
    let mut relayed = HeaderMap::new();
    for name in RELAYED_RESPONSE_HEADERS {
        for value in upstream.headers().get_all(&name) {
            relayed.append(name.clone(), value.clone());
        }
    }
    let body = upstream
        .bytes()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let mut response = (status, body).into_response();
    // Replaces the octet-stream default set for a bytes body.
    for name in relayed.keys() {
        response.headers_mut().remove(name);
    }
    response.headers_mut().extend(relayed);
    Ok(response)
}

/// proxy_font
///
/// [Public Route] Fetches the configured web font and serves it as
/// `font/woff2`. Any non-200 upstream status is relayed with a short message.
pub async fn proxy_font(
    State(config): State<AppConfig>,
    State(http): State<reqwest::Client>,
) -> Result<Response, AppError> {
    let upstream = http
        .get(&config.font_url)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("font fetch failed: {}", e)))?;

    let status = upstream.status();
    if status != StatusCode::OK {
        tracing::warn!(%status, "font upstream refused");
        return Ok((status, "Error fetching font").into_response());
    }

    let body = upstream
        .bytes()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static("font/woff2"))],
        body,
    )
        .into_response())
}
