//! Response relay and header policy.
//!
//! # Responsibilities
//! - Copy the allowed upstream headers (Content-Disposition, Content-Type, Content-Length)
//! - Fall back to the locally guessed media type when upstream sends no Content-Type
//! - Force long-lived caching and open CORS on every relayed asset
//! - Stream the upstream body through without buffering it
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Content-Length is forwarded verbatim; the body is never transformed
//! - Upstream cache headers are ignored in favor of a fixed policy

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL,
            CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE,
        },
        HeaderMap, HeaderValue, StatusCode,
    },
    response::Response,
};
use futures_util::TryStreamExt;

/// Assets are immutable once published.
pub const CACHE_POLICY: &str = "max-age=31536000, public";
pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, OPTIONS";

/// Build the caller's response from an open 200 upstream response.
pub fn relay(upstream: reqwest::Response, fallback_media_type: &'static str) -> Response {
    let headers = relay_headers(upstream.headers(), fallback_media_type);

    let body = Body::from_stream(upstream.bytes_stream().inspect_err(|e| {
        tracing::warn!(error = %e, "Upstream body stream failed mid-transfer");
    }));

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    *response.headers_mut() = headers;
    response
}

/// Select and override headers for a relayed asset.
pub fn relay_headers(upstream: &HeaderMap, fallback_media_type: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(disposition) = upstream.get(CONTENT_DISPOSITION) {
        headers.insert(CONTENT_DISPOSITION, disposition.clone());
    }

    let content_type = upstream
        .get(CONTENT_TYPE)
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(fallback_media_type));
    headers.insert(CONTENT_TYPE, content_type);

    if let Some(length) = upstream.get(CONTENT_LENGTH) {
        headers.insert(CONTENT_LENGTH, length.clone());
    }

    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_POLICY));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));

    headers
}
