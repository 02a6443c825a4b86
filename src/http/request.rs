//! Request extraction and validation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for correlation
//! - Extract the asset path from the raw request URI and decode it
//! - Read the resize parameters (`type`, `w`, `h`) from the query string
//!
//! # Design Decisions
//! - The path is read from the raw URI, not a pre-decoded extractor, so it
//!   is decoded exactly once and malformed escapes are detectable
//! - Decoding follows query-unescape rules: `+` is a space, `%XX` must be hex
//! - Separators are trimmed before decoding only; a decoded value is never
//!   re-trimmed, though one made only of blanks and slashes counts as empty
//! - Query values take the first occurrence; empty values count as absent

use std::fmt;

use axum::http::{HeaderName, HeaderValue, Request, Uri};
use thiserror::Error;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::error::ProxyError;
use crate::routing::ResizeSpec;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Route prefix the asset path is relative to.
pub const ASSETS_PREFIX: &str = "/assets";

/// Generates `x-request-id` values as random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// A decoded, non-empty asset identifier relative to the asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPath(String);

impl AssetPath {
    /// Extract the path following `/assets` from `uri`.
    pub fn from_uri(uri: &Uri) -> Result<Self, ProxyError> {
        let raw = uri.path();
        let suffix = raw.strip_prefix(ASSETS_PREFIX).unwrap_or(raw);
        Self::parse(suffix)
    }

    /// Trim, validate and decode a raw wildcard suffix.
    pub fn parse(raw: &str) -> Result<Self, ProxyError> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(ProxyError::EmptyPath);
        }

        let decoded = query_unescape(trimmed).map_err(ProxyError::InvalidPath)?;
        // Blank-only paths are empty; anything else is kept exactly as decoded.
        if decoded
            .trim_matches(|c: char| c == '/' || c.is_whitespace())
            .is_empty()
        {
            return Err(ProxyError::EmptyPath);
        }

        Ok(Self(decoded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a path failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed escape sequence at byte {0}")]
    BadEscape(usize),

    #[error("decoded path is not valid UTF-8")]
    InvalidUtf8,
}

/// Percent-decode `input`, treating `+` as a space.
///
/// Unlike lenient decoders, a `%` not followed by two hex digits is an error.
pub fn query_unescape(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
                let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                    _ => return Err(DecodeError::BadEscape(i)),
                }
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| DecodeError::InvalidUtf8)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Read the resize request from a raw query string.
///
/// Returns `Some` only when `type=image`.
pub fn resize_spec(query: Option<&str>) -> Option<ResizeSpec> {
    let query = query?;
    let first = |key: &str| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    };

    if first("type").as_deref() != Some("image") {
        return None;
    }

    Some(ResizeSpec {
        width: first("w"),
        height: first("h"),
    })
}
