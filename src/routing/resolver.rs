//! Upstream URL construction.
//!
//! # Responsibilities
//! - Decide whether a request goes to the asset store or through the resizer
//! - Accept caller-supplied absolute URLs as the source of truth
//! - Encode requested dimensions in the resizer's path convention
//!
//! # Design Decisions
//! - Built once at startup from validated config, immutable afterwards
//! - Never fails: every valid asset path yields some upstream URL
//! - Width/height are opaque strings and are not checked as numbers
//! - The resizer path is escaped as a whole before assignment, so `%` in the
//!   embedded source becomes `%25`

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::config::UpstreamConfig;

/// Bytes escaped in the resizer path: everything outside RFC 3986 unreserved
/// characters and the sub-delimiters legal in a path segment. `%` is escaped,
/// so an embedded source URL keeps its own escapes after the resizer decodes.
const RESIZER_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Requested output dimensions for the resizer.
///
/// Present only when the caller asked for `type=image`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResizeSpec {
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ResizeSpec {
    /// The `w:{w}/h:{h}` path component, or `None` when neither is set.
    pub fn dimension_component(&self) -> Option<String> {
        match (&self.width, &self.height) {
            (Some(w), Some(h)) => Some(format!("w:{w}/h:{h}")),
            (Some(w), None) => Some(format!("w:{w}")),
            (None, Some(h)) => Some(format!("h:{h}")),
            (None, None) => None,
        }
    }
}

/// Which upstream a request was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// `{assetHost}/assets/{path}`.
    Assets,
    /// Caller-supplied absolute URL, fetched verbatim.
    Direct,
    /// The image resizer, wrapping one of the above as its source.
    Resizer,
}

impl UpstreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamKind::Assets => "assets",
            UpstreamKind::Direct => "direct",
            UpstreamKind::Resizer => "resizer",
        }
    }
}

impl fmt::Display for UpstreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-qualified upstream URL plus how it was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub url: String,
    pub kind: UpstreamKind,
}

impl UpstreamTarget {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Translates decoded asset paths into upstream URLs.
#[derive(Debug, Clone)]
pub struct UpstreamResolver {
    assets_host: String,
    resizer: Url,
}

impl UpstreamResolver {
    /// Build a resolver from the configured hosts.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            assets_host: config.assets_api_host.trim_end_matches('/').to_string(),
            resizer: Url::parse(&config.resizer_api_host)?,
        })
    }

    /// Resolve the upstream URL for `path`.
    ///
    /// `resize` is `Some` when the caller asked for `type=image`.
    pub fn resolve(&self, path: &str, resize: Option<&ResizeSpec>) -> UpstreamTarget {
        let (source, kind) = if is_absolute_url(path) {
            (path.to_string(), UpstreamKind::Direct)
        } else {
            (
                format!("{}/assets/{}", self.assets_host, path),
                UpstreamKind::Assets,
            )
        };

        let Some(resize) = resize else {
            return UpstreamTarget { url: source, kind };
        };

        let resizer_path = match resize.dimension_component() {
            Some(dimensions) => format!("/insecure/{dimensions}/plain/{source}"),
            None => format!("/insecure/plain/{source}"),
        };

        let mut url = self.resizer.clone();
        url.set_path(&utf8_percent_encode(&resizer_path, RESIZER_PATH).to_string());

        UpstreamTarget {
            url: url.into(),
            kind: UpstreamKind::Resizer,
        }
    }
}

/// True when `candidate` parses as a URL with both a scheme and a host.
pub fn is_absolute_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}
