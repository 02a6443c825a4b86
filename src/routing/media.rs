//! Media type fallback from the asset's file name.
//!
//! The value computed here is only used when the upstream response has no
//! `Content-Type` of its own.

/// Media type used when the extension is missing or unknown.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Guess a media type from the last segment of a decoded asset path.
///
/// Anything after a `?` in the final segment is ignored, so absolute source
/// URLs with query strings resolve by their file name.
pub fn media_type_for(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let file_name = file_name.split('?').next().unwrap_or(file_name);

    file_name
        .rsplit_once('.')
        .and_then(|(_, ext)| mime_guess::from_ext(ext).first_raw())
        .unwrap_or(DEFAULT_MEDIA_TYPE)
}
