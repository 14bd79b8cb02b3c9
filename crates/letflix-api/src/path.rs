//! Percent-encoding of request path segments.
//!
//! Segments are encoded like JavaScript's `encodeURIComponent`: every byte
//! outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )` becomes `%XX` of its UTF-8 form.
//! The result is joined onto the base URL as-is, and `url` leaves existing
//! `%XX` sequences alone, so each reserved character is encoded exactly once.

use anyhow::{Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a single path segment.
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// Builds a relative request path from raw segments.
///
/// # Errors
///
/// Returns an error if a segment is empty, `.` or `..`. Those would either
/// address a different endpoint or be collapsed by URL normalization.
pub fn build_path(segments: &[&str]) -> Result<String> {
    let mut encoded = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.is_empty() {
            bail!("empty path segment in {segments:?}");
        }
        if *segment == "." || *segment == ".." {
            bail!("dot path segment {segment:?} cannot be addressed");
        }
        encoded.push(encode_segment(segment));
    }
    Ok(encoded.join("/"))
}
