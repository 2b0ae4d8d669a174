//! Composite identifiers
//!
//! Objects that have no server-side id of their own (memberships,
//! associations) are identified by joining the ids they connect with `:`,
//! e.g. `"<group>:<user>"` or `"<group>:<object type>:<object>"`.

use crate::error::{ClientError, ClientResult};

/// Separator between the parts of a composite id.
pub const ID_SEPARATOR: char = ':';

/// Join id parts into a composite id.
#[must_use]
pub fn compose_id(parts: &[&str]) -> String {
    parts.join(":")
}

/// Split a composite id into exactly `expected` non-empty parts.
pub fn split_id(id: &str, expected: usize) -> ClientResult<Vec<String>> {
    let parts: Vec<String> = id.split(ID_SEPARATOR).map(str::to_string).collect();

    if parts.len() != expected || parts.iter().any(String::is_empty) {
        return Err(ClientError::InvalidId {
            id: id.to_string(),
            expected,
        });
    }

    Ok(parts)
}

/// Check that an id can be placed in a URL path as a single segment.
///
/// Rejects empty ids, dot segments, separators (`/`, `\\`), `?`, `#`, `%`
/// and whitespace.
pub fn path_segment(id: &str) -> ClientResult<&str> {
    let unsafe_char = |c: char| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    };

    if id.is_empty() || id == "." || id == ".." || id.chars().any(unsafe_char) {
        return Err(ClientError::InvalidPathSegment(id.to_string()));
    }
    Ok(id)
}
