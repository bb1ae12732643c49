//! URL helpers used before any filesystem access.
//!
//! # Responsibilities
//! - Strip query string and fragment from the raw request target
//! - Percent-decode with `decodeURIComponent` strictness
//! - Join URL segments without doubling separators
//! - Normalize `.` and `..` lexically (no filesystem access)

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Error returned when a request path cannot be percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A `%` not followed by two hex digits.
    #[error("malformed percent escape at byte {0}")]
    MalformedEscape(usize),
    /// The decoded bytes are not UTF-8.
    #[error("decoded path is not valid UTF-8")]
    InvalidUtf8,
}

/// Strip the query string and fragment from a raw URL.
pub fn clean_url(url: &str) -> &str {
    match url.find(|c| c == '?' || c == '#') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Percent-decode a clean URL.
///
/// Unlike [`percent_decode_str`] on its own, a stray `%` or an escape
/// sequence that decodes to invalid UTF-8 is rejected instead of being
/// passed through.
pub fn decode_pathname(url: &str) -> Result<String, DecodeError> {
    let bytes = url.as_bytes();
    let mut pos = 0;
    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'%') {
        let at = pos + offset;
        let well_formed = bytes
            .get(at + 1..at + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(DecodeError::MalformedEscape(at));
        }
        pos = at + 3;
    }

    percent_decode_str(url)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Join two URL segments with exactly one `/` between them.
pub fn join_url_segments(a: &str, b: &str) -> String {
    if a.is_empty() || b.is_empty() {
        return format!("{a}{b}");
    }
    let a = a.strip_suffix('/').unwrap_or(a);
    if b.starts_with('/') {
        format!("{a}{b}")
    } else {
        format!("{a}/{b}")
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the filesystem root stays at the root, like `path.resolve`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
        }
    }
    out
}
