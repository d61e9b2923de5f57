//! Filesystem-safe identifiers derived from short issue renderings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any maximal run of characters outside `[0-9a-zA-Z]`.
    static ref NON_ALPHANUM: Regex = Regex::new(r"[^0-9a-zA-Z]+").unwrap();
}

/// Collapse every run of non-alphanumeric characters into a single `_`.
///
/// Idempotent: the output only contains `[0-9a-zA-Z_]` and no `__`.
pub fn sanitize_id(short: &str) -> String {
    NON_ALPHANUM.replace_all(short, "_").into_owned()
}
