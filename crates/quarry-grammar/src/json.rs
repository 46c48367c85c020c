//! JSON column path handling.
//!
//! A JSON predicate column may carry a `->` path after the field name
//! (`options->languages->primary`). The field part goes through normal
//! identifier wrapping; the path renders as a dialect-specific selector.

/// Split a JSON column reference into the field name and its path segments.
pub(crate) fn split_column(column: &str) -> (&str, Vec<String>) {
    let mut parts = column.split("->");
    let field = parts.next().unwrap_or(column).trim();
    let path = parts.map(|p| p.trim().to_string()).collect();
    (field, path)
}

/// Render path segments as a MySQL/SQLite JSON path literal: `'$."a"."b"'`.
///
/// Single quotes in segments are doubled so the literal stays well-formed.
pub(crate) fn path_literal(path: &[String]) -> String {
    let segments: Vec<String> = path
        .iter()
        .map(|p| format!("\"{}\"", p.replace('\'', "''")))
        .collect();
    format!("'$.{}'", segments.join("."))
}
