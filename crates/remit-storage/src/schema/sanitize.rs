//! Display field name → storage identifier.

/// Substituted when a name sanitizes to nothing.
pub const EMPTY_NAME_PLACEHOLDER: &str = "_column";

/// Bookkeeping columns on the transaction table. Data fields may never map
/// onto these.
pub const INTERNAL_COLUMNS: [&str; 4] = ["id", "transaction_uid", "processed_file_id", "imported_at"];

/// Map an arbitrary display name to `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Every char outside `[A-Za-z0-9_]` becomes `_`; a leading digit gets a `_`
/// prefix; an empty result becomes [`EMPTY_NAME_PLACEHOLDER`]. Total and
/// deterministic. Distinct names can collide (`"A B"` and `"A-B"`); the
/// ingest path decides what to do about that.
pub fn sanitize_column_name(name: &str) -> String {
    let mut safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if safe.starts_with(|c: char| c.is_ascii_digit()) {
        safe.insert(0, '_');
    }

    if safe.is_empty() {
        safe.push_str(EMPTY_NAME_PLACEHOLDER);
    }

    safe
}

/// True if `column` is one of the transaction table's bookkeeping columns.
/// SQLite identifiers are case-insensitive, so `"ID"` counts.
pub fn is_internal_column(column: &str) -> bool {
    INTERNAL_COLUMNS.iter().any(|c| c.eq_ignore_ascii_case(column))
}

/// Lookup key for a sanitized column. Names differing only in ASCII case
/// address the same SQLite column.
pub fn column_key(column: &str) -> String {
    column.to_ascii_lowercase()
}

/// Double-quote an already sanitized identifier for SQL text.
pub(crate) fn quote_ident(column: &str) -> String {
    format!("\"{column}\"")
}
