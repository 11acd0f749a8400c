//! `fields` query parameter normalization.

/// Normalize a comma-separated field selection.
///
/// Entries are trimmed and empty entries dropped. Returns `None` when nothing
/// is left, in which case the caller omits the `fields` parameter entirely and
/// the backend falls back to its own default field set.
#[must_use]
pub fn parse_fields(fields: Option<&str>) -> Option<String> {
    let cleaned = fields?
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
