//! Fuzzy matching of file headers onto catalog data points.
//!
//! A header matches a data point when its normalized form is a substring of
//! one of the aliases, contains one of the aliases, or is within a normalized
//! Levenshtein similarity above [`SIMILARITY_THRESHOLD`]. This is a heuristic:
//! short headers such as `name` will match several name-like fields.

use super::DataPointMapping;
use super::catalog::{DataPoint, find_data_point};
use rapidfuzz::distance::levenshtein;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum similarity (exclusive) for an edit-distance match.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Characters replaced by `_` during normalization. ASCII-only: non-Latin
/// letters are replaced too.
static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]").expect("Invalid header pattern"));

/// Normalize a header for matching: lowercase, then every character outside
/// `[a-z0-9]` becomes `_`.
pub fn normalize_header(header: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&header.to_lowercase(), "_")
        .into_owned()
}

/// Normalized Levenshtein similarity: `1 - distance / max_len`, over chars.
///
/// Two empty strings are identical (similarity 1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein::distance(a.chars(), b.chars());
    1.0 - distance as f64 / max_len as f64
}

/// Check a normalized header against one data point's aliases.
fn matches_data_point(normalized: &str, data_point: &DataPoint) -> bool {
    data_point.aliases.iter().any(|alias| {
        alias.contains(normalized)
            || normalized.contains(alias)
            || similarity(normalized, alias) > SIMILARITY_THRESHOLD
    })
}

/// Suggest which header carries each field.
///
/// For every field, the first header (in file order) that matches wins.
/// Fields without a match, and keys missing from the catalog, map to an
/// empty header. Headers that normalize to nothing but `_` never match.
pub fn suggest_mapping<S: AsRef<str>>(headers: &[String], fields: &[S]) -> DataPointMapping {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    fields
        .iter()
        .map(|field| {
            let field = field.as_ref();
            let header = find_data_point(field)
                .and_then(|data_point| {
                    headers
                        .iter()
                        .zip(&normalized)
                        .find(|(_, norm)| {
                            norm.chars().any(|c| c != '_') && matches_data_point(norm, data_point)
                        })
                        .map(|(header, _)| header.as_str())
                })
                .unwrap_or_default();
            (field, header)
        })
        .collect()
}
