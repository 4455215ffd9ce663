//! Standard data points and fuzzy mapping of file headers onto them.
//!
//! A data point is a canonical field such as `email` that different files
//! spell differently (`E-mail`, `email_address`, `Mail`). The catalog lists
//! the known fields with their common header aliases; the matcher suggests,
//! per file, which header carries each field.

pub mod catalog;
pub mod matching;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use catalog::{DataPoint, data_points, find_data_point};
pub use matching::{normalize_header, similarity, suggest_mapping};

/// Per-file mapping from data point key to the header that carries it.
///
/// An empty header name means the field is unmapped for that file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPointMapping(BTreeMap<String, String>);

impl DataPointMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `field` to `header`. An empty header unmaps the field.
    pub fn insert(&mut self, field: impl Into<String>, header: impl Into<String>) -> &mut Self {
        self.0.insert(field.into(), header.into());
        self
    }

    /// The header mapped to `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(String::as_str)
            .filter(|header| !header.is_empty())
    }

    /// Iterate over `(field, header)` pairs, including unmapped fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields with a non-empty header.
    pub fn mapped_count(&self) -> usize {
        self.0.values().filter(|header| !header.is_empty()).count()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataPointMapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
