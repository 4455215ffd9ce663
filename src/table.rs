use crate::warning::Warning;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier assigned to a [`Table`] when it is created.
///
/// Used to key per-file data-point mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(Uuid);

impl TableId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed CSV file: one header row plus rectangular data rows.
///
/// Every row holds exactly `headers().len()` cells. Row count and byte size
/// are computed once at construction.
#[derive(Debug, Clone)]
pub struct Table {
    id: TableId,
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    row_count: usize,
    byte_size: usize,
    warnings: Vec<Warning>,
}

impl Table {
    /// Build a table from headers and rows, normalizing every row to the
    /// header width.
    ///
    /// Short rows are padded with empty cells, long rows truncated. Each
    /// adjustment is recorded as a [`Warning::MalformedRow`] with a 1-based
    /// line number (the header is line 1).
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let lines = (2..rows.len() + 2).collect::<Vec<_>>();
        Self::from_records(name.into(), headers, rows, &lines, 0, Vec::new())
    }

    /// Build a table from parser output. `lines` holds the source line of each
    /// row; `byte_size` is the size of the original text.
    pub(crate) fn from_records(
        name: String,
        headers: Vec<String>,
        mut rows: Vec<Vec<String>>,
        lines: &[usize],
        byte_size: usize,
        mut warnings: Vec<Warning>,
    ) -> Self {
        let width = headers.len();

        for (row, &line) in rows.iter_mut().zip(lines) {
            if row.len() == width {
                continue;
            }

            tracing::warn!(
                file = %name,
                line,
                expected = width,
                found = row.len(),
                "Row width differs from header width; normalizing"
            );
            warnings.push(Warning::MalformedRow {
                file: name.clone(),
                line,
                expected: width,
                found: row.len(),
            });
            row.resize(width, String::new());
        }

        let byte_size = if byte_size == 0 {
            estimate_byte_size(&headers, &rows)
        } else {
            byte_size
        };

        Self {
            id: TableId::new(),
            name,
            row_count: rows.len(),
            headers,
            rows,
            byte_size,
            warnings,
        }
    }

    /// Unique identifier of this table.
    #[inline]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Original file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names, in file order.
    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows, each exactly as wide as the header row.
    #[inline]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Size in bytes of the source text.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Non-fatal anomalies found while building the table.
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Index of the first column named `column`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }
}

/// Approximate serialized size for tables not built from text.
fn estimate_byte_size(headers: &[String], rows: &[Vec<String>]) -> usize {
    std::iter::once(headers)
        .chain(rows.iter().map(Vec::as_slice))
        .map(|cells| cells.iter().map(String::len).sum::<usize>() + cells.len())
        .sum()
}
