//! Row consolidation: alignment, set operations and post-processing.
//!
//! Every file is first projected onto the resolved output headers so that
//! heterogeneous files become comparable. The aligned row sets are then
//! combined by [`Method`] and post-processed in a fixed order: duplicate
//! removal, empty-row filtering, sorting.

use crate::error::Result;
use crate::options::{ConsolidationOptions, Method, SortOrder};
use crate::resolver::resolve_headers;
use crate::result::{ConsolidationResult, Stats};
use crate::table::Table;
use crate::warning::Warning;
use foldhash::{HashMap, HashMapExt, HashSet, HashSetExt};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;
use std::time::Instant;

type Row = Vec<String>;

/// Separator for row keys. A control character keeps `a|b,c` and `a,b|c`
/// distinct.
const KEY_SEPARATOR: &str = "\u{1f}";

/// Cells that compare numerically when sorting.
static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][-+]?\d+)?$").expect("Invalid number pattern")
});

/// Consolidate `files` into a single table.
///
/// # Errors
///
/// Returns [`Error::NoFiles`](crate::Error::NoFiles) when `files` is empty.
/// Nothing else fails: missing columns and unmapped fields become empty
/// cells, and an unknown sort column skips sorting with a warning.
///
/// # Example
///
/// ```
/// use csv_consolidate::{ConsolidationOptions, HeaderHandling, Method, consolidate, parse};
///
/// let a = parse("name,email\nAlice,a@x.com\nBob,b@x.com", "FileA.csv").unwrap();
/// let b = parse("name,email\nAlice,a@x.com\nCarol,c@x.com", "FileB.csv").unwrap();
///
/// let mut options = ConsolidationOptions::new();
/// options.method(Method::Union).header_handling(HeaderHandling::All);
///
/// let result = consolidate(&[a, b], &options).unwrap();
/// assert_eq!(result.headers, vec!["email", "name"]);
/// assert_eq!(result.rows.len(), 3);
/// assert_eq!(result.stats.duplicates_removed, 1);
/// ```
pub fn consolidate(files: &[Table], options: &ConsolidationOptions) -> Result<ConsolidationResult> {
    let start = Instant::now();
    let resolved = resolve_headers(files, options)?;
    let mut warnings = resolved.warnings.clone();
    let mut stats = Stats::default();

    let aligned: Vec<Vec<Row>> = files
        .iter()
        .map(|table| align_rows(table, &resolved.column_plan(table)))
        .collect();

    let mut rows: Vec<Row> = match options.method {
        Method::Merge => aligned.into_iter().flatten().collect(),
        Method::Union => {
            let (rows, removed) = dedup_rows(aligned.into_iter().flatten());
            stats.duplicates_removed = removed;
            rows
        }
        Method::Intersect => intersect_rows(aligned),
    };

    tracing::debug!(
        method = %options.method,
        files = files.len(),
        rows = rows.len(),
        "Combined aligned rows"
    );

    // Union already removed duplicates; don't count them twice
    if options.remove_duplicates && options.method != Method::Union {
        let (deduped, removed) = dedup_rows(rows);
        rows = deduped;
        stats.duplicates_removed += removed;
    }

    if options.filter_empty {
        let before = rows.len();
        rows.retain(|row| !is_empty_row(row));
        stats.empty_rows_removed = before - rows.len();
    }

    if let Some(column) = &options.sort_by {
        match resolved.headers.iter().position(|h| h == column) {
            Some(index) => sort_rows(&mut rows, index, options.sort_order),
            None => {
                tracing::warn!(column = %column, "Sort column not in output headers; skipping sort");
                warnings.push(Warning::UnresolvableColumn {
                    column: column.clone(),
                });
            }
        }
    }

    stats.total_rows = rows.len();
    stats.columns_aligned = resolved.headers.len();

    let mappings = match resolved.data_points {
        Some(plan) => {
            stats.data_points_consolidated = plan.fields.len();
            plan.mappings
        }
        None => Default::default(),
    };

    stats.processing_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    tracing::info!(
        rows = stats.total_rows,
        columns = stats.columns_aligned,
        duplicates_removed = stats.duplicates_removed,
        empty_rows_removed = stats.empty_rows_removed,
        "Consolidation complete"
    );

    Ok(ConsolidationResult {
        headers: resolved.headers,
        rows,
        stats,
        mappings,
        warnings,
    })
}

/// Project a table's rows onto the output columns. Unmapped columns become
/// empty cells.
fn align_rows(table: &Table, plan: &[Option<usize>]) -> Vec<Row> {
    table
        .rows()
        .iter()
        .map(|row| {
            plan.iter()
                .map(|source| source.map_or_else(String::new, |i| row[i].clone()))
                .collect()
        })
        .collect()
}

/// The equality key of a row.
fn row_key(row: &[String]) -> String {
    row.join(KEY_SEPARATOR)
}

/// Keep the first occurrence of every row, returning the number dropped.
fn dedup_rows<I: IntoIterator<Item = Row>>(rows: I) -> (Vec<Row>, usize) {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut removed = 0;

    for row in rows {
        if seen.insert(row_key(&row)) {
            kept.push(row);
        } else {
            removed += 1;
        }
    }

    (kept, removed)
}

/// Rows of the first file whose key occurs in every file.
///
/// Presence is counted once per file, so a row repeated within one file
/// does not stand in for another file.
fn intersect_rows(files: Vec<Vec<Row>>) -> Vec<Row> {
    let file_count = files.len();
    let mut presence: HashMap<String, usize> = HashMap::new();

    for rows in &files {
        let distinct: HashSet<String> = rows.iter().map(|row| row_key(row)).collect();
        for key in distinct {
            *presence.entry(key).or_insert(0) += 1;
        }
    }

    files
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .filter(|row| presence.get(&row_key(row)) == Some(&file_count))
        .collect()
}

/// A row is empty when every cell is blank after trimming.
fn is_empty_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Sort class of a cell. Classes order as declared: blank cells first,
/// then numbers, then any other text.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SortKey {
    Blank,
    Number(f64),
    Text,
}

impl SortKey {
    fn of(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() {
            return SortKey::Blank;
        }
        NUMBER_PATTERN
            .is_match(cell)
            .then(|| cell.parse().ok())
            .flatten()
            .map_or(SortKey::Text, SortKey::Number)
    }

    fn rank(self) -> u8 {
        match self {
            SortKey::Blank => 0,
            SortKey::Number(_) => 1,
            SortKey::Text => 2,
        }
    }
}

/// Order two cells: numerically when both are numbers, lexicographically
/// within the blank and text classes, and by class otherwise.
fn compare_cells(a: (&str, SortKey), b: (&str, SortKey)) -> Ordering {
    match (a.1, b.1) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(&y),
        (ka, kb) if ka.rank() == kb.rank() => a.0.cmp(b.0),
        (ka, kb) => ka.rank().cmp(&kb.rank()),
    }
}

/// Stable sort by one column.
fn sort_rows(rows: &mut Vec<Row>, column: usize, order: SortOrder) {
    let mut keyed: Vec<(SortKey, Row)> = std::mem::take(rows)
        .into_iter()
        .map(|row| (SortKey::of(&row[column]), row))
        .collect();

    keyed.sort_by(|(na, a), (nb, b)| {
        let ordering = compare_cells((a[column].as_str(), *na), (b[column].as_str(), *nb));
        if order.is_desc() {
            ordering.reverse()
        } else {
            ordering
        }
    });

    *rows = keyed.into_iter().map(|(_, row)| row).collect();
}
