//! Loading CSV files from disk and writing exports.
//!
//! The consolidation core works on in-memory text only. This module applies
//! the file policies around it: accepted extensions, the per-file size limit,
//! the file-count limit, and the export file naming.

use crate::error::{Error, Result};
use crate::parser::parse_bytes;
use crate::result::ConsolidationResult;
use crate::serializer::write_csv;
use crate::table::Table;
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// MIME type for exported files.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

/// Default maximum number of files per consolidation.
pub const DEFAULT_MAX_FILES: usize = 3;

/// Default maximum size of a single file (50 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// File-count and size policy for ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestLimits {
    /// Maximum number of files accepted at once.
    pub max_files: usize,
    /// Maximum size of one file in bytes.
    pub max_file_bytes: u64,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Outcome of loading several files: the parsed tables plus per-file
/// failures.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Successfully parsed tables, in input order.
    pub tables: Vec<Table>,
    /// Files that could not be loaded, with the reason.
    pub failures: Vec<(PathBuf, Error)>,
}

impl LoadReport {
    /// The loaded tables, or [`Error::NoUsableFiles`] if every file failed.
    pub fn into_tables(self) -> Result<Vec<Table>> {
        if self.tables.is_empty() && !self.failures.is_empty() {
            return Err(Error::NoUsableFiles);
        }
        Ok(self.tables)
    }
}

/// Display name for a path: its file name, or the whole path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Load and parse one CSV file.
///
/// # Errors
///
/// - [`Error::NotCsv`] if the extension is not `.csv` or the content is
///   binary.
/// - [`Error::FileTooLarge`] if the file exceeds `limits.max_file_bytes`.
/// - [`Error::EmptyInput`] if the file has no non-blank line.
pub fn load_file<P: AsRef<Path>>(path: P, limits: &IngestLimits) -> Result<Table> {
    let path = path.as_ref();
    let name = display_name(path);

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(Error::NotCsv { name });
    }

    let size = fs::metadata(path)?.len();
    if size > limits.max_file_bytes {
        return Err(Error::FileTooLarge {
            name,
            size,
            limit: limits.max_file_bytes,
        });
    }

    let data = fs::read(path)?;

    // NUL bytes never occur in CSV text (UTF-16 is recognized by its BOM)
    let utf16 = data.starts_with(&[0xFF, 0xFE]) || data.starts_with(&[0xFE, 0xFF]);
    if !utf16 && bytecount::count(&data, 0) > 0 {
        return Err(Error::NotCsv { name });
    }

    let table = parse_bytes(&data, &name)?;
    tracing::info!(
        file = %name,
        rows = table.row_count(),
        columns = table.headers().len(),
        bytes = size,
        "Loaded file"
    );
    Ok(table)
}

/// Load several files, collecting per-file failures.
///
/// # Errors
///
/// Returns [`Error::TooManyFiles`] when more than `limits.max_files` paths
/// are given. Individual file failures are reported in the
/// [`LoadReport`] instead.
pub fn load_files<P: AsRef<Path>>(paths: &[P], limits: &IngestLimits) -> Result<LoadReport> {
    if paths.len() > limits.max_files {
        return Err(Error::TooManyFiles {
            count: paths.len(),
            limit: limits.max_files,
        });
    }

    let mut report = LoadReport::default();
    for path in paths {
        let path = path.as_ref();
        match load_file(path, limits) {
            Ok(table) => report.tables.push(table),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping file");
                report.failures.push((path.to_path_buf(), e));
            }
        }
    }

    Ok(report)
}

/// Export file name for the given date: `consolidated-data-<YYYY-MM-DD>.csv`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("consolidated-data-{}.csv", date.format("%Y-%m-%d"))
}

/// Write `result` into `dir` under today's export file name.
///
/// Returns the path of the written file.
pub fn export<P: AsRef<Path>>(dir: P, result: &ConsolidationResult) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::InvalidExport(dir.to_path_buf()));
    }

    let path = dir.join(export_file_name(chrono::Local::now().date_naive()));
    let writer = BufWriter::new(File::create(&path)?);
    write_csv(writer, &result.headers, &result.rows)?;

    tracing::info!(path = %path.display(), rows = result.rows.len(), "Exported consolidated data");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "people.CSV", b"name,email\nAlice,a@x.com\n");

        let table = load_file(&path, &IngestLimits::default()).unwrap();
        assert_eq!(table.name(), "people.CSV");
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_rejects_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "people.txt", b"a,b\n");
        let err = load_file(&path, &IngestLimits::default()).unwrap_err();
        assert!(matches!(err, Error::NotCsv { ref name } if name == "people.txt"));
    }

    #[test]
    fn test_rejects_binary_content() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "image.csv", &[0x89, b'P', b'N', b'G', 0, 0, 1]);
        let err = load_file(&path, &IngestLimits::default()).unwrap_err();
        assert!(matches!(err, Error::NotCsv { .. }));
    }

    #[test]
    fn test_rejects_large_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "big.csv", b"a,b\n1,2\n3,4\n");
        let limits = IngestLimits {
            max_files: 3,
            max_file_bytes: 4,
        };

        let err = load_file(&path, &limits).unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { size: 12, limit: 4, .. }));
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.csv", b"\n\n");
        let err = load_file(&path, &IngestLimits::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput { .. }));
    }

    #[test]
    fn test_load_files_collects_failures() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.csv", b"a\n1\n");
        let empty = write_file(&dir, "empty.csv", b"");

        let report = load_files(&[good, empty.clone()], &IngestLimits::default()).unwrap();
        assert_eq!(report.tables.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, empty);
        assert_eq!(report.into_tables().unwrap().len(), 1);
    }

    #[test]
    fn test_load_files_all_failed() {
        let dir = TempDir::new().unwrap();
        let empty = write_file(&dir, "empty.csv", b"");

        let report = load_files(&[empty], &IngestLimits::default()).unwrap();
        assert!(matches!(report.into_tables(), Err(Error::NoUsableFiles)));
    }

    #[test]
    fn test_too_many_files() {
        let paths = ["a.csv", "b.csv", "c.csv", "d.csv"];
        let err = load_files(&paths, &IngestLimits::default()).unwrap_err();
        assert!(matches!(err, Error::TooManyFiles { count: 4, limit: 3 }));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "consolidated-data-2024-03-09.csv");
    }

    #[test]
    fn test_export_writes_csv() {
        let dir = TempDir::new().unwrap();
        let result = ConsolidationResult {
            headers: vec!["a".to_string()],
            rows: vec![vec!["x,y".to_string()]],
            stats: Default::default(),
            mappings: Default::default(),
            warnings: Vec::new(),
        };

        let path = export(dir.path(), &result).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("consolidated-data-"));
        assert_eq!(fs::read_to_string(path).unwrap(), "a\n\"x,y\"\n");
    }

    #[test]
    fn test_export_requires_directory() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "not-a-dir.csv", b"a\n");
        let result = ConsolidationResult {
            headers: Vec::new(),
            rows: Vec::new(),
            stats: Default::default(),
            mappings: Default::default(),
            warnings: Vec::new(),
        };
        assert!(matches!(export(&file, &result), Err(Error::InvalidExport(_))));
    }
}
