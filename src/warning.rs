use serde::Serialize;
use std::fmt;

/// Non-fatal anomaly found while parsing or consolidating.
///
/// Warnings never abort an operation; the affected data is normalized or
/// skipped and the event is recorded here and logged through `tracing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// A row had a different number of cells than the header row and was
    /// padded or truncated.
    MalformedRow {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },
    /// Input ended inside a quoted field.
    UnterminatedQuote { file: String, line: usize },
    /// The requested sort column is not part of the output headers.
    UnresolvableColumn { column: String },
    /// A selected data point has no matching header in a file.
    UnmappedField { file: String, field: String },
    /// A selected data point key is not in the catalog.
    UnknownDataPoint { field: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MalformedRow {
                file,
                line,
                expected,
                found,
            } => write!(
                f,
                "{file}:{line}: expected {expected} fields, found {found}"
            ),
            Warning::UnterminatedQuote { file, line } => {
                write!(f, "{file}:{line}: unterminated quoted field")
            }
            Warning::UnresolvableColumn { column } => {
                write!(f, "sort column '{column}' not found in output headers")
            }
            Warning::UnmappedField { file, field } => {
                write!(f, "{file}: no column mapped to data point '{field}'")
            }
            Warning::UnknownDataPoint { field } => write!(f, "unknown data point '{field}'"),
        }
    }
}
