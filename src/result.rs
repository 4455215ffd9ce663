use crate::datapoint::DataPointMapping;
use crate::table::TableId;
use crate::warning::Warning;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Counters describing a consolidation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Rows in the final output.
    pub total_rows: usize,
    /// Rows dropped as duplicates (by union or explicit removal).
    pub duplicates_removed: usize,
    /// Rows dropped because every cell was blank.
    pub empty_rows_removed: usize,
    /// Number of output columns.
    pub columns_aligned: usize,
    /// Wall-clock time spent consolidating.
    pub processing_time_ms: f64,
    /// Number of selected data points (0 outside data-point mode).
    pub data_points_consolidated: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total rows: {}", self.total_rows)?;
        writeln!(f, "Columns aligned: {}", self.columns_aligned)?;
        writeln!(f, "Duplicates removed: {}", self.duplicates_removed)?;
        writeln!(f, "Empty rows removed: {}", self.empty_rows_removed)?;
        if self.data_points_consolidated > 0 {
            writeln!(f, "Data points consolidated: {}", self.data_points_consolidated)?;
        }
        write!(f, "Processing time: {:.2} ms", self.processing_time_ms)
    }
}

/// The consolidated table with statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationResult {
    /// Final column names.
    pub headers: Vec<String>,
    /// Final rows, each as wide as `headers`.
    pub rows: Vec<Vec<String>>,
    /// Run statistics.
    pub stats: Stats,
    /// Data-point mappings applied per table; empty outside data-point mode.
    pub mappings: HashMap<TableId, DataPointMapping>,
    /// Non-fatal anomalies found during resolution and consolidation.
    pub warnings: Vec<Warning>,
}
