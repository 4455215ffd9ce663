//! Output header resolution.
//!
//! Traditional mode picks raw column names (`first`, `all`, `custom`);
//! data-point mode outputs catalog labels and resolves, per file, which
//! header carries each selected field.

use crate::datapoint::{DataPointMapping, find_data_point, suggest_mapping};
use crate::error::{Error, Result};
use crate::options::{ConsolidationOptions, DataPointSelection, HeaderHandling};
use crate::table::{Table, TableId};
use crate::warning::Warning;
use std::collections::{BTreeSet, HashMap};

/// The output column set and, in data-point mode, the per-file mappings.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHeaders {
    /// Final output headers, in order.
    pub headers: Vec<String>,
    /// Present in data-point mode only.
    pub data_points: Option<DataPointPlan>,
    /// Unknown or unmapped fields.
    pub warnings: Vec<Warning>,
}

/// Data-point fields and the mapping applied to each file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPointPlan {
    /// Selected catalog keys, parallel to the output headers.
    pub fields: Vec<String>,
    /// Mapping per table, supplied or suggested.
    pub mappings: HashMap<TableId, DataPointMapping>,
}

impl ResolvedHeaders {
    /// For each output column, the index of the source column in `table`.
    pub fn column_plan(&self, table: &Table) -> Vec<Option<usize>> {
        match &self.data_points {
            None => self
                .headers
                .iter()
                .map(|header| table.column_index(header))
                .collect(),
            Some(plan) => {
                let mapping = plan.mappings.get(&table.id());
                plan.fields
                    .iter()
                    .map(|field| {
                        mapping
                            .and_then(|m| m.get(field))
                            .and_then(|header| table.column_index(header))
                    })
                    .collect()
            }
        }
    }
}

/// Compute the output headers for `files`.
///
/// # Errors
///
/// Returns [`Error::NoFiles`] when `files` is empty.
pub fn resolve_headers(files: &[Table], options: &ConsolidationOptions) -> Result<ResolvedHeaders> {
    let first = files.first().ok_or(Error::NoFiles)?;

    if let Some(selection) = options.active_data_points() {
        return Ok(resolve_data_points(files, selection));
    }

    let headers = match options.header_handling {
        HeaderHandling::First => first.headers().to_vec(),
        HeaderHandling::All => files
            .iter()
            .flat_map(|table| table.headers())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        HeaderHandling::Custom if options.custom_headers.is_empty() => first.headers().to_vec(),
        HeaderHandling::Custom => options.custom_headers.clone(),
    };

    tracing::debug!(
        handling = ?options.header_handling,
        columns = headers.len(),
        "Resolved output headers"
    );

    Ok(ResolvedHeaders {
        headers,
        data_points: None,
        warnings: Vec::new(),
    })
}

fn resolve_data_points(files: &[Table], selection: &DataPointSelection) -> ResolvedHeaders {
    let fields = &selection.selected_fields;
    let mut warnings = Vec::new();

    let headers = fields
        .iter()
        .map(|field| match find_data_point(field) {
            Some(data_point) => data_point.label.to_string(),
            None => {
                tracing::warn!(field = %field, "Unknown data point; using key as header");
                warnings.push(Warning::UnknownDataPoint {
                    field: field.clone(),
                });
                field.clone()
            }
        })
        .collect();

    let mut mappings = HashMap::with_capacity(files.len());
    for table in files {
        let mapping = match selection.manual_mapping(table) {
            Some(mapping) => mapping.clone(),
            None => suggest_mapping(table.headers(), fields.as_slice()),
        };

        // Unknown keys are already reported once above
        for field in fields.iter().filter(|field| find_data_point(field).is_some()) {
            let resolved = mapping
                .get(field)
                .and_then(|header| table.column_index(header));
            if resolved.is_none() {
                tracing::warn!(file = table.name(), field = %field, "Data point not mapped");
                warnings.push(Warning::UnmappedField {
                    file: table.name().to_string(),
                    field: field.clone(),
                });
            }
        }

        mappings.insert(table.id(), mapping);
    }

    tracing::debug!(
        fields = fields.len(),
        files = files.len(),
        "Resolved data point mappings"
    );

    ResolvedHeaders {
        headers,
        data_points: Some(DataPointPlan {
            fields: fields.clone(),
            mappings,
        }),
        warnings,
    }
}
