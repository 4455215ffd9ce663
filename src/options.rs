use crate::datapoint::DataPointMapping;
use crate::error::Result;
use crate::table::{Table, TableId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How the aligned row sets of all files are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Concatenate all rows in file order.
    #[default]
    Merge,
    /// Concatenate, dropping rows already seen in any file.
    Union,
    /// Keep only rows present in every file.
    Intersect,
}

/// How the output column set is chosen outside data-point mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderHandling {
    /// Headers of the first file, verbatim.
    #[default]
    First,
    /// Sorted union of every file's headers.
    All,
    /// Caller-supplied headers; falls back to the first file's when empty.
    Custom,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Returns true for descending order.
    pub fn is_desc(&self) -> bool {
        matches!(self, SortOrder::Desc)
    }
}

/// Data-point selection: consolidate standard fields instead of raw columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataPointSelection {
    /// Whether data-point mode is active.
    pub enabled: bool,
    /// Catalog keys to output, in output order.
    pub selected_fields: Vec<String>,
    /// Manual mappings keyed by table id.
    pub mappings: HashMap<TableId, DataPointMapping>,
    /// Manual mappings keyed by file name, for configurations written before
    /// the tables are loaded. An entry in `mappings` takes precedence; files
    /// with neither get a suggested mapping.
    pub file_mappings: HashMap<String, DataPointMapping>,
}

impl DataPointSelection {
    /// Select the given catalog keys with automatic mapping.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            selected_fields: fields.into_iter().map(Into::into).collect(),
            mappings: HashMap::new(),
            file_mappings: HashMap::new(),
        }
    }

    /// Supply a manual mapping for one table.
    pub fn mapping(&mut self, table: TableId, mapping: DataPointMapping) -> &mut Self {
        self.mappings.insert(table, mapping);
        self
    }

    /// Supply a manual mapping for the file with the given name.
    pub fn file_mapping(
        &mut self,
        name: impl Into<String>,
        mapping: DataPointMapping,
    ) -> &mut Self {
        self.file_mappings.insert(name.into(), mapping);
        self
    }

    /// The manual mapping for `table`, by id first, then by file name.
    pub fn manual_mapping(&self, table: &Table) -> Option<&DataPointMapping> {
        self.mappings
            .get(&table.id())
            .or_else(|| self.file_mappings.get(table.name()))
    }

    /// Data-point mode applies only when enabled with at least one field.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.selected_fields.is_empty()
    }
}

/// Options for a consolidation run.
///
/// # Example
///
/// ```
/// use csv_consolidate::{ConsolidationOptions, HeaderHandling, Method};
///
/// let mut options = ConsolidationOptions::new();
/// options
///     .method(Method::Union)
///     .header_handling(HeaderHandling::All)
///     .filter_empty(true);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsolidationOptions {
    pub(crate) method: Method,
    pub(crate) remove_duplicates: bool,
    pub(crate) header_handling: HeaderHandling,
    pub(crate) custom_headers: Vec<String>,
    pub(crate) sort_by: Option<String>,
    pub(crate) sort_order: SortOrder,
    pub(crate) filter_empty: bool,
    pub(crate) data_point_selection: Option<DataPointSelection>,
}

impl ConsolidationOptions {
    /// Create options with the defaults: merge, first-file headers, no
    /// post-processing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from JSON (camelCase keys, missing keys take defaults).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the consolidation method.
    pub fn method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    /// Remove duplicate rows after combining.
    pub fn remove_duplicates(&mut self, remove: bool) -> &mut Self {
        self.remove_duplicates = remove;
        self
    }

    /// Set the header handling strategy.
    pub fn header_handling(&mut self, handling: HeaderHandling) -> &mut Self {
        self.header_handling = handling;
        self
    }

    /// Use the given headers (implies [`HeaderHandling::Custom`]).
    pub fn custom_headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_handling = HeaderHandling::Custom;
        self.custom_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sort the output by a column.
    pub fn sort_by(&mut self, column: impl Into<String>, order: SortOrder) -> &mut Self {
        self.sort_by = Some(column.into());
        self.sort_order = order;
        self
    }

    /// Drop rows whose cells are all blank.
    pub fn filter_empty(&mut self, filter: bool) -> &mut Self {
        self.filter_empty = filter;
        self
    }

    /// Consolidate standard data points instead of raw columns.
    pub fn data_points(&mut self, selection: DataPointSelection) -> &mut Self {
        self.data_point_selection = Some(selection);
        self
    }

    /// Mutable access to the data-point selection, creating an inactive one
    /// if absent.
    pub fn data_point_selection_mut(&mut self) -> &mut DataPointSelection {
        self.data_point_selection.get_or_insert_with(Default::default)
    }

    /// The active data-point selection, if data-point mode applies.
    pub fn active_data_points(&self) -> Option<&DataPointSelection> {
        self.data_point_selection
            .as_ref()
            .filter(|selection| selection.is_active())
    }
}

/// Error for parsing option enums from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError(String);

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option value '{}'", self.0)
    }
}

impl std::error::Error for ParseOptionError {}

impl FromStr for Method {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Method::Merge),
            "union" => Ok(Method::Union),
            "intersect" => Ok(Method::Intersect),
            _ => Err(ParseOptionError(s.to_string())),
        }
    }
}

impl FromStr for HeaderHandling {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(HeaderHandling::First),
            "all" => Ok(HeaderHandling::All),
            "custom" => Ok(HeaderHandling::Custom),
            _ => Err(ParseOptionError(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Merge => write!(f, "merge"),
            Method::Union => write!(f, "union"),
            Method::Intersect => write!(f, "intersect"),
        }
    }
}
