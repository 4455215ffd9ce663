//! csv-consolidate: merge heterogeneous CSV files into one table
//!
//! The pipeline runs in four stages, each a pure function of its inputs:
//!
//! 1. [`parse`] turns CSV text into a [`Table`] (quote-aware, lenient about
//!    ragged rows).
//! 2. [`resolve_headers`] picks the output columns, either from raw header
//!    names or from standard [data points](datapoint) matched fuzzily
//!    against each file's headers.
//! 3. [`consolidate`] aligns every file to those columns and combines the
//!    rows by merge, union or intersect, then dedups, filters and sorts.
//! 4. [`serialize`] writes the result back to CSV text.
//!
//! # Quick Start
//!
//! ```
//! use csv_consolidate::{ConsolidationOptions, HeaderHandling, Method, consolidate, parse, serialize};
//!
//! let a = parse("name,email\nAlice,a@x.com", "a.csv").unwrap();
//! let b = parse("email,phone\nb@x.com,555", "b.csv").unwrap();
//!
//! let mut options = ConsolidationOptions::new();
//! options.method(Method::Merge).header_handling(HeaderHandling::All);
//!
//! let result = consolidate(&[a, b], &options).unwrap();
//! let csv = serialize(&result.headers, &result.rows).unwrap();
//! assert_eq!(csv, "email,name,phone\na@x.com,Alice,\nb@x.com,,555");
//! ```
//!
//! # Data points
//!
//! ```
//! use csv_consolidate::{ConsolidationOptions, DataPointSelection, consolidate, parse};
//!
//! let a = parse("E-mail,Full Name\na@x.com,Alice", "a.csv").unwrap();
//! let b = parse("email_address,name\nb@x.com,Bob", "b.csv").unwrap();
//!
//! let mut options = ConsolidationOptions::new();
//! options.data_points(DataPointSelection::new(["full_name", "email"]));
//!
//! let result = consolidate(&[a, b], &options).unwrap();
//! assert_eq!(result.headers, vec!["Full Name", "Email"]);
//! assert_eq!(result.rows[1], vec!["Bob", "b@x.com"]);
//! ```
//!
//! Nothing is shared between calls, so independent consolidations may run
//! concurrently on separate threads.

mod consolidator;
pub mod datapoint;
mod encoding;
mod error;
pub mod ingest;
mod options;
mod parser;
mod resolver;
mod result;
mod serializer;
mod table;
mod warning;

pub use consolidator::consolidate;
pub use datapoint::{DataPoint, DataPointMapping, data_points, find_data_point, suggest_mapping};
pub use error::{Error, Result};
pub use options::{
    ConsolidationOptions, DataPointSelection, HeaderHandling, Method, ParseOptionError, SortOrder,
};
pub use parser::{parse, parse_bytes};
pub use resolver::{DataPointPlan, ResolvedHeaders, resolve_headers};
pub use result::{ConsolidationResult, Stats};
pub use serializer::{serialize, serialize_result, write_csv};
pub use table::{Table, TableId};
pub use warning::Warning;

// Re-export for advanced usage
pub use encoding::{DecodedText, decode, is_utf8};
