//! CSV serialization of consolidated tables.
//!
//! Output is comma-delimited with `\n` record terminators. Cells containing
//! a comma, double quote or line break are wrapped in double quotes with
//! inner quotes doubled, which is exactly what [`parse`](crate::parse) undoes.

use crate::error::{Error, Result};
use crate::result::ConsolidationResult;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::{self, Write};

/// Write headers and rows as CSV to `writer`, one `\n`-terminated line per
/// record.
pub fn write_csv<W: Write>(writer: W, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .double_quote(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(writer);

    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Serialize headers and rows to a CSV string.
///
/// Records are joined with `\n`; there is no trailing newline.
pub fn serialize(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, headers, rows)?;

    if buffer.last() == Some(&b'\n') {
        buffer.pop();
    }

    String::from_utf8(buffer).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Serialize a consolidation result.
pub fn serialize_result(result: &ConsolidationResult) -> Result<String> {
    serialize(&result.headers, &result.rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_serialize_simple() {
        let csv = serialize(&strings(&["a", "b"]), &[strings(&["1", "2"]), strings(&["3", "4"])]).unwrap();
        assert_eq!(csv, "a,b\n1,2\n3,4");
    }

    #[test]
    fn test_serialize_escapes() {
        let csv = serialize(&strings(&["v"]), &[strings(&["a,b\"c"]), strings(&["line\nbreak"])]).unwrap();
        assert_eq!(csv, "v\n\"a,b\"\"c\"\n\"line\nbreak\"");
    }

    #[test]
    fn test_quote_escaping_round_trips() {
        let headers = strings(&["text", "n"]);
        let rows = vec![strings(&["a,b\"c", "1"]), strings(&["", "x\ny"])];

        let table = parse(&serialize(&headers, &rows).unwrap(), "round.csv").unwrap();
        assert_eq!(table.headers(), headers.as_slice());
        assert_eq!(table.rows(), rows.as_slice());
    }

    #[test]
    fn test_header_only() {
        assert_eq!(serialize(&strings(&["a", "b"]), &[]).unwrap(), "a,b");
    }

    #[test]
    fn test_write_csv_keeps_terminator() {
        let mut out = Vec::new();
        write_csv(&mut out, &strings(&["a"]), &[strings(&["1"])]).unwrap();
        assert_eq!(out, b"a\n1\n");
    }
}
