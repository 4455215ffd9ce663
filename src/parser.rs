//! CSV text parsing into a [`Table`].
//!
//! The parser is a character-level state machine rather than a split on
//! commas, so quoted fields may contain delimiters, doubled quotes and line
//! breaks. It is deliberately lenient: ragged rows are normalized and an
//! unterminated quote simply ends the field at end of input.

use crate::encoding::decode;
use crate::error::{Error, Result};
use crate::table::Table;
use crate::warning::Warning;
use std::borrow::Cow;

const QUOTE: char = '"';
const DELIMITER: char = ',';

/// Parse CSV text into a table.
///
/// The first non-blank record becomes the header row. Every field is trimmed.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] when the text contains no non-blank line.
pub fn parse(text: &str, name: &str) -> Result<Table> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let normalized = normalize_line_endings(text);

    let mut warnings = Vec::new();
    let mut records = split_records(&normalized, name, &mut warnings);

    if records.is_empty() {
        return Err(Error::EmptyInput {
            name: name.to_string(),
        });
    }

    let header = records.remove(0);
    let (lines, rows): (Vec<usize>, Vec<Vec<String>>) = records
        .into_iter()
        .map(|record| (record.line, record.fields))
        .unzip();

    tracing::debug!(
        file = name,
        columns = header.fields.len(),
        rows = rows.len(),
        "Parsed CSV"
    );

    Ok(Table::from_records(
        name.to_string(),
        header.fields,
        rows,
        &lines,
        text.len(),
        warnings,
    ))
}

/// Decode raw file bytes and parse them.
///
/// See [`decode`] for the supported encodings.
pub fn parse_bytes(data: &[u8], name: &str) -> Result<Table> {
    let decoded = decode(data);
    parse(&decoded.text, name)
}

/// A parsed record and the line it started on.
#[derive(Debug)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Replace `\r\n` and standalone `\r` with `\n`.
/// Returns `Cow::Borrowed` when the text has no carriage return.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Split normalized text into records.
///
/// Blank records (nothing but whitespace, no delimiter, no quote) are
/// discarded.
fn split_records(text: &str, name: &str, warnings: &mut Vec<Warning>) -> Vec<Record> {
    let mut records = Vec::with_capacity(bytecount::count(text.as_bytes(), b'\n') + 1);
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_content = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes => {
                // Doubled quote inside a quoted field is a literal quote
                if chars.peek() == Some(&QUOTE) {
                    current.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            QUOTE => {
                in_quotes = true;
                has_content = true;
            }
            DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
                has_content = true;
            }
            '\n' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
                if has_content {
                    records.push(Record {
                        line: record_line,
                        fields: std::mem::take(&mut fields),
                    });
                } else {
                    fields.clear();
                }
                has_content = false;
                line += 1;
                record_line = line;
            }
            c => {
                if c == '\n' {
                    line += 1;
                }
                if !c.is_whitespace() {
                    has_content = true;
                }
                current.push(c);
            }
        }
    }

    if in_quotes {
        tracing::warn!(file = name, line = record_line, "Unterminated quoted field");
        warnings.push(Warning::UnterminatedQuote {
            file: name.to_string(),
            line: record_line,
        });
    }

    if has_content {
        fields.push(current.trim().to_string());
        records.push(Record {
            line: record_line,
            fields,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let table = parse("a,b,c\n1,2,3\n4,5,6\n", "simple.csv").unwrap();
        assert_eq!(table.headers(), ["a", "b", "c"]);
        assert_eq!(table.rows(), [vec!["1", "2", "3"], vec!["4", "5", "6"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.name(), "simple.csv");
        assert!(table.warnings().is_empty());
    }

    #[test]
    fn test_parse_quoted_fields() {
        let table = parse("\"a,b\",c\n\"say \"\"hi\"\"\",\"x\ny\"\n", "quoted.csv").unwrap();
        assert_eq!(table.headers(), ["a,b", "c"]);
        assert_eq!(table.rows(), [vec!["say \"hi\"", "x\ny"]]);
    }

    #[test]
    fn test_parse_trims_fields() {
        let table = parse("  name , email \n Alice ,  a@x.com\n", "trim.csv").unwrap();
        assert_eq!(table.headers(), ["name", "email"]);
        assert_eq!(table.rows()[0], ["Alice", "a@x.com"]);
    }

    #[test]
    fn test_parse_line_endings() {
        let crlf = parse("a,b\r\n1,2\r\n3,4\r\n", "crlf.csv").unwrap();
        let cr = parse("a,b\r1,2\r3,4\r", "cr.csv").unwrap();
        assert_eq!(crlf.rows(), cr.rows());
        assert_eq!(crlf.rows(), [vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let table = parse("\n\na,b\n\n   \n1,2\n\n", "blank.csv").unwrap();
        assert_eq!(table.headers(), ["a", "b"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_parse_keeps_delimiter_only_rows() {
        let table = parse("a,b\n,\n1,2\n", "commas.csv").unwrap();
        assert_eq!(table.rows(), [vec!["", ""], vec!["1", "2"]]);
    }

    #[test]
    fn test_parse_ragged_rows() {
        let table = parse("a,b,c\n1\n1,2,3,4\n", "ragged.csv").unwrap();
        assert_eq!(table.rows(), [vec!["1", "", ""], vec!["1", "2", "3"]]);
        assert_eq!(
            table.warnings(),
            [
                Warning::MalformedRow {
                    file: "ragged.csv".to_string(),
                    line: 2,
                    expected: 3,
                    found: 1,
                },
                Warning::MalformedRow {
                    file: "ragged.csv".to_string(),
                    line: 3,
                    expected: 3,
                    found: 4,
                },
            ]
        );
    }

    #[test]
    fn test_parse_line_numbers_follow_embedded_newlines() {
        let table = parse("a,b\n\"x\ny\",1\n2\n", "lines.csv").unwrap();
        assert_eq!(
            table.warnings(),
            [Warning::MalformedRow {
                file: "lines.csv".to_string(),
                line: 4,
                expected: 2,
                found: 1,
            }]
        );
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let table = parse("a,b\n1,\"open\n", "open.csv").unwrap();
        assert_eq!(table.rows(), [vec!["1", "open"]]);
        assert!(matches!(
            table.warnings()[0],
            Warning::UnterminatedQuote { line: 2, .. }
        ));
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse("name,email", "header.csv").unwrap();
        assert_eq!(table.headers(), ["name", "email"]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_parse_empty_input() {
        for text in ["", "\n\n", "  \r\n \t\n"] {
            let err = parse(text, "empty.csv").unwrap_err();
            assert!(matches!(err, Error::EmptyInput { ref name } if name == "empty.csv"));
        }
    }

    #[test]
    fn test_parse_strips_bom() {
        let table = parse("\u{feff}id,name\n1,a", "bom.csv").unwrap();
        assert_eq!(table.headers(), ["id", "name"]);
    }

    #[test]
    fn test_parse_bytes_transcodes() {
        let data: &[u8] = &[0xFF, 0xFE, b'a', 0, b',', 0, b'b', 0, b'\n', 0, b'1', 0, b',', 0, b'2', 0];
        let table = parse_bytes(data, "utf16.csv").unwrap();
        assert_eq!(table.headers(), ["a", "b"]);
        assert_eq!(table.rows(), [vec!["1", "2"]]);
    }

    #[test]
    fn test_byte_size_is_source_length() {
        let text = "a,b\n1,2\n";
        assert_eq!(parse(text, "size.csv").unwrap().byte_size(), text.len());
    }
}
