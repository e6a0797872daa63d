use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::ConvertError;
use crate::models::{InputRow, HEADER_MARKER};

/// A row as seen at the parse boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRow {
    /// First field is the header marker; the rest of the row is not inspected.
    Header { line: u64 },
    Data(InputRow),
}

/// Streams typed rows out of a providers CSV, one record per line.
///
/// Rows are addressed by position only, so the reader never treats the first
/// line specially; header detection happens per row. Each line is tokenized
/// on its own, which keeps line numbers exact and turns a blank line into a
/// zero-field row that [`parse_record`] rejects. Quoting is honored within a
/// line; a quoted field cannot span lines.
pub struct RowReader<R: Read> {
    inner: BufReader<R>,
    buf: Vec<u8>,
    line: u64,
}

impl RowReader<File> {
    /// Open `path` for reading. Fails with [`ConvertError::InputNotFound`].
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let file = File::open(path).map_err(|source| ConvertError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> RowReader<R> {
    pub fn from_reader(reader: R) -> Self {
        RowReader {
            inner: BufReader::new(reader),
            buf: Vec::new(),
            line: 0,
        }
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<ParsedRow, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.inner.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line += 1;
                Some(
                    tokenize_line(strip_terminator(&self.buf), self.line)
                        .and_then(|record| parse_record(&record, self.line)),
                )
            }
            Err(e) => Some(Err(ConvertError::Csv {
                line: self.line + 1,
                source: e.into(),
            })),
        }
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Split one line into fields. An empty line yields an empty record.
fn tokenize_line(line: &[u8], line_no: u64) -> Result<StringRecord, ConvertError> {
    let mut record = StringRecord::new();
    if line.is_empty() {
        return Ok(record);
    }

    ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(line)
        .read_record(&mut record)
        .map_err(|source| ConvertError::Csv {
            line: line_no,
            source,
        })?;
    Ok(record)
}

/// Map one positional CSV record onto an [`InputRow`].
///
/// The header check runs first, so a short header row is still skipped.
/// Fields beyond the fifth are ignored.
pub fn parse_record(record: &StringRecord, line: u64) -> Result<ParsedRow, ConvertError> {
    if record.get(0) == Some(HEADER_MARKER) {
        return Ok(ParsedRow::Header { line });
    }

    if record.len() < InputRow::FIELD_COUNT {
        return Err(ConvertError::MalformedRow {
            line,
            found: record.len(),
        });
    }

    Ok(ParsedRow::Data(InputRow {
        line,
        name: record[0].to_string(),
        tos_url: record[1].to_string(),
        tos_selector: record[2].to_string(),
        privacy_url: record[3].to_string(),
        privacy_selector: record[4].to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(input: &str) -> Vec<Result<ParsedRow, ConvertError>> {
        RowReader::from_reader(input.as_bytes()).collect()
    }

    #[test]
    fn test_header_then_data() {
        let parsed = rows(
            "name,tosURL,tosSelector,pcyURL,pcySelector\n\
             Acme,http://acme.example/tos,#tos,http://acme.example/privacy,#priv\n",
        );
        assert_eq!(parsed.len(), 2);
        assert!(matches!(parsed[0], Ok(ParsedRow::Header { line: 1 })));
        match &parsed[1] {
            Ok(ParsedRow::Data(row)) => {
                assert_eq!(row.line, 2);
                assert_eq!(row.name, "Acme");
                assert_eq!(row.tos_url, "http://acme.example/tos");
                assert_eq!(row.tos_selector, "#tos");
                assert_eq!(row.privacy_url, "http://acme.example/privacy");
                assert_eq!(row.privacy_selector, "#priv");
            }
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_header_anywhere() {
        let parsed = rows("A,a,b,c,d\nname,x,y,z,w\nB,a,b,c,d\n");
        assert!(matches!(parsed[1], Ok(ParsedRow::Header { line: 2 })));
        assert!(matches!(parsed[2], Ok(ParsedRow::Data(_))));
    }

    #[test]
    fn test_short_header_is_still_skipped() {
        let parsed = rows("name\n");
        assert!(matches!(parsed[0], Ok(ParsedRow::Header { line: 1 })));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let parsed = rows("A,a,b,c,d\nBroken,http://x,#y\n");
        assert!(matches!(parsed[0], Ok(ParsedRow::Data(_))));
        assert!(matches!(
            parsed[1],
            Err(ConvertError::MalformedRow { line: 2, found: 3 })
        ));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let parsed = rows("A,a,b,c,d,extra\n");
        match &parsed[0] {
            Ok(ParsedRow::Data(row)) => assert_eq!(row.privacy_selector, "d"),
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_selector_keeps_commas() {
        let parsed = rows("A,http://a/tos,\"div.a, div.b\",http://a/pcy,#p\n");
        match &parsed[0] {
            Ok(ParsedRow::Data(row)) => assert_eq!(row.tos_selector, "div.a, div.b"),
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_line_is_zero_field_row() {
        let parsed = rows("A,a,b,c,d\n\nB,a,b,c,d\n");
        assert_eq!(parsed.len(), 3);
        assert!(matches!(parsed[0], Ok(ParsedRow::Data(_))));
        assert!(matches!(
            parsed[1],
            Err(ConvertError::MalformedRow { line: 2, found: 0 })
        ));
        match &parsed[2] {
            Ok(ParsedRow::Data(row)) => assert_eq!(row.line, 3),
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_blank_line_is_rejected() {
        let parsed = rows("A,a,b,c,d\r\n\r\n");
        assert_eq!(parsed.len(), 2);
        assert!(matches!(
            parsed[1],
            Err(ConvertError::MalformedRow { line: 2, found: 0 })
        ));
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let parsed = rows("A,a,b,c,d\r\nB,a,b,c,last");
        assert_eq!(parsed.len(), 2);
        match &parsed[1] {
            Ok(ParsedRow::Data(row)) => {
                assert_eq!(row.line, 2);
                assert_eq!(row.privacy_selector, "last");
            }
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let parsed: Vec<_> = RowReader::from_reader(&b"A,a,b,c,d\nB,\xff,b,c,d\n"[..]).collect();
        assert!(matches!(parsed[1], Err(ConvertError::Csv { line: 2, .. })));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RowReader::open(&dir.path().join("missing.csv")).err().unwrap();
        assert!(matches!(err, ConvertError::InputNotFound { .. }));
    }
}
