//! Row-to-file conversion.
//!
//! [`convert`] walks the input CSV in file order and hands every row to
//! [`emit_record`], which writes `<output>/<name>.json`. The first error of any
//! kind ends the run; files written before it are left in place.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use tracing::{debug, info};

use crate::error::ConvertError;
use crate::models::{ConversionSummary, ExportedProvider, InputRow, ProviderRecord};
use crate::reader::{ParsedRow, RowReader};

const INDENT: &[u8] = b"    ";

/// Convert every data row of `input` into a JSON file under `output_dir`.
///
/// `output_dir` must already exist; it is never created here.
pub fn convert(input: &Path, output_dir: &Path) -> Result<ConversionSummary, ConvertError> {
    info!(input = %input.display(), output = %output_dir.display(), "starting conversion");

    let reader = RowReader::open(input)?;
    let mut summary = ConversionSummary::new(input.to_path_buf(), output_dir.to_path_buf());
    let mut seen: HashSet<String> = HashSet::new();

    for parsed in reader {
        let row = match parsed? {
            ParsedRow::Header { line } => {
                debug!(line, "skipping header row");
                summary.rows_read += 1;
                summary.headers_skipped += 1;
                continue;
            }
            ParsedRow::Data(row) => row,
        };
        summary.rows_read += 1;

        if let Some(path) = emit_record(&row, output_dir)? {
            if !seen.insert(row.name.clone()) {
                debug!(provider = %row.name, line = row.line, "overwrote output from an earlier row");
                summary.overwritten += 1;
            }
            summary.exported.push(ExportedProvider {
                provider: row.name,
                line: row.line,
                path,
                tos_url: row.tos_url,
                privacy_url: row.privacy_url,
            });
        }
    }

    info!(%summary, "conversion finished");
    Ok(summary)
}

/// Write the declaration for a single row.
///
/// Returns `Ok(None)` for a header row, otherwise the path written.
pub fn emit_record(row: &InputRow, output_dir: &Path) -> Result<Option<PathBuf>, ConvertError> {
    if row.is_header() {
        return Ok(None);
    }

    let path = output_path(output_dir, &row.name);
    let record = ProviderRecord::from(row);

    write_record(&path, &record).map_err(|source| ConvertError::OutputWriteFailure {
        path: path.clone(),
        source,
    })?;

    debug!(provider = %row.name, line = row.line, path = %path.display(), "wrote provider");
    Ok(Some(path))
}

/// `<output_dir>/<name>.json`, built by appending to the directory text so the
/// name always lands beneath `output_dir`, even when it starts with a
/// separator. The name is not sanitized.
pub fn output_path(output_dir: &Path, name: &str) -> PathBuf {
    let mut path = OsString::from(output_dir.as_os_str());
    path.push("/");
    path.push(name);
    path.push(".json");
    PathBuf::from(path)
}

/// Serialize a record with a 4-space indent and no trailing newline.
///
/// Non-ASCII characters are written as `\uXXXX` escapes (surrogate pairs
/// outside the BMP), so the output is plain ASCII.
pub fn to_json(record: &ProviderRecord) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = AsciiFormatter(PrettyFormatter::with_indent(INDENT));
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut ser)?;
    Ok(buf)
}

/// [`PrettyFormatter`] layout with ASCII-only string contents.
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

fn write_record(path: &Path, record: &ProviderRecord) -> std::io::Result<()> {
    let bytes = to_json(record)?;
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(&bytes)?;
    out.flush()
}
