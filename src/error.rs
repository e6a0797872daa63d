use std::path::PathBuf;

use thiserror::Error;

/// Everything that can halt a conversion run. None of these are recovered
/// from: the first one ends the run and files already written stay on disk.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input CSV could not be opened.
    #[error("cannot open input file {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-header row has fewer positional fields than a record needs.
    #[error("malformed row at line {line}: expected 5 fields, found {found}")]
    MalformedRow { line: u64, found: usize },

    /// A provider file could not be created or written.
    #[error("cannot write {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be read or tokenized (e.g. invalid UTF-8).
    #[error("invalid CSV input at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
}
