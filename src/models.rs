use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Literal first field that marks the CSV header row.
///
/// The check is positional-free: any row whose first field is exactly this
/// string is treated as a header, so a provider literally called `name` can
/// never be exported.
pub const HEADER_MARKER: &str = "name";

/// One data row of the providers CSV, populated by position:
/// `name,tosURL,tosSelector,pcyURL,pcySelector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// 1-based line in the source file, for diagnostics.
    pub line: u64,
    pub name: String,
    pub tos_url: String,
    pub tos_selector: String,
    pub privacy_url: String,
    pub privacy_selector: String,
}

impl InputRow {
    /// Number of positional fields a row must carry.
    pub const FIELD_COUNT: usize = 5;

    pub fn is_header(&self) -> bool {
        self.name == HEADER_MARKER
    }
}

/// The per-provider declaration written to `<output>/<name>.json`.
///
/// Field order here is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    #[serde(rename = "serviceProviderName")]
    pub service_provider_name: String,
    pub documents: Documents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documents {
    pub tos: DocumentLocation,
    pub privacy: DocumentLocation,
}

/// Where a legal document lives and which part of the page holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLocation {
    pub url: String,
    /// Opaque selector, copied verbatim from the CSV.
    #[serde(rename = "contentSelector")]
    pub content_selector: String,
}

impl From<&InputRow> for ProviderRecord {
    fn from(row: &InputRow) -> Self {
        ProviderRecord {
            service_provider_name: row.name.clone(),
            documents: Documents {
                tos: DocumentLocation {
                    url: row.tos_url.clone(),
                    content_selector: row.tos_selector.clone(),
                },
                privacy: DocumentLocation {
                    url: row.privacy_url.clone(),
                    content_selector: row.privacy_selector.clone(),
                },
            },
        }
    }
}

/// A single file written during a run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedProvider {
    pub provider: String,
    pub line: u64,
    pub path: PathBuf,
    pub tos_url: String,
    pub privacy_url: String,
}

/// Outcome of a whole conversion run, used only for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub rows_read: u64,
    pub headers_skipped: u64,
    pub exported: Vec<ExportedProvider>,
    /// Writes that replaced a file already written earlier in the same run.
    pub overwritten: u64,
}

impl ConversionSummary {
    pub fn new(input: PathBuf, output_dir: PathBuf) -> Self {
        ConversionSummary {
            input,
            output_dir,
            rows_read: 0,
            headers_skipped: 0,
            exported: Vec::new(),
            overwritten: 0,
        }
    }

    /// Number of distinct files left on disk by this run.
    pub fn files_written(&self) -> u64 {
        self.exported.len() as u64 - self.overwritten
    }
}

impl std::fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows, {} exported, {} header(s) skipped, {} overwritten",
            self.rows_read,
            self.exported.len(),
            self.headers_skipped,
            self.overwritten
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> InputRow {
        InputRow {
            line: 2,
            name: "Acme".to_string(),
            tos_url: "http://acme.example/tos".to_string(),
            tos_selector: "#tos".to_string(),
            privacy_url: "http://acme.example/privacy".to_string(),
            privacy_selector: "#priv".to_string(),
        }
    }

    #[test]
    fn test_record_from_row() {
        let record = ProviderRecord::from(&acme());
        assert_eq!(record.service_provider_name, "Acme");
        assert_eq!(record.documents.tos.url, "http://acme.example/tos");
        assert_eq!(record.documents.tos.content_selector, "#tos");
        assert_eq!(record.documents.privacy.url, "http://acme.example/privacy");
        assert_eq!(record.documents.privacy.content_selector, "#priv");
    }

    #[test]
    fn test_key_order_follows_declaration() {
        let json = serde_json::to_string(&ProviderRecord::from(&acme())).unwrap();
        assert_eq!(
            json,
            r##"{"serviceProviderName":"Acme","documents":{"tos":{"url":"http://acme.example/tos","contentSelector":"#tos"},"privacy":{"url":"http://acme.example/privacy","contentSelector":"#priv"}}}"##
        );
    }

    #[test]
    fn test_header_detection() {
        let mut row = acme();
        assert!(!row.is_header());
        row.name = "name".to_string();
        assert!(row.is_header());
        // Case-sensitive, exact match only
        row.name = "Name".to_string();
        assert!(!row.is_header());
    }

    #[test]
    fn test_files_written_discounts_overwrites() {
        let mut summary = ConversionSummary::new("in.csv".into(), "out".into());
        for line in [2, 3] {
            summary.exported.push(ExportedProvider {
                provider: "Acme".to_string(),
                line,
                path: "out/Acme.json".into(),
                tos_url: String::new(),
                privacy_url: String::new(),
            });
        }
        summary.overwritten = 1;
        assert_eq!(summary.files_written(), 1);
    }
}
