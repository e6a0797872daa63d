use anyhow::Result;

use crate::models::ConversionSummary;

/// Render the run summary as pretty-printed JSON.
pub fn render(summary: &ConversionSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
