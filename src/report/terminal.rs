use std::collections::HashMap;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::ConversionSummary;

/// Render a colored terminal summary of a conversion run.
pub fn render(summary: &ConversionSummary, verbose: bool, quiet: bool) -> Result<()> {
    if quiet {
        println!("{}", summary_line(summary));
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "provider-export".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Input : {}", summary.input.display());
    println!(" Output: {}\n", summary.output_dir.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {} │", format!("{:<49}", "SUMMARY").bold());
    println!("{}", box_row(" ", &format!("Rows read       : {:>6}", summary.rows_read)));
    println!(
        "{}",
        box_row(
            &"✓".green().to_string(),
            &format!("Exported        : {:>6}", summary.exported.len())
        )
    );
    println!(
        "{}",
        box_row(
            &"-".dimmed().to_string(),
            &format!("Header skipped  : {:>6}", summary.headers_skipped)
        )
    );
    println!(
        "{}",
        box_row(
            &"⚠".yellow().to_string(),
            &format!("Overwritten     : {:>6}", summary.overwritten)
        )
    );
    println!(
        "{}",
        box_row(" ", &format!("Files on disk   : {:>6}", summary.files_written()))
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if verbose && !summary.exported.is_empty() {
        println!(" {} Exported providers:\n", "[OK]".green().bold());
        println!("{}", build_table(summary));
        println!();
    }

    Ok(())
}

/// One line of the summary box. `glyph` is a single visible column and may
/// carry color codes; the padding is applied to the plain `text` only.
fn box_row(glyph: &str, text: &str) -> String {
    format!(" │  {}  {:<46} │", glyph, text)
}

/// One-line summary used by `--quiet`.
pub fn summary_line(summary: &ConversionSummary) -> String {
    format!(
        "Rows: {}  Exported: {}  Skipped: {}  Overwritten: {}",
        summary.rows_read,
        summary.exported.len().to_string().green(),
        summary.headers_skipped,
        summary.overwritten.to_string().yellow(),
    )
}

fn build_table(summary: &ConversionSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Line").add_attribute(Attribute::Bold),
            Cell::new("Provider").add_attribute(Attribute::Bold),
            Cell::new("Terms of Service").add_attribute(Attribute::Bold),
            Cell::new("Privacy Policy").add_attribute(Attribute::Bold),
            Cell::new("File").add_attribute(Attribute::Bold),
        ]);

    // Index of the write that left each provider's file on disk
    let last_write: HashMap<&str, usize> = summary
        .exported
        .iter()
        .enumerate()
        .map(|(idx, e)| (e.provider.as_str(), idx))
        .collect();

    for (idx, entry) in summary.exported.iter().enumerate() {
        let file_cell = if last_write[entry.provider.as_str()] != idx {
            Cell::new(format!("{} (overwritten)", entry.path.display())).fg(Color::DarkGrey)
        } else {
            Cell::new(entry.path.display().to_string())
        };

        table.add_row(vec![
            Cell::new(entry.line).set_alignment(CellAlignment::Right),
            Cell::new(&entry.provider),
            Cell::new(&entry.tos_url),
            Cell::new(&entry.privacy_url),
            file_cell,
        ]);
    }

    table
}
