use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::generator::GenerationReport;
use crate::models::Warning;
use crate::outcome::{partition, IgnoreList};

/// Render a colored terminal report of a finished run.
pub fn render(
    report: &GenerationReport,
    output_dir: &Path,
    ignored: &IgnoreList,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let (unexpected, skipped) = partition(&report.warnings, ignored);

    if quiet {
        println!(
            "Licenses: {}  Deprecated: {}  Exceptions: {}  Warnings: {}  Ignored: {}",
            report.licenses,
            report.deprecated,
            report.exceptions,
            unexpected.len().to_string().yellow(),
            skipped.len(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-listgen".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Output: {}\n", output_dir.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!(
            "List version       : {} ({})",
            report.meta.version_or_unknown(),
            report.meta.release_date_or_unknown()
        )
    );
    println!(" │  {:<48} │", format!("Licenses           : {:>4}", report.licenses));
    println!(" │  {:<48} │", format!("Deprecated licenses: {:>4}", report.deprecated));
    println!(" │  {:<48} │", format!("Exceptions         : {:>4}", report.exceptions));
    println!(
        " │  {:<48} │",
        format!(
            "{}  Warnings        : {:>4}  (ignored {})",
            "⚠".yellow(),
            unexpected.len(),
            skipped.len()
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if unexpected.is_empty() {
        println!(" {} No unexpected warnings\n", "✓".green());
    } else {
        println!(" {} Warnings requiring attention:\n", "[WARN]".yellow().bold());
        render_table(&unexpected, Color::Yellow);
        println!();
    }

    if verbose && !skipped.is_empty() {
        println!(" {} Ignored warnings:\n", "[IGNORED]".dimmed().bold());
        render_table(&skipped, Color::DarkGrey);
        println!();
    }

    Ok(())
}

fn render_table(warnings: &[&Warning], kind_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Warning").add_attribute(Attribute::Bold),
        ]);

    for warning in grouped(warnings) {
        table.add_row(vec![
            Cell::new(warning.kind.to_string()).fg(kind_color),
            Cell::new(&warning.message),
        ]);
    }

    println!("{}", table);
}

/// Warnings ordered by kind, keeping run order within a kind.
fn grouped<'a>(warnings: &[&'a Warning]) -> Vec<&'a Warning> {
    let mut sorted = warnings.to_vec();
    sorted.sort_by_key(|w| w.kind);
    sorted
}
