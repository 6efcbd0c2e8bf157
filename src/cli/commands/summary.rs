//! `qid summary` command - dataset overview

use console::style;
use miette::Result;

use crate::cli::commands::utils::Session;
use crate::cli::helpers::format_percent;
use crate::cli::output::{effective_format, print_structured, Report};
use crate::cli::GlobalOpts;
use crate::core::summarize;

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {}

/// Run the summary command
pub fn run(_args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let summary = summarize(&session.dataset, &session.ranges);

    let format = effective_format(global.output, false);
    let label = session.dataset_label();
    if print_structured(format, &Report::new(&label, &summary))? {
        return Ok(());
    }

    println!("{} {}", style("Dataset").bold(), style(&label).cyan());
    println!("  Records:             {}", summary.total_records);
    println!("  Unique identifiers:  {}", summary.unique_ids);
    println!(
        "  Declared OK:         {} ({})",
        style(summary.ok_records).green(),
        format_percent(summary.compliance_rate)
    );
    println!("  Declared NOT OK:     {}", style(summary.not_ok_records).red());
    println!("  Measurement columns: {}", summary.measurement_columns);
    println!(
        "  Ranges:              {} from dataset, {} fallback",
        summary.dataset_ranges, summary.fallback_ranges
    );
    if !summary.process_parameters.is_empty() {
        println!(
            "  Process parameters:  {}",
            summary.process_parameters.join(", ")
        );
    }
    Ok(())
}
