//! `qid failures` command - population failure analysis

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::commands::utils::Session;
use crate::cli::helpers::{format_percent, format_range};
use crate::cli::output::{effective_format, print_structured, render_rows, Report};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{aggregate_failures_with, FailureAnalysis, FailureTally};

#[derive(clap::Args, Debug)]
pub struct FailuresArgs {
    /// Only show the N most problematic parameters
    #[arg(long, short = 'n')]
    pub top: Option<usize>,

    /// Hide parameters without failures
    #[arg(long)]
    pub problems_only: bool,
}

#[derive(Tabled, Serialize)]
struct TallyRow {
    parameter: String,
    failures: usize,
    #[tabled(rename = "% of failing")]
    #[serde(rename = "failure_percentage")]
    percentage: String,
    range: String,
    source: String,
}

impl From<&FailureTally> for TallyRow {
    fn from(t: &FailureTally) -> Self {
        Self {
            parameter: t.parameter.clone(),
            failures: t.failure_count,
            percentage: format!("{:.1}", t.failure_percentage),
            range: format_range(t.range.min, t.range.max),
            source: t.source.to_string(),
        }
    }
}

/// Run the failures command
pub fn run(args: FailuresArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let mut analysis = aggregate_failures_with(
        &session.dataset,
        &session.ranges,
        &session.config.aggregate_options(),
    );
    select(&mut analysis, &args);

    let format = effective_format(global.output, true);
    let label = session.dataset_label();
    if print_structured(format, &Report::new(&label, &analysis))? {
        return Ok(());
    }

    if analysis.failing_unique == 0 {
        println!(
            "{} No NOT-OK records among {} records",
            style("✓").green(),
            analysis.total_records
        );
        return Ok(());
    }

    let rows: Vec<TallyRow> = analysis.per_parameter.iter().map(TallyRow::from).collect();
    println!("{}", render_rows(format, &rows)?);

    if format == OutputFormat::Table {
        println!(
            "{} failing identifiers out of {} records",
            style(analysis.failing_unique).red().bold(),
            analysis.total_records
        );
        if let Some(worst) = analysis.most_problematic() {
            println!(
                "Most problematic: {} ({} of failing)",
                style(&worst.parameter).bold(),
                format_percent(worst.failure_percentage)
            );
        }
    }

    Ok(())
}

/// Apply `--problems-only` and `--top` to the ranked tallies
fn select(analysis: &mut FailureAnalysis, args: &FailuresArgs) {
    if args.problems_only {
        analysis.per_parameter.retain(|t| t.failure_count > 0);
    }
    if let Some(top) = args.top {
        analysis.per_parameter.truncate(top);
    }
}
