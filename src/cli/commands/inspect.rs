//! `qid inspect` command - one record against every parameter range

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::commands::utils::Session;
use crate::cli::filters::VerdictFilter;
use crate::cli::helpers::{
    format_deviation, format_percent, format_range, format_value, is_interactive, styled_status,
    truncate_str,
};
use crate::cli::output::{effective_format, print_structured, render_rows, Report};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    evaluate_record_in, search, IdentifierKind, OverallStatus, ParameterVerdict, RecordEvaluation,
    SkipReason,
};
use crate::schema::ParameterGroups;

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Track number or Jumbo ID (prompted when omitted on a terminal)
    pub id: Option<String>,

    /// Which parameter verdicts to list
    #[arg(long, value_enum, default_value_t = VerdictFilter::All)]
    pub show: VerdictFilter,

    /// Shorthand for --show failures
    #[arg(long, conflicts_with = "show")]
    pub failures_only: bool,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    query: &'a str,
    kind: IdentifierKind,
    matched_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    kit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    evaluation: Option<&'a RecordEvaluation>,
}

#[derive(Tabled, Serialize)]
struct VerdictRow {
    parameter: String,
    group: String,
    value: String,
    min: String,
    max: String,
    deviation: String,
    status: String,
}

impl From<&ParameterVerdict> for VerdictRow {
    fn from(v: &ParameterVerdict) -> Self {
        Self {
            parameter: v.parameter.clone(),
            group: v.group.clone(),
            value: format_value(v.value),
            min: format_value(v.min),
            max: format_value(v.max),
            deviation: format_deviation(v.deviation),
            status: v.status.to_string(),
        }
    }
}

/// Run the inspect command
pub fn run(args: InspectArgs, global: &GlobalOpts) -> Result<()> {
    let query = match args.id {
        Some(id) => id,
        None => prompt_for_id()?,
    };
    let filter = if args.failures_only {
        VerdictFilter::Failures
    } else {
        args.show
    };

    let session = Session::open(global)?;
    let result = search(&session.dataset, &query);
    let evaluation = result
        .first()
        .map(|record| evaluate_record_in(&session.dataset, record, &session.ranges));

    let format = effective_format(global.output, false);
    let label = session.dataset_label();
    let report = Report::new(
        &label,
        InspectReport {
            query: &result.query,
            kind: result.kind,
            matched_records: result.len(),
            kit: result.kit(),
            evaluation: evaluation.as_ref(),
        },
    );
    if print_structured(format, &report)? {
        return Ok(());
    }

    let Some(evaluation) = evaluation else {
        println!(
            "{} No records found for {} '{}'",
            style("!").yellow(),
            result.kind,
            result.query
        );
        return Ok(());
    };

    match format {
        OutputFormat::Pretty => {
            print_pretty(&result.query, result.kind, result.len(), result.kit(), &evaluation, filter)
        }
        _ => {
            let rows: Vec<VerdictRow> = evaluation
                .verdicts
                .iter()
                .filter(|v| {
                    (v.status.is_failure() && filter.show_failures())
                        || (!v.status.is_failure() && filter.show_passes())
                })
                .map(VerdictRow::from)
                .collect();
            println!("{}", render_rows(format, &rows)?);
        }
    }

    Ok(())
}

fn prompt_for_id() -> Result<String> {
    if !is_interactive() {
        return Err(miette::miette!(
            help = "Pass a track number or jumbo id, e.g. `qid inspect 12345`",
            "No identifier given"
        ));
    }
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Track number or Jumbo ID")
        .interact_text()
        .into_diagnostic()
}

fn print_pretty(
    query: &str,
    kind: IdentifierKind,
    matched: usize,
    kit: Option<&str>,
    evaluation: &RecordEvaluation,
    filter: VerdictFilter,
) {
    println!(
        "{} {} {}",
        style(kind.to_string()).bold(),
        style(query).cyan().bold(),
        style(format!("({} record{})", matched, if matched == 1 { "" } else { "s" })).dim()
    );

    let declared = if evaluation.declared_ok {
        style(format!("{} ✓", evaluation.declared_quality)).green()
    } else {
        style(format!("{} ✗", evaluation.declared_quality)).red()
    };
    println!("  Declared quality: {}", declared);
    if let Some(kit) = kit {
        println!("  KIT: {}", kit);
    }
    if let Some(pp) = &evaluation.process_parameter {
        println!(
            "  Process parameter: {} = {} in {} {}",
            style(&pp.parameter).bold(),
            format_value(pp.value),
            format_range(pp.min, pp.max),
            styled_status(pp.status)
        );
    }

    let failures: Vec<&ParameterVerdict> = evaluation.failures().collect();
    if filter.show_failures() {
        println!();
        println!("{} ({})", style("Out of range").red().bold(), failures.len());
        if failures.is_empty() {
            println!("  {}", style("none").dim());
        }
        for v in &failures {
            println!(
                "  {:<28} {:>10} {:<20} {:<10} {}",
                truncate_str(&v.parameter, 28),
                format_value(v.value),
                format_range(v.min, v.max),
                styled_status(v.status),
                style(format_deviation(v.deviation)).red()
            );
        }
    }

    if filter.show_passes() {
        let groups = ParameterGroups::builtin();
        let mut passes: Vec<&ParameterVerdict> = evaluation
            .verdicts
            .iter()
            .filter(|v| !v.status.is_failure())
            .collect();
        passes.sort_by_key(|v| groups.order_of(&v.group));

        println!();
        println!("{} ({})", style("In range").green().bold(), passes.len());
        let mut current_group: Option<&str> = None;
        for v in passes {
            if current_group != Some(v.group.as_str()) {
                println!("  {}", style(&v.group).underlined());
                current_group = Some(v.group.as_str());
            }
            println!(
                "    {:<26} {:>10} {}",
                truncate_str(&v.parameter, 26),
                format_value(v.value),
                style(format_range(v.min, v.max)).dim()
            );
        }
    }

    println!();
    let overall = match evaluation.overall_status {
        OverallStatus::Pass => style(evaluation.overall_status.to_string()).green().bold(),
        OverallStatus::Fail => style(evaluation.overall_status.to_string()).red().bold(),
    };
    println!(
        "Summary: {} in range, {} out of range, overall {} ({} compliance)",
        evaluation.in_range_count(),
        evaluation.out_of_range_count(),
        overall,
        format_percent(evaluation.compliance_rate())
    );

    if !evaluation.skipped.is_empty() {
        let count = |reason: SkipReason| {
            evaluation
                .skipped
                .iter()
                .filter(|s| s.reason == reason)
                .count()
        };
        println!(
            "  {}",
            style(format!(
                "Skipped {} parameters (no range: {}, missing: {}, non-numeric: {})",
                evaluation.skipped.len(),
                count(SkipReason::NoRange),
                count(SkipReason::Missing),
                count(SkipReason::NonNumeric)
            ))
            .dim()
        );
    }
}
