//! `qid compare` command - value distribution of one parameter

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::commands::utils::Session;
use crate::cli::helpers::{format_percent, format_range, format_value};
use crate::cli::output::{effective_format, print_structured, render_rows, Report};
use crate::cli::viz::{render_histogram, render_marker_axis, HIST_HEIGHT, HIST_WIDTH};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Distribution, DistributionPoint, HistogramBin, Selection};

#[derive(clap::Args, Debug)]
pub struct CompareArgs {
    /// Process parameter to compare, e.g. CALIPER
    pub parameter: String,

    /// Grade filter ("all" for every grade)
    #[arg(long, short = 'g', default_value = "all")]
    pub grade: Selection,

    /// Machine filter ("all" for every machine)
    #[arg(long, short = 'm', default_value = "all")]
    pub machine: Selection,

    /// Track or jumbo id to highlight
    #[arg(long)]
    pub highlight: Option<String>,

    /// Number of histogram bins (default from config)
    #[arg(long)]
    pub bins: Option<usize>,
}

#[derive(Serialize)]
struct CompareReport<'a> {
    #[serde(flatten)]
    distribution: &'a Distribution,
    within: usize,
    outside: usize,
    compliance_rate: f64,
    histogram: Vec<HistogramBin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlight: Option<&'a DistributionPoint>,
}

#[derive(Tabled, Serialize)]
struct PointRow {
    record_id: String,
    value: String,
    status: String,
}

/// Run the compare command
pub fn run(args: CompareArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let distribution = session.config.selector().select(
        &session.dataset,
        &args.parameter,
        &args.grade,
        &args.machine,
    );
    let bins = args.bins.unwrap_or_else(|| session.config.histogram_bins()).max(1);
    let highlight = args.highlight.as_deref().and_then(|id| distribution.locate(id));

    let format = effective_format(global.output, false);
    let label = session.dataset_label();
    let report = Report::new(
        &label,
        CompareReport {
            distribution: &distribution,
            within: distribution.within_count(),
            outside: distribution.outside_count(),
            compliance_rate: distribution.compliance_rate(),
            histogram: distribution.histogram(bins),
            highlight,
        },
    );
    if print_structured(format, &report)? {
        return Ok(());
    }

    if distribution.is_empty() {
        println!(
            "{} No values for {} (grade: {}, machine: {}, {} matching rows)",
            style("!").yellow(),
            distribution.parameter,
            distribution.grade,
            distribution.machine,
            distribution.matched_rows
        );
        return Ok(());
    }

    match format {
        OutputFormat::Pretty => print_pretty(&distribution, bins, args.highlight.as_deref(), highlight),
        _ => {
            let rows: Vec<PointRow> = distribution
                .values
                .iter()
                .map(|p| PointRow {
                    record_id: p.record_id.clone(),
                    value: format_value(p.value),
                    status: p.status.to_string(),
                })
                .collect();
            println!("{}", render_rows(format, &rows)?);
        }
    }

    Ok(())
}

fn print_pretty(
    distribution: &Distribution,
    bins: usize,
    highlight_id: Option<&str>,
    highlight: Option<&DistributionPoint>,
) {
    println!(
        "{} {}",
        style("Distribution of").bold(),
        style(&distribution.parameter).cyan().bold()
    );
    print!("  grade: {}", distribution.grade);
    if let Some(kind) = distribution.grade_match {
        print!(" {}", style(format!("({} match)", kind)).dim());
    }
    println!("  machine: {}", distribution.machine);
    if let Some(range) = &distribution.range {
        println!(
            "  range: {}  target: {}",
            format_range(range.min, range.max),
            format_value(range.avg)
        );
    }

    println!();
    println!("{}", render_histogram(&distribution.histogram(bins), HIST_WIDTH, HIST_HEIGHT));
    if let Some(stats) = distribution.stats() {
        println!(
            "{}",
            render_marker_axis(
                stats.min,
                stats.max,
                distribution.range.as_ref(),
                highlight.map(|p| p.value),
                (HIST_WIDTH / 2) as usize,
            )
        );
        println!();
        println!(
            "  n = {}  min = {}  max = {}  mean = {}",
            stats.count,
            format_value(stats.min),
            format_value(stats.max),
            format_value(stats.mean)
        );
    }

    println!(
        "  {} within range, {} outside range ({} compliance)",
        style(distribution.within_count()).green(),
        style(distribution.outside_count()).red(),
        format_percent(distribution.compliance_rate())
    );

    match (highlight_id, highlight) {
        (Some(_), Some(point)) => println!(
            "  {} {}: {} ({})",
            style("▲").yellow(),
            point.record_id,
            format_value(point.value),
            point.status
        ),
        (Some(id), None) => println!(
            "  {} {} is not part of this distribution",
            style("!").yellow(),
            id
        ),
        _ => {}
    }
}
