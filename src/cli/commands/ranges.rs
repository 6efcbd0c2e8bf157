//! `qid ranges` command - show the resolved range map

use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::commands::utils::Session;
use crate::cli::filters::SourceFilter;
use crate::cli::helpers::format_value;
use crate::cli::output::{effective_format, print_structured, render_rows, Report};
use crate::cli::GlobalOpts;
use crate::core::{RangeEntry, RangeMap};

#[derive(clap::Args, Debug)]
pub struct RangesArgs {
    /// Only parameters whose name contains this text (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by range source
    #[arg(long, value_enum, default_value_t = SourceFilter::All)]
    pub source: SourceFilter,
}

#[derive(Tabled, Serialize)]
struct RangeRow {
    parameter: String,
    min: String,
    max: String,
    target: String,
    source: String,
}

#[derive(Serialize)]
struct RangesReport<'a> {
    count: usize,
    ranges: Vec<NamedEntry<'a>>,
}

#[derive(Serialize)]
struct NamedEntry<'a> {
    parameter: &'a str,
    #[serde(flatten)]
    entry: &'a RangeEntry,
}

/// Run the ranges command
pub fn run(args: RangesArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let entries = filter_entries(&session.ranges, args.search.as_deref(), args.source);

    let format = effective_format(global.output, true);
    let label = session.dataset_label();
    let report = Report::new(
        &label,
        RangesReport {
            count: entries.len(),
            ranges: entries
                .iter()
                .map(|&(parameter, entry)| NamedEntry { parameter, entry })
                .collect(),
        },
    );
    if print_structured(format, &report)? {
        return Ok(());
    }

    if entries.is_empty() {
        println!("No ranges found.");
        return Ok(());
    }

    let rows: Vec<RangeRow> = entries
        .iter()
        .map(|(parameter, entry)| RangeRow {
            parameter: parameter.to_string(),
            min: format_value(entry.range.min),
            max: format_value(entry.range.max),
            target: format_value(entry.range.avg),
            source: entry.source.to_string(),
        })
        .collect();
    println!("{}", render_rows(format, &rows)?);
    Ok(())
}

fn filter_entries<'a>(
    ranges: &'a RangeMap,
    search: Option<&str>,
    source: SourceFilter,
) -> Vec<(&'a str, &'a RangeEntry)> {
    let needle = search.map(|s| s.trim().to_lowercase());
    ranges
        .iter()
        .filter(|(_, entry)| source.matches(entry.source))
        .filter(|(name, _)| {
            needle
                .as_deref()
                .map_or(true, |n| name.to_lowercase().contains(n))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ParameterRange, RangeSource};

    fn map() -> RangeMap {
        let mut ranges = RangeMap::new();
        ranges.insert_if_absent("COBB_TS", ParameterRange::new(20.0, 40.0, 30.0), RangeSource::Dataset);
        ranges.insert_if_absent("COBB_WS", ParameterRange::new(20.0, 40.0, 30.0), RangeSource::Dataset);
        ranges.insert_if_absent("CALIPER", ParameterRange::new(250.0, 300.0, 275.0), RangeSource::Fallback);
        ranges
    }

    #[test]
    fn test_filter_by_search() {
        let ranges = map();
        let names: Vec<&str> = filter_entries(&ranges, Some("cobb"), SourceFilter::All)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["COBB_TS", "COBB_WS"]);
    }

    #[test]
    fn test_filter_by_source() {
        let ranges = map();
        let fallback = filter_entries(&ranges, None, SourceFilter::Fallback);
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].0, "CALIPER");
        assert_eq!(filter_entries(&ranges, None, SourceFilter::All).len(), 3);
    }
}
