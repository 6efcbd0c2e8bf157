//! Population analysis - where do failing records fail?
//!
//! Every record whose declared quality is not "OK" is checked against every
//! numeric measurement column. Parameters that fail across many of those
//! records are the systemic problems.

use serde::Serialize;

use crate::core::classify::classify_in;
use crate::core::dataset::{unique_ids, Dataset};
use crate::core::evaluate::percentage;
use crate::core::ranges::{ParameterRange, RangeMap, RangeSource};
use crate::core::value::Cell;

/// Default widening of observed ranges, as a fraction of the observed span
pub const DEFAULT_OBSERVED_MARGIN: f64 = 0.1;

/// Options for [`aggregate_failures_with`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    /// Fraction of the observed span added on each side of an observed range
    pub observed_margin: f64,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            observed_margin: DEFAULT_OBSERVED_MARGIN,
        }
    }
}

/// Failure statistics of one parameter across the failing records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureTally {
    pub parameter: String,
    pub failure_count: usize,
    /// Percentage of unique failing identifiers, rounded to one decimal
    pub failure_percentage: f64,
    /// Range the parameter was checked against
    pub range: ParameterRange,
    pub source: RangeSource,
}

/// Dataset-wide failure analysis
#[derive(Debug, Clone, Serialize)]
pub struct FailureAnalysis {
    pub total_records: usize,

    /// Number of unique identifiers among failing records
    pub failing_unique: usize,

    /// Per-parameter tallies, most failures first
    pub per_parameter: Vec<FailureTally>,

    /// Unique failing identifiers in first-seen order
    pub failing_record_ids: Vec<String>,
}

impl FailureAnalysis {
    /// Tallies with at least one failure
    pub fn problem_parameters(&self) -> impl Iterator<Item = &FailureTally> {
        self.per_parameter.iter().filter(|t| t.failure_count > 0)
    }

    /// The parameter with the most failures, if any failed at all
    pub fn most_problematic(&self) -> Option<&FailureTally> {
        self.problem_parameters().next()
    }
}

/// Aggregate failures with default options
pub fn aggregate_failures(dataset: &Dataset, ranges: &RangeMap) -> FailureAnalysis {
    aggregate_failures_with(dataset, ranges, &AggregateOptions::default())
}

/// Count, per parameter, how many failing records are out of range
pub fn aggregate_failures_with(
    dataset: &Dataset,
    ranges: &RangeMap,
    options: &AggregateOptions,
) -> FailureAnalysis {
    let failing_ids = unique_ids(dataset.records().iter().filter(|r| !r.is_declared_ok()));

    // One representative per identifier: its first record in the dataset
    let representatives: Vec<_> = failing_ids
        .iter()
        .filter_map(|id| dataset.first_with_id(id))
        .collect();

    let mut per_parameter = Vec::new();
    for parameter in dataset.numeric_measurement_columns() {
        let (range, source) = match ranges.entry(parameter) {
            Some(entry) => (entry.range, entry.source),
            None => match observed_range(dataset, parameter, options.observed_margin) {
                Some(range) => (range, RangeSource::Observed),
                None => continue,
            },
        };

        let failure_count = representatives
            .iter()
            .filter_map(|record| record.field(parameter).and_then(Cell::as_f64))
            .filter(|value| !classify_in(*value, &range).status.is_pass())
            .count();

        per_parameter.push(FailureTally {
            parameter: parameter.to_string(),
            failure_count,
            failure_percentage: round1(percentage(failure_count, failing_ids.len())),
            range,
            source,
        });
    }

    per_parameter.sort_by(|a, b| b.failure_count.cmp(&a.failure_count));

    tracing::info!(
        records = dataset.len(),
        failing = failing_ids.len(),
        parameters = per_parameter.len(),
        "aggregated failures"
    );

    FailureAnalysis {
        total_records: dataset.len(),
        failing_unique: failing_ids.len(),
        per_parameter,
        failing_record_ids: failing_ids.into_iter().map(str::to_string).collect(),
    }
}

/// Range derived from the values observed for `parameter`
///
/// `[min - margin*span, max + margin*span]` over all non-missing values, with
/// the lower bound floored at zero. `None` when the column has no numbers.
pub fn observed_range(dataset: &Dataset, parameter: &str, margin: f64) -> Option<ParameterRange> {
    let (lo, hi) = dataset
        .records()
        .iter()
        .filter_map(|r| r.field(parameter).and_then(Cell::as_f64))
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;

    let pad = (hi - lo) * margin;
    let min = (lo - pad).max(0.0);
    let max = hi + pad;
    Some(ParameterRange::new(min, max, (min + max) / 2.0))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
