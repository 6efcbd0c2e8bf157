//! Record evaluation - every known parameter of one record against its range

use serde::Serialize;

use crate::core::classify::{classify, classify_in, Status};
use crate::core::dataset::{Dataset, Record};
use crate::core::ranges::RangeMap;
use crate::core::value::Cell;
use crate::schema::{columns, ParameterGroups};

/// Verdict for one (record, parameter) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterVerdict {
    pub parameter: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub deviation: f64,
    pub status: Status,
    /// Display group of the parameter
    pub group: String,
}

/// Why a parameter was left out of a record's verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No range is known for the parameter
    NoRange,
    /// The record has no value for the parameter
    Missing,
    /// The record's value is not a number
    NonNumeric,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoRange => write!(f, "no range"),
            SkipReason::Missing => write!(f, "missing value"),
            SkipReason::NonNumeric => write!(f, "non-numeric value"),
        }
    }
}

/// A parameter excluded from evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub parameter: String,
    pub reason: SkipReason,
}

/// Overall verdict of a record recomputed from its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Pass => write!(f, "PASS"),
            OverallStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of evaluating one record
///
/// `overall_status` is recomputed from the parameters and may disagree with
/// the declared `Quality`; both are reported.
#[derive(Debug, Clone, Serialize)]
pub struct RecordEvaluation {
    pub record_id: String,
    pub declared_quality: String,
    pub declared_ok: bool,
    pub overall_status: OverallStatus,

    /// Verdicts ordered by descending absolute deviation
    pub verdicts: Vec<ParameterVerdict>,

    pub skipped: Vec<Skipped>,

    /// The row's own process parameter against the row's own Min/Max
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_parameter: Option<ParameterVerdict>,
}

impl RecordEvaluation {
    /// Out-of-range verdicts, largest excursion first
    pub fn failures(&self) -> impl Iterator<Item = &ParameterVerdict> {
        self.verdicts.iter().filter(|v| v.status.is_failure())
    }

    /// In-range verdicts
    pub fn passes(&self) -> impl Iterator<Item = &ParameterVerdict> {
        self.verdicts.iter().filter(|v| v.status.is_pass())
    }

    pub fn in_range_count(&self) -> usize {
        self.passes().count()
    }

    pub fn out_of_range_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of parameters with a verdict
    pub fn evaluated_count(&self) -> usize {
        self.verdicts.len()
    }

    /// Share of evaluated parameters that are in range, in percent
    pub fn compliance_rate(&self) -> f64 {
        percentage(self.in_range_count(), self.evaluated_count())
    }
}

/// `part / total * 100`, zero when `total` is zero
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Evaluate a record with the built-in parameter groups
///
/// Only the fixed metadata columns are excluded. Use [`evaluate_record_in`]
/// when the record comes from a dataset with configured metadata columns.
pub fn evaluate_record(record: &Record, ranges: &RangeMap) -> RecordEvaluation {
    evaluate_record_with(record, ranges, &ParameterGroups::builtin(), columns::is_metadata)
}

/// Evaluate a record of `dataset`, skipping the dataset's metadata columns
///
/// The aggregator uses the same column set, so both agree on what counts
/// as a measurement.
pub fn evaluate_record_in(
    dataset: &Dataset,
    record: &Record,
    ranges: &RangeMap,
) -> RecordEvaluation {
    evaluate_record_with(record, ranges, &ParameterGroups::builtin(), |column| {
        columns::is_metadata(column) || dataset.is_metadata_column(column)
    })
}

/// Evaluate every measurement of `record` that has a range in `ranges`
///
/// Measurements are visited in column order. Columns for which
/// `is_metadata` holds are never evaluated.
pub fn evaluate_record_with(
    record: &Record,
    ranges: &RangeMap,
    groups: &ParameterGroups,
    is_metadata: impl Fn(&str) -> bool,
) -> RecordEvaluation {
    let mut verdicts = Vec::new();
    let mut skipped = Vec::new();

    for (parameter, cell) in &record.fields {
        let parameter = parameter.as_str();
        if is_metadata(parameter) {
            continue;
        }

        let Some(range) = ranges.get(parameter) else {
            skipped.push(Skipped {
                parameter: parameter.to_string(),
                reason: SkipReason::NoRange,
            });
            continue;
        };

        let value = match cell {
            Cell::Number(v) => *v,
            Cell::Missing => {
                skipped.push(Skipped {
                    parameter: parameter.to_string(),
                    reason: SkipReason::Missing,
                });
                continue;
            }
            Cell::Text(_) => {
                skipped.push(Skipped {
                    parameter: parameter.to_string(),
                    reason: SkipReason::NonNumeric,
                });
                continue;
            }
        };

        let c = classify_in(value, range);
        verdicts.push(ParameterVerdict {
            parameter: parameter.to_string(),
            value,
            min: range.min,
            max: range.max,
            deviation: c.deviation,
            status: c.status,
            group: groups.group_of(parameter).to_string(),
        });
    }

    // Stable: equal deviations keep column order, so PASS entries stay in
    // dataset order after every failure.
    verdicts.sort_by(|a, b| b.deviation.abs().total_cmp(&a.deviation.abs()));

    let overall_status = if verdicts.iter().any(|v| v.status.is_failure()) {
        OverallStatus::Fail
    } else {
        OverallStatus::Pass
    };

    tracing::debug!(
        record = record.id(),
        evaluated = verdicts.len(),
        skipped = skipped.len(),
        %overall_status,
        "evaluated record"
    );

    RecordEvaluation {
        record_id: record.id().to_string(),
        declared_quality: record.quality.trim().to_string(),
        declared_ok: record.is_declared_ok(),
        overall_status,
        verdicts,
        skipped,
        process_parameter: process_parameter_verdict(record, groups),
    }
}

/// The row's own process parameter, classified against the row's Min/Max
fn process_parameter_verdict(record: &Record, groups: &ParameterGroups) -> Option<ParameterVerdict> {
    let parameter = record.process_parameter.as_deref()?.trim();
    let value = record.field(parameter)?.as_f64()?;
    let min = record.min.as_f64()?;
    let max = record.max.as_f64()?;

    let c = classify(value, min, max);
    Some(ParameterVerdict {
        parameter: parameter.to_string(),
        value,
        min: min.min(max),
        max: max.max(min),
        deviation: c.deviation,
        status: c.status,
        group: groups.group_of(parameter).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ranges::{ParameterRange, RangeSource};

    fn ranges(entries: &[(&str, f64, f64)]) -> RangeMap {
        let mut map = RangeMap::new();
        for (name, min, max) in entries {
            map.insert_if_absent(
                *name,
                ParameterRange::new(*min, *max, (min + max) / 2.0),
                RangeSource::Dataset,
            );
        }
        map
    }

    fn record(quality: &str) -> Record {
        Record {
            track: "1001".to_string(),
            quality: quality.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_failures_sorted_before_passes() {
        let rec = record("OK").with_field("A", 5.0).with_field("B", 50.0);
        let eval = evaluate_record(&rec, &ranges(&[("A", 0.0, 10.0), ("B", 0.0, 10.0)]));

        assert_eq!(eval.overall_status, OverallStatus::Fail);
        assert_eq!(eval.verdicts[0].parameter, "B");
        assert_eq!(eval.verdicts[0].deviation, 40.0);
        assert_eq!(eval.verdicts[0].status, Status::FailHigh);
        assert_eq!(eval.verdicts[1].parameter, "A");
        assert_eq!(eval.verdicts[1].status, Status::Pass);
        // Declared grade is reported, not reconciled
        assert!(eval.declared_ok);
    }

    #[test]
    fn test_failures_ordered_by_absolute_deviation() {
        let rec = record("NOT OK")
            .with_field("A", -3.0)
            .with_field("B", 12.0)
            .with_field("C", -20.0);
        let eval = evaluate_record(
            &rec,
            &ranges(&[("A", 0.0, 10.0), ("B", 0.0, 10.0), ("C", 0.0, 10.0)]),
        );

        let order: Vec<&str> = eval.failures().map(|v| v.parameter.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(eval.verdicts[0].status, Status::FailLow);
    }

    #[test]
    fn test_all_in_range_passes_regardless_of_declared_quality() {
        let rec = record("NOT OK").with_field("A", 5.0);
        let eval = evaluate_record(&rec, &ranges(&[("A", 0.0, 10.0)]));

        assert_eq!(eval.overall_status, OverallStatus::Pass);
        assert!(!eval.declared_ok);
        assert_eq!(eval.declared_quality, "NOT OK");
    }

    #[test]
    fn test_skipped_parameters_are_reported_not_failed() {
        let rec = record("OK")
            .with_field("A", 5.0)
            .with_field("NO_RANGE", 1000.0)
            .with_field("EMPTY", Cell::Missing)
            .with_field("TEXT", Cell::Text("n.m.".to_string()));
        let eval = evaluate_record(
            &rec,
            &ranges(&[("A", 0.0, 10.0), ("EMPTY", 0.0, 1.0), ("TEXT", 0.0, 1.0)]),
        );

        assert_eq!(eval.evaluated_count(), 1);
        assert_eq!(eval.overall_status, OverallStatus::Pass);
        assert_eq!(
            eval.skipped,
            vec![
                Skipped {
                    parameter: "NO_RANGE".to_string(),
                    reason: SkipReason::NoRange
                },
                Skipped {
                    parameter: "EMPTY".to_string(),
                    reason: SkipReason::Missing
                },
                Skipped {
                    parameter: "TEXT".to_string(),
                    reason: SkipReason::NonNumeric
                },
            ]
        );
    }

    #[test]
    fn test_configured_metadata_columns_are_not_evaluated() {
        let csv = "\
Track,Quality,Process_Parameters,Min,Max,Average,GRADE_NAME,LINE,CALIPER
1,OK,CALIPER,250,300,275,Duplex,3,260
2,OK,LINE,0,1,0.5,Triplex,4,270
";
        let ds = Dataset::from_reader(csv.as_bytes(), &["GRADE_NAME", "LINE"]).unwrap();
        let ranges = crate::core::ranges::resolve_ranges(&ds);
        assert!(ranges.get("LINE").is_some());

        let eval = evaluate_record_in(&ds, &ds.records()[0], &ranges);
        let evaluated: Vec<&str> = eval.verdicts.iter().map(|v| v.parameter.as_str()).collect();
        assert_eq!(evaluated, vec!["CALIPER"]);
        assert!(eval.skipped.is_empty());

        // Without the dataset only the fixed metadata columns are excluded
        let eval = evaluate_record(&ds.records()[0], &ranges);
        assert!(eval.verdicts.iter().any(|v| v.parameter == "LINE"));
        assert!(eval.skipped.iter().any(|s| s.parameter == "GRADE_NAME"));
    }

    #[test]
    fn test_metadata_columns_are_not_evaluated() {
        let rec = record("OK").with_field("M_C", 7.0);
        let eval = evaluate_record(&rec, &ranges(&[("M_C", 0.0, 1.0)]));
        assert!(eval.verdicts.is_empty());
        assert!(eval.skipped.is_empty());
    }

    #[test]
    fn test_verdict_carries_group() {
        let rec = record("OK").with_field("CALIPER", 260.0).with_field("X", 1.0);
        let eval = evaluate_record(
            &rec,
            &ranges(&[("CALIPER", 250.0, 300.0), ("X", 0.0, 2.0)]),
        );
        assert_eq!(eval.verdicts[0].group, "Physical Properties");
        assert_eq!(eval.verdicts[1].group, "Other");
    }

    #[test]
    fn test_counts_and_compliance_rate() {
        let rec = record("OK")
            .with_field("A", 1.0)
            .with_field("B", 2.0)
            .with_field("C", 30.0)
            .with_field("D", 4.0);
        let eval = evaluate_record(
            &rec,
            &ranges(&[("A", 0.0, 10.0), ("B", 0.0, 10.0), ("C", 0.0, 10.0), ("D", 0.0, 10.0)]),
        );
        assert_eq!(eval.in_range_count(), 3);
        assert_eq!(eval.out_of_range_count(), 1);
        assert_eq!(eval.compliance_rate(), 75.0);
    }

    #[test]
    fn test_percentage_of_empty_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn test_process_parameter_verdict_uses_row_range() {
        let mut rec = record("OK").with_field("CALIPER", 320.0);
        rec.process_parameter = Some("CALIPER".to_string());
        rec.min = Cell::Number(300.0);
        rec.max = Cell::Number(250.0);

        let eval = evaluate_record(&rec, &RangeMap::new());
        let pp = eval.process_parameter.unwrap();
        assert_eq!(pp.parameter, "CALIPER");
        assert_eq!((pp.min, pp.max), (250.0, 300.0));
        assert_eq!(pp.status, Status::FailHigh);
        assert_eq!(pp.deviation, 20.0);
    }

    #[test]
    fn test_no_process_parameter_without_value() {
        let mut rec = record("OK");
        rec.process_parameter = Some("CALIPER".to_string());
        rec.min = Cell::Number(1.0);
        rec.max = Cell::Number(2.0);
        assert!(evaluate_record(&rec, &RangeMap::new())
            .process_parameter
            .is_none());
    }
}
