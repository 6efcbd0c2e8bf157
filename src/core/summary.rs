//! Dataset summary statistics

use serde::Serialize;

use crate::core::dataset::Dataset;
use crate::core::evaluate::percentage;
use crate::core::ranges::{RangeMap, RangeSource};

/// Headline numbers of a loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub unique_ids: usize,
    pub ok_records: usize,
    pub not_ok_records: usize,

    /// Share of records declared OK, in percent
    pub compliance_rate: f64,

    pub dataset_ranges: usize,
    pub fallback_ranges: usize,
    pub measurement_columns: usize,

    /// Distinct parameters named by range rows, in first-seen order
    pub process_parameters: Vec<String>,
}

/// Summarize a dataset and its resolved ranges
pub fn summarize(dataset: &Dataset, ranges: &RangeMap) -> DatasetSummary {
    let ok_records = dataset
        .records()
        .iter()
        .filter(|r| r.is_declared_ok())
        .count();

    let mut process_parameters: Vec<String> = Vec::new();
    for parameter in dataset
        .records()
        .iter()
        .filter_map(|r| r.process_parameter.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        if !process_parameters.iter().any(|p| p == parameter) {
            process_parameters.push(parameter.to_string());
        }
    }

    DatasetSummary {
        total_records: dataset.len(),
        unique_ids: dataset.unique_ids().len(),
        ok_records,
        not_ok_records: dataset.len() - ok_records,
        compliance_rate: percentage(ok_records, dataset.len()),
        dataset_ranges: ranges.count_from(RangeSource::Dataset),
        fallback_ranges: ranges.count_from(RangeSource::Fallback),
        measurement_columns: dataset.numeric_measurement_columns().count(),
        process_parameters,
    }
}
