//! Core module - dataset model and the inspection engine

pub mod aggregate;
pub mod classify;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod evaluate;
pub mod ranges;
pub mod search;
pub mod summary;
pub mod value;

pub use aggregate::{
    aggregate_failures, aggregate_failures_with, observed_range, AggregateOptions,
    FailureAnalysis, FailureTally,
};
pub use classify::{classify, classify_in, Classification, Status};
pub use compare::{
    select_distribution, ComparisonSelector, Distribution, DistributionPoint, GradeCascade,
    GradeMatchKind, GradeMatcher, HistogramBin, RangeStatus, Selection, ValueStats,
    MAX_HISTOGRAM_BINS,
};
pub use config::Config;
pub use dataset::{Dataset, DatasetError, Record};
pub use evaluate::{
    evaluate_record, evaluate_record_in, evaluate_record_with, OverallStatus, ParameterVerdict,
    RecordEvaluation, SkipReason, Skipped,
};
pub use ranges::{
    resolve_ranges, resolve_ranges_with, FallbackTable, ParameterRange, RangeEntry, RangeMap,
    RangeSource,
};
pub use search::{search, IdentifierKind, SearchResult};
pub use summary::{summarize, DatasetSummary};
pub use value::{Cell, Numeric};
