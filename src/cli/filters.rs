//! Filter enums for CLI commands

use clap::ValueEnum;

use crate::core::ranges::RangeSource;

/// Range source filter for `qid ranges`
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum SourceFilter {
    /// Ranges read from range rows in the dataset
    Dataset,
    /// Built-in or configured fallback ranges
    Fallback,
    /// Every resolved range - default
    #[default]
    All,
}

impl SourceFilter {
    pub fn matches(&self, source: RangeSource) -> bool {
        match self {
            SourceFilter::Dataset => source == RangeSource::Dataset,
            SourceFilter::Fallback => source == RangeSource::Fallback,
            SourceFilter::All => true,
        }
    }
}

impl std::fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFilter::Dataset => write!(f, "dataset"),
            SourceFilter::Fallback => write!(f, "fallback"),
            SourceFilter::All => write!(f, "all"),
        }
    }
}

/// Which verdicts `qid inspect` lists
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum VerdictFilter {
    /// Out-of-range parameters only
    Failures,
    /// In-range parameters only
    Passes,
    /// Everything - default
    #[default]
    All,
}

impl VerdictFilter {
    pub fn show_failures(&self) -> bool {
        matches!(self, VerdictFilter::Failures | VerdictFilter::All)
    }

    pub fn show_passes(&self) -> bool {
        matches!(self, VerdictFilter::Passes | VerdictFilter::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_filter_matches() {
        assert!(SourceFilter::Dataset.matches(RangeSource::Dataset));
        assert!(!SourceFilter::Dataset.matches(RangeSource::Fallback));
        assert!(SourceFilter::Fallback.matches(RangeSource::Fallback));
        assert!(SourceFilter::All.matches(RangeSource::Observed));
    }

    #[test]
    fn test_verdict_filter() {
        assert!(VerdictFilter::All.show_failures());
        assert!(VerdictFilter::All.show_passes());
        assert!(!VerdictFilter::Failures.show_passes());
        assert!(!VerdictFilter::Passes.show_failures());
    }
}
