//! Range resolution - acceptable [min, max, target] per parameter
//!
//! Ranges come from three places, in order of precedence:
//!
//! 1. Range rows in the dataset (`Process_Parameters` + `Min`/`Max`/`Average`),
//!    first occurrence wins.
//! 2. A fallback table of domain defaults for well-known parameters.
//! 3. (Aggregator only) an observed range derived from the data itself,
//!    see [`crate::core::aggregate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::dataset::Dataset;
use crate::core::value::Numeric;

/// Acceptable range of a parameter
///
/// Invariant: `min <= max`. Constructors swap transposed bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    /// Target (average) value
    pub avg: f64,
}

impl ParameterRange {
    /// Create a range, swapping `min` and `max` if they are transposed
    pub fn new(min: f64, max: f64, avg: f64) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Self { min, max, avg }
    }

    /// Coerce all three values; `None` if any of them is not numeric
    pub fn coerce(min: impl Numeric, max: impl Numeric, avg: impl Numeric) -> Option<Self> {
        Some(Self::new(min.to_f64()?, max.to_f64()?, avg.to_f64()?))
    }

    /// Width of the range
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Where a resolved range came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeSource {
    /// A range row in the dataset
    Dataset,
    /// Domain default from the fallback table
    Fallback,
    /// Derived from the observed value distribution
    Observed,
}

impl std::fmt::Display for RangeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeSource::Dataset => write!(f, "dataset"),
            RangeSource::Fallback => write!(f, "fallback"),
            RangeSource::Observed => write!(f, "observed"),
        }
    }
}

/// A resolved range together with its source
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeEntry {
    #[serde(flatten)]
    pub range: ParameterRange,
    pub source: RangeSource,
}

/// Domain-default ranges for well-known parameters
const BUILTIN_FALLBACKS: &[(&str, ParameterRange)] = &[
    (
        "CALIPER",
        ParameterRange {
            min: 250.0,
            max: 300.0,
            avg: 275.0,
        },
    ),
    (
        "BULK",
        ParameterRange {
            min: 250.0,
            max: 350.0,
            avg: 300.0,
        },
    ),
    (
        "MOISTURE",
        ParameterRange {
            min: 200.0,
            max: 280.0,
            avg: 240.0,
        },
    ),
];

/// Ordered table of fallback ranges
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackTable {
    entries: Vec<(String, ParameterRange)>,
}

impl FallbackTable {
    /// The built-in domain defaults
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_FALLBACKS
                .iter()
                .map(|(name, range)| (name.to_string(), *range))
                .collect(),
        }
    }

    /// A table with no fallbacks at all
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace a fallback entry
    pub fn with(mut self, name: impl Into<String>, range: ParameterRange) -> Self {
        let name = name.into();
        let range = ParameterRange::new(range.min, range.max, range.avg);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = range,
            None => self.entries.push((name, range)),
        }
        self
    }

    /// Built-in defaults extended (and overridden) by configured entries
    pub fn builtin_with<'a>(
        extra: impl IntoIterator<Item = (&'a String, &'a ParameterRange)>,
    ) -> Self {
        extra
            .into_iter()
            .fold(Self::builtin(), |table, (name, range)| {
                table.with(name.clone(), *range)
            })
    }

    pub fn get(&self, name: &str) -> Option<&ParameterRange> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterRange)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Authoritative mapping from parameter name to its acceptable range
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RangeMap {
    entries: BTreeMap<String, RangeEntry>,
}

impl RangeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert only if the parameter has no range yet
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert_if_absent(
        &mut self,
        parameter: impl Into<String>,
        range: ParameterRange,
        source: RangeSource,
    ) -> bool {
        let parameter = parameter.into();
        if self.entries.contains_key(&parameter) {
            return false;
        }
        self.entries.insert(parameter, RangeEntry { range, source });
        true
    }

    pub fn get(&self, parameter: &str) -> Option<&ParameterRange> {
        self.entries.get(parameter).map(|e| &e.range)
    }

    pub fn entry(&self, parameter: &str) -> Option<&RangeEntry> {
        self.entries.get(parameter)
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.entries.contains_key(parameter)
    }

    /// Entries sorted by parameter name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RangeEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries from the given source
    pub fn count_from(&self, source: RangeSource) -> usize {
        self.entries.values().filter(|e| e.source == source).count()
    }
}

/// Resolve ranges from the dataset with the built-in fallback table
pub fn resolve_ranges(dataset: &Dataset) -> RangeMap {
    resolve_ranges_with(dataset, &FallbackTable::builtin())
}

/// Resolve ranges from the dataset with an explicit fallback table
pub fn resolve_ranges_with(dataset: &Dataset, fallbacks: &FallbackTable) -> RangeMap {
    let mut ranges = RangeMap::new();

    for (idx, record) in dataset.records().iter().enumerate() {
        let Some(parameter) = record
            .process_parameter
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        else {
            continue;
        };

        if ranges.contains(parameter) {
            continue;
        }

        match ParameterRange::coerce(&record.min, &record.max, &record.average) {
            Some(range) => {
                ranges.insert_if_absent(parameter, range, RangeSource::Dataset);
            }
            None => {
                tracing::debug!(row = idx, parameter, "skipping range row with non-numeric bounds");
            }
        }
    }

    for (parameter, range) in fallbacks.iter() {
        if ranges.insert_if_absent(parameter, *range, RangeSource::Fallback) {
            tracing::debug!(parameter, "using fallback range");
        }
    }

    ranges
}
