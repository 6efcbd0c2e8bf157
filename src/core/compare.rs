//! Comparison selection - value distribution of one process parameter
//!
//! Rows are selected by process parameter, grade and machine. Grade labels
//! are not kept consistently in the source data, so grade matching runs an
//! ordered cascade of [`GradeMatcher`] strategies; the first strategy that
//! selects any row wins.

use std::convert::Infallible;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::core::classify::classify_in;
use crate::core::dataset::{unique_ids, Dataset, Record};
use crate::core::evaluate::percentage;
use crate::core::ranges::ParameterRange;
use crate::core::value::Cell;
use crate::schema::columns;

/// "word + number" grade token, e.g. `GC 1`, `GC-1`, `SBS350`
static GRADE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)[\s_-]*(\d+)$").expect("grade token pattern is valid")
});

/// A filter value: everything, or one specific label
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// `all` (any case) or an empty string selects everything
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl FromStr for Selection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selection::parse(s))
    }
}

impl Serialize for Selection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Only(v) => write!(f, "{}", v),
        }
    }
}

/// Which grade matching strategy selected the rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeMatchKind {
    /// Exact match on the canonical grade column
    ExactColumn,
    /// Case-insensitive substring of any text column
    Substring,
    /// Normalized "word + number" token inside comma-separated text
    DelimitedToken,
}

impl std::fmt::Display for GradeMatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeMatchKind::ExactColumn => write!(f, "exact column"),
            GradeMatchKind::Substring => write!(f, "substring"),
            GradeMatchKind::DelimitedToken => write!(f, "delimited token"),
        }
    }
}

/// One grade matching strategy
pub trait GradeMatcher: Send + Sync {
    fn kind(&self) -> GradeMatchKind;

    /// Whether `record` carries `grade` according to this strategy
    fn matches(&self, record: &Record, grade: &str) -> bool;
}

/// Exact (trimmed) match on one column
#[derive(Debug, Clone)]
pub struct ExactColumnMatcher {
    column: String,
}

impl ExactColumnMatcher {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl GradeMatcher for ExactColumnMatcher {
    fn kind(&self) -> GradeMatchKind {
        GradeMatchKind::ExactColumn
    }

    fn matches(&self, record: &Record, grade: &str) -> bool {
        record
            .get(&self.column)
            .is_some_and(|cell| cell_equals(&cell, grade, false))
    }
}

/// Case-insensitive substring match across every text cell
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl GradeMatcher for SubstringMatcher {
    fn kind(&self) -> GradeMatchKind {
        GradeMatchKind::Substring
    }

    fn matches(&self, record: &Record, grade: &str) -> bool {
        let needle = grade.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        text_cells(record).any(|text| text.to_lowercase().contains(&needle))
    }
}

/// "word + number" token match inside comma-separated text
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedTokenMatcher;

impl DelimitedTokenMatcher {
    /// Normalize a grade token to `(WORD, number)`
    pub fn normalize(token: &str) -> Option<(String, String)> {
        let caps = GRADE_TOKEN.captures(token.trim())?;
        let word = caps.get(1)?.as_str().to_uppercase();
        let digits = caps.get(2)?.as_str().trim_start_matches('0');
        let number = if digits.is_empty() { "0" } else { digits };
        Some((word, number.to_string()))
    }
}

impl GradeMatcher for DelimitedTokenMatcher {
    fn kind(&self) -> GradeMatchKind {
        GradeMatchKind::DelimitedToken
    }

    fn matches(&self, record: &Record, grade: &str) -> bool {
        let Some(wanted) = Self::normalize(grade) else {
            return false;
        };
        text_cells(record)
            .flat_map(|text| text.split(','))
            .filter_map(Self::normalize)
            .any(|token| token == wanted)
    }
}

/// Every text cell of a record: identity columns first, then the catch-all
fn text_cells(record: &Record) -> impl Iterator<Item = &str> {
    let fixed = [
        record.track.as_str(),
        record.jumbo_id.as_str(),
        record.kit.as_str(),
        record.quality.as_str(),
        record.process_parameter.as_deref().unwrap_or_default(),
    ];
    fixed
        .into_iter()
        .filter(|text| matches!(Cell::parse(text), Cell::Text(_)))
        .chain(record.fields.iter().filter_map(|(_, cell)| cell.as_text()))
}

/// Compare a cell with a user-supplied label
///
/// Numeric cells compare numerically so `2.50` finds a cell read as `2.5`.
fn cell_equals(cell: &Cell, wanted: &str, ignore_case: bool) -> bool {
    let wanted = wanted.trim();
    match cell {
        Cell::Number(v) => wanted.parse::<f64>().is_ok_and(|w| w == *v),
        Cell::Text(text) if ignore_case => text.eq_ignore_ascii_case(wanted),
        Cell::Text(text) => text == wanted,
        Cell::Missing => false,
    }
}

/// Ordered list of grade matchers; first strategy selecting any row wins
pub struct GradeCascade {
    matchers: Vec<Box<dyn GradeMatcher>>,
}

impl GradeCascade {
    /// Exact column, then substring, then delimited token
    pub fn standard(grade_column: &str) -> Self {
        Self {
            matchers: vec![
                Box::new(ExactColumnMatcher::new(grade_column)),
                Box::new(SubstringMatcher),
                Box::new(DelimitedTokenMatcher),
            ],
        }
    }

    pub fn new(matchers: Vec<Box<dyn GradeMatcher>>) -> Self {
        Self { matchers }
    }

    /// Strategy kinds in the order they are tried
    pub fn kinds(&self) -> Vec<GradeMatchKind> {
        self.matchers.iter().map(|m| m.kind()).collect()
    }

    /// Select the rows carrying `grade`
    ///
    /// Returns the winning strategy and its rows, or `None` if no strategy
    /// matched anything.
    pub fn select<'a>(
        &self,
        rows: &[&'a Record],
        grade: &str,
    ) -> Option<(GradeMatchKind, Vec<&'a Record>)> {
        self.matchers.iter().find_map(|matcher| {
            let selected: Vec<&Record> = rows
                .iter()
                .copied()
                .filter(|r| matcher.matches(r, grade))
                .collect();
            if selected.is_empty() {
                tracing::debug!(grade, strategy = %matcher.kind(), "grade strategy matched nothing");
                None
            } else {
                Some((matcher.kind(), selected))
            }
        })
    }
}

impl std::fmt::Debug for GradeCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradeCascade")
            .field("matchers", &self.kinds())
            .finish()
    }
}

/// Binary range status used in comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStatus {
    Within,
    Outside,
}

impl std::fmt::Display for RangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeStatus::Within => write!(f, "Within Range"),
            RangeStatus::Outside => write!(f, "Outside Range"),
        }
    }
}

/// One identifier's value in a distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPoint {
    pub record_id: String,
    pub value: f64,
    pub status: RangeStatus,
}

/// Summary statistics over distribution values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Upper bound on histogram bins
pub const MAX_HISTOGRAM_BINS: usize = 1_000;

/// One histogram bin, `[lower, upper)` (the last bin includes `upper`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Value distribution of one parameter with its range overlay
#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub parameter: String,
    pub grade: Selection,
    pub machine: Selection,

    /// Strategy that satisfied the grade filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_match: Option<GradeMatchKind>,

    /// Number of rows left after filtering
    pub matched_rows: usize,

    /// Min/Max/target taken from the first matching row
    pub range: Option<ParameterRange>,

    pub values: Vec<DistributionPoint>,
}

impl Distribution {
    fn empty(parameter: &str, grade: &Selection, machine: &Selection) -> Self {
        Self {
            parameter: parameter.to_string(),
            grade: grade.clone(),
            machine: machine.clone(),
            grade_match: None,
            matched_rows: 0,
            range: None,
            values: Vec::new(),
        }
    }

    /// Find one identifier's point, e.g. for highlighting
    pub fn locate(&self, record_id: &str) -> Option<&DistributionPoint> {
        let record_id = record_id.trim();
        self.values.iter().find(|p| p.record_id == record_id)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn within_count(&self) -> usize {
        self.values
            .iter()
            .filter(|p| p.status == RangeStatus::Within)
            .count()
    }

    pub fn outside_count(&self) -> usize {
        self.values.len() - self.within_count()
    }

    /// Share of values within range, in percent
    pub fn compliance_rate(&self) -> f64 {
        percentage(self.within_count(), self.values.len())
    }

    pub fn stats(&self) -> Option<ValueStats> {
        let first = self.values.first()?.value;
        let (min, max, sum) = self
            .values
            .iter()
            .fold((first, first, 0.0), |(lo, hi, sum), p| {
                (lo.min(p.value), hi.max(p.value), sum + p.value)
            });
        Some(ValueStats {
            count: self.values.len(),
            min,
            max,
            mean: sum / self.values.len() as f64,
        })
    }

    /// Equal-width histogram over the value span
    ///
    /// `bins` is clamped to `1..=MAX_HISTOGRAM_BINS`.
    pub fn histogram(&self, bins: usize) -> Vec<HistogramBin> {
        let Some(stats) = self.stats() else {
            return Vec::new();
        };
        let bins = bins.clamp(1, MAX_HISTOGRAM_BINS);
        let span = stats.max - stats.min;
        if span <= 0.0 {
            return vec![HistogramBin {
                lower: stats.min,
                upper: stats.max,
                count: stats.count,
            }];
        }

        let width = span / bins as f64;
        let mut result: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: stats.min + width * i as f64,
                upper: stats.min + width * (i + 1) as f64,
                count: 0,
            })
            .collect();

        for point in &self.values {
            let idx = (((point.value - stats.min) / width) as usize).min(bins - 1);
            result[idx].count += 1;
        }
        result
    }
}

/// Selects filtered value distributions from a dataset
#[derive(Debug)]
pub struct ComparisonSelector {
    grades: GradeCascade,
    machine_column: String,
}

impl ComparisonSelector {
    pub fn new(grade_column: &str, machine_column: &str) -> Self {
        Self {
            grades: GradeCascade::standard(grade_column),
            machine_column: machine_column.to_string(),
        }
    }

    /// Use a custom grade cascade
    pub fn with_grades(mut self, grades: GradeCascade) -> Self {
        self.grades = grades;
        self
    }

    /// Distribution of `parameter` over rows matching the filters
    pub fn select(
        &self,
        dataset: &Dataset,
        parameter: &str,
        grade: &Selection,
        machine: &Selection,
    ) -> Distribution {
        let parameter = parameter.trim();
        let mut distribution = Distribution::empty(parameter, grade, machine);

        let mut rows: Vec<&Record> = dataset
            .records()
            .iter()
            .filter(|r| r.process_parameter.as_deref().map(str::trim) == Some(parameter))
            .collect();

        if let Selection::Only(grade) = grade {
            match self.grades.select(&rows, grade) {
                Some((kind, selected)) => {
                    distribution.grade_match = Some(kind);
                    rows = selected;
                }
                None => rows.clear(),
            }
        }

        if let Selection::Only(machine) = machine {
            rows.retain(|r| {
                r.get(&self.machine_column)
                    .is_some_and(|cell| cell_equals(&cell, machine, true))
            });
        }

        distribution.matched_rows = rows.len();
        let Some(first) = rows.first() else {
            tracing::debug!(parameter, %grade, %machine, "no rows match comparison filters");
            return distribution;
        };

        let Some(range) = ParameterRange::coerce(&first.min, &first.max, &first.average) else {
            tracing::debug!(parameter, record = first.id(), "first matching row has no numeric range");
            return distribution;
        };
        distribution.range = Some(range);

        distribution.values = unique_ids(rows.iter().copied())
            .into_iter()
            .filter_map(|id| {
                let value = lookup_value(dataset, id, parameter)?;
                let status = if classify_in(value, &range).status.is_pass() {
                    RangeStatus::Within
                } else {
                    RangeStatus::Outside
                };
                Some(DistributionPoint {
                    record_id: id.to_string(),
                    value,
                    status,
                })
            })
            .collect();

        distribution
    }
}

impl Default for ComparisonSelector {
    fn default() -> Self {
        Self::new(columns::GRADE, columns::MACHINE)
    }
}

/// First numeric value of `parameter` among the records of identifier `id`
fn lookup_value(dataset: &Dataset, id: &str, parameter: &str) -> Option<f64> {
    dataset
        .records()
        .iter()
        .filter(|r| r.id() == id)
        .find_map(|r| r.field(parameter).and_then(Cell::as_f64))
}

/// Select a distribution with the default grade and machine columns
pub fn select_distribution(
    dataset: &Dataset,
    parameter: &str,
    grade: &Selection,
    machine: &Selection,
) -> Distribution {
    ComparisonSelector::default().select(dataset, parameter, grade, machine)
}
