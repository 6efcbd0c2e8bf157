//! Cell values and numeric coercion
//!
//! Dataset values are coerced once, when a dataset is ingested. Everything
//! downstream works with [`Cell`] and the [`Numeric`] trait instead of
//! re-parsing text.

use serde::{Deserialize, Serialize};

/// Tokens that denote a missing value in source data
const MISSING_TOKENS: &[&str] = &["nan", "na", "n/a", "null", "none", "-"];

/// A single coerced dataset value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[derive(Default)]
pub enum Cell {
    /// Finite floating point number
    Number(f64),
    /// Non-numeric text
    Text(String),
    /// Empty or explicitly missing value
    #[default]
    Missing,
}

impl Cell {
    /// Coerce raw text into a cell
    ///
    /// Surrounding whitespace is ignored. Non-finite numbers (`inf`, `NaN`)
    /// are treated as missing.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }

        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            Ok(_) => Cell::Missing,
            Err(_) => {
                let lower = trimmed.to_ascii_lowercase();
                if MISSING_TOKENS.contains(&lower.as_str()) {
                    Cell::Missing
                } else {
                    Cell::Text(trimmed.to_string())
                }
            }
        }
    }

    /// Numeric value, if this cell is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value, if this cell is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Missing => Ok(()),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Cell::Number(v)
        } else {
            Cell::Missing
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::parse(s)
    }
}

/// Anything that can be coerced to a finite `f64`
///
/// Coercion failure is `None`, never a panic.
pub trait Numeric {
    fn to_f64(&self) -> Option<f64>;
}

impl Numeric for f64 {
    fn to_f64(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl Numeric for f32 {
    fn to_f64(&self) -> Option<f64> {
        f64::from(*self).to_f64()
    }
}

impl Numeric for i64 {
    fn to_f64(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl Numeric for i32 {
    fn to_f64(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl Numeric for str {
    fn to_f64(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok().and_then(|v| v.to_f64())
    }
}

impl Numeric for String {
    fn to_f64(&self) -> Option<f64> {
        self.as_str().to_f64()
    }
}

impl Numeric for Cell {
    fn to_f64(&self) -> Option<f64> {
        self.as_f64()
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn to_f64(&self) -> Option<f64> {
        self.as_ref().and_then(Numeric::to_f64)
    }
}

impl<T: Numeric + ?Sized> Numeric for &T {
    fn to_f64(&self) -> Option<f64> {
        (**self).to_f64()
    }
}
