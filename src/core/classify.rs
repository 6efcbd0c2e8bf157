//! Status classification of a single reading against a range
//!
//! [`classify`] is the only comparison primitive in the crate. The record
//! evaluator, the population aggregator and the comparison selector all call
//! it, so every view agrees on what PASS means.

use serde::{Deserialize, Serialize};

use crate::core::ranges::ParameterRange;
use crate::core::value::Numeric;

/// Verdict of one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Within range (inclusive)
    Pass,
    /// Below the minimum
    FailLow,
    /// Above the maximum
    FailHigh,
    /// Value or bounds could not be coerced to numbers
    Invalid,
}

impl Status {
    pub fn is_pass(&self) -> bool {
        matches!(self, Status::Pass)
    }

    /// FAIL_LOW or FAIL_HIGH
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::FailLow | Status::FailHigh)
    }

    /// Short direction label used in failure listings
    pub fn direction(&self) -> &'static str {
        match self {
            Status::Pass => "OK",
            Status::FailLow => "LOW",
            Status::FailHigh => "HIGH",
            Status::Invalid => "INVALID",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::FailLow => write!(f, "FAIL_LOW"),
            Status::FailHigh => write!(f, "FAIL_HIGH"),
            Status::Invalid => write!(f, "INVALID"),
        }
    }
}

/// Status plus signed deviation from the nearest range boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub status: Status,
    /// Negative for FAIL_LOW, positive for FAIL_HIGH, zero otherwise
    pub deviation: f64,
}

impl Classification {
    const fn new(status: Status, deviation: f64) -> Self {
        Self { status, deviation }
    }

    pub const INVALID: Classification = Classification::new(Status::Invalid, 0.0);
    pub const PASS: Classification = Classification::new(Status::Pass, 0.0);
}

/// Classify `value` against `[min, max]`
///
/// All three inputs are coerced to `f64`; if any of them fails, the result
/// is `(INVALID, 0.0)`. Transposed bounds are swapped before comparing.
pub fn classify(value: impl Numeric, min: impl Numeric, max: impl Numeric) -> Classification {
    let (Some(value), Some(mut min), Some(mut max)) = (value.to_f64(), min.to_f64(), max.to_f64())
    else {
        return Classification::INVALID;
    };

    if min > max {
        std::mem::swap(&mut min, &mut max);
    }

    if min <= value && value <= max {
        Classification::PASS
    } else if value < min {
        Classification::new(Status::FailLow, value - min)
    } else {
        Classification::new(Status::FailHigh, value - max)
    }
}

/// Classify `value` against a resolved range
pub fn classify_in(value: impl Numeric, range: &ParameterRange) -> Classification {
    classify(value, range.min, range.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Cell;

    #[test]
    fn test_classify_scenarios() {
        assert_eq!(
            classify(25.0, 10.0, 20.0),
            Classification {
                status: Status::FailHigh,
                deviation: 5.0
            }
        );
        assert_eq!(
            classify(5.0, 10.0, 20.0),
            Classification {
                status: Status::FailLow,
                deviation: -5.0
            }
        );
        // Swapped bounds
        assert_eq!(classify(15.0, 20.0, 10.0), Classification::PASS);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(classify(10.0, 10.0, 20.0), Classification::PASS);
        assert_eq!(classify(20.0, 10.0, 20.0), Classification::PASS);
        assert_eq!(classify(7.0, 7.0, 7.0), Classification::PASS);
    }

    #[test]
    fn test_in_range_grid_always_passes() {
        for (min, max) in [(0.0, 1.0), (-5.0, 5.0), (250.0, 300.0), (1e-6, 2e-6)] {
            for step in 0..=10 {
                let value = min + (max - min) * f64::from(step) / 10.0;
                assert_eq!(
                    classify(value, min, max),
                    Classification::PASS,
                    "value {} in [{}, {}]",
                    value,
                    min,
                    max
                );
            }
        }
    }

    #[test]
    fn test_swap_is_order_independent() {
        for value in [-10.0, 0.0, 12.5, 15.0, 20.0, 99.0] {
            assert_eq!(classify(value, 20.0, 10.0), classify(value, 10.0, 20.0));
        }
    }

    #[test]
    fn test_non_numeric_inputs_are_invalid() {
        assert_eq!(classify("abc", 1.0, 2.0), Classification::INVALID);
        assert_eq!(classify(1.5, "low", 2.0), Classification::INVALID);
        assert_eq!(classify(1.5, 1.0, Cell::Missing), Classification::INVALID);
        assert_eq!(classify(f64::NAN, 1.0, 2.0), Classification::INVALID);
        assert_eq!(classify(None::<f64>, 1.0, 2.0), Classification::INVALID);
    }

    #[test]
    fn test_text_inputs_are_coerced() {
        assert_eq!(classify("15", "10", "20"), Classification::PASS);
        assert_eq!(classify(" 25 ", "10", "20").status, Status::FailHigh);
    }

    #[test]
    fn test_deviation_sign_matches_status() {
        for value in [-100.0, 0.0, 9.999, 10.0, 15.0, 20.0, 20.001, 1e9] {
            let c = classify(value, 10.0, 20.0);
            match c.status {
                Status::FailLow => assert!(c.deviation < 0.0),
                Status::FailHigh => assert!(c.deviation > 0.0),
                Status::Pass => assert_eq!(c.deviation, 0.0),
                Status::Invalid => panic!("unexpected INVALID for {}", value),
            }
        }
    }

    #[test]
    fn test_classify_in_range() {
        let range = ParameterRange::new(0.0, 10.0, 5.0);
        assert_eq!(classify_in(50.0, &range).deviation, 40.0);
    }

    #[test]
    fn test_status_display_and_serde() {
        assert_eq!(Status::FailLow.to_string(), "FAIL_LOW");
        assert_eq!(
            serde_json::to_string(&Status::FailHigh).unwrap(),
            "\"FAIL_HIGH\""
        );
        assert!(Status::FailHigh.is_failure());
        assert!(!Status::Invalid.is_failure());
        assert!(!Status::Invalid.is_pass());
    }
}
