//! Shared helper functions for CLI commands

use std::io::{self, IsTerminal};

use console::style;

use crate::core::classify::Status;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a measurement without trailing zeros
pub fn format_value(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Signed deviation, e.g. `+5` or `-0.25`
pub fn format_deviation(deviation: f64) -> String {
    if deviation > 0.0 {
        format!("+{}", format_value(deviation))
    } else {
        format_value(deviation)
    }
}

/// `[min, max]`
pub fn format_range(min: f64, max: f64) -> String {
    format!("[{}, {}]", format_value(min), format_value(max))
}

/// Percentage with one decimal
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Status label colored for the terminal
pub fn styled_status(status: Status) -> String {
    match status {
        Status::Pass => style(status.to_string()).green().to_string(),
        Status::FailLow | Status::FailHigh => style(status.to_string()).red().bold().to_string(),
        Status::Invalid => style(status.to_string()).yellow().to_string(),
    }
}

/// Whether both stdin and stdout are attached to a terminal
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ÄÖÜäöü", 5), "ÄÖ...");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(250.0), "250");
        assert_eq!(format_value(6.5), "6.5");
        assert_eq!(format_value(0.12345), "0.123");
        assert_eq!(format_value(-0.0001), "0");
    }

    #[test]
    fn test_format_deviation() {
        assert_eq!(format_deviation(5.0), "+5");
        assert_eq!(format_deviation(-2.5), "-2.5");
        assert_eq!(format_deviation(0.0), "0");
    }

    #[test]
    fn test_format_range_and_percent() {
        assert_eq!(format_range(250.0, 300.0), "[250, 300]");
        assert_eq!(format_percent(71.428), "71.4%");
    }
}
