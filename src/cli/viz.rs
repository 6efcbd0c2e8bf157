//! Terminal visualization using braille graphics
//!
//! Renders value distributions as braille histograms with a marker axis for
//! the acceptable range and a highlighted identifier.

use drawille::Canvas;

use crate::cli::helpers::format_value;
use crate::core::compare::HistogramBin;
use crate::core::ranges::ParameterRange;

/// Default canvas size for histograms, in braille pixels (2x4 per char)
pub const HIST_WIDTH: u32 = 80;
pub const HIST_HEIGHT: u32 = 32;

/// Render histogram bars with braille graphics
///
/// Bars are scaled so the fullest bin reaches the top of the canvas. A bin
/// with any values is at least one pixel tall.
///
/// # Example Output
/// ```text
/// ⠀⠀⠀⠀⣿⣿⡇⠀⠀⠀
/// ⠀⠀⣿⡇⣿⣿⡇⣿⡇⠀
/// ⣀⣀⣿⣇⣿⣿⣇⣿⣇⣀
/// ```
pub fn render_histogram(bins: &[HistogramBin], width: u32, height: u32) -> String {
    if bins.is_empty() {
        return "  (no values)".to_string();
    }

    let height = height.max(4);
    let bin_px = (width / bins.len() as u32).max(2);
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let mut canvas = Canvas::new(bin_px * bins.len() as u32, height);

    for (i, bin) in bins.iter().enumerate() {
        let mut bar = (bin.count as f64 / max_count as f64 * f64::from(height - 1)).round() as u32;
        if bin.count > 0 && bar == 0 {
            bar = 1;
        }

        // Leave a one pixel gap between bars
        let x0 = i as u32 * bin_px;
        for x in x0..x0 + bin_px - 1 {
            for y in 0..bar {
                canvas.set(x, height - 1 - y);
            }
        }
    }

    // Baseline
    for x in 0..bin_px * bins.len() as u32 {
        canvas.set(x, height - 1);
    }

    canvas.frame()
}

/// Render an axis under a histogram spanning `[lower, upper]`
///
/// Range bounds are marked with `│` and the highlighted value with `▲`.
/// Markers outside the axis span are left out.
///
/// # Example Output
/// ```text
/// ────│───────▲──────│────
/// 240                  320
/// ```
pub fn render_marker_axis(
    lower: f64,
    upper: f64,
    range: Option<&ParameterRange>,
    highlight: Option<f64>,
    cols: usize,
) -> String {
    let cols = cols.max(2);
    let span = upper - lower;
    let position = |v: f64| -> Option<usize> {
        if v < lower || v > upper {
            return None;
        }
        if span <= 0.0 {
            return Some(0);
        }
        Some((((v - lower) / span) * (cols - 1) as f64).round() as usize)
    };

    let mut axis: Vec<char> = vec!['─'; cols];
    if let Some(range) = range {
        for bound in [range.min, range.max] {
            if let Some(p) = position(bound) {
                axis[p] = '│';
            }
        }
    }
    if let Some(p) = highlight.and_then(position) {
        axis[p] = '▲';
    }

    let left = format_value(lower);
    let right = format_value(upper);
    let gap = cols.saturating_sub(left.chars().count() + right.chars().count()).max(1);

    format!(
        "{}\n{}{}{}",
        axis.into_iter().collect::<String>(),
        left,
        " ".repeat(gap),
        right
    )
}
