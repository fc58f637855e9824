//! Bankroll chart export.
//!
//! Renders the per-spin bankroll trajectory as a self-contained SVG line
//! chart and writes it to a caller-supplied path. SVG needs no renderer
//! beyond a browser, which keeps the export layer free of heavyweight
//! plotting machinery.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 480.0;
const MARGIN: f64 = 48.0;

/// Map `value` from `[lo, hi]` into `[out_lo, out_hi]`.
fn scale(value: f64, lo: f64, hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    if hi == lo {
        return (out_lo + out_hi) / 2.0;
    }
    out_lo + (value - lo) / (hi - lo) * (out_hi - out_lo)
}

/// Render the bankroll history as an SVG document.
///
/// The vertical range always includes zero so the break-even line stays
/// visible; an empty history renders the frame alone.
pub fn render_svg(history: &[f64]) -> String {
    let lo = history.iter().copied().fold(0.0_f64, f64::min);
    let hi = history.iter().copied().fold(0.0_f64, f64::max);

    let x0 = MARGIN;
    let x1 = WIDTH - MARGIN;
    let y0 = HEIGHT - MARGIN; // SVG y grows downward; y0 is the bottom
    let y1 = MARGIN;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    );

    // Axes
    let _ = writeln!(
        svg,
        r#"  <line x1="{x0}" y1="{y1}" x2="{x0}" y2="{y0}" stroke="black" stroke-width="1"/>"#
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{x0}" y1="{y0}" x2="{x1}" y2="{y0}" stroke="black" stroke-width="1"/>"#
    );

    // Break-even line
    let zero_y = scale(0.0, lo, hi, y0, y1);
    let _ = writeln!(
        svg,
        r##"  <line x1="{x0}" y1="{zero_y}" x2="{x1}" y2="{zero_y}" stroke="#999" stroke-width="1" stroke-dasharray="4 4"/>"##
    );

    // Range labels
    let _ = writeln!(
        svg,
        r#"  <text x="4" y="{y1}" font-family="monospace" font-size="12">{hi:.0}</text>"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="4" y="{y0}" font-family="monospace" font-size="12">{lo:.0}</text>"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{x1}" y="{}" font-family="monospace" font-size="12" text-anchor="end">{} spins</text>"#,
        y0 + 16.0,
        history.len()
    );

    if !history.is_empty() {
        let last_index = (history.len() - 1).max(1) as f64;
        let mut points = String::new();
        for (i, bankroll) in history.iter().enumerate() {
            let x = scale(i as f64, 0.0, last_index, x0, x1);
            let y = scale(*bankroll, lo, hi, y0, y1);
            let _ = write!(points, "{x:.1},{y:.1} ");
        }
        let _ = writeln!(
            svg,
            r##"  <polyline points="{}" fill="none" stroke="#1f6fb2" stroke-width="1.5"/>"##,
            points.trim_end()
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render and write the chart to `path`.
pub fn save(history: &[f64], path: &Path) -> Result<()> {
    let svg = render_svg(history);
    std::fs::write(path, &svg)
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;
    debug!(path = %path.display(), points = history.len(), "Chart saved");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
