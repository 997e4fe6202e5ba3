//! Terminal chart renderer for `apichart chart`.
//!
//! Bar charts draw one horizontal bar per (category, series) pair, scaled to
//! the Y domain `[0, y_upper]`. Line charts draw one sparkline row per series
//! across the categories. Series colors are emitted as truecolor escapes.

use colored::Colorize;

use super::view::{ChartView, format_tick};
use super::ChartType;

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a chart view as terminal text, `width` columns wide for the plot
/// area.
pub fn render_terminal(view: &ChartView, width: usize) -> String {
    let mut out = String::new();
    let upper = view.y_upper();

    out.push_str(&legend(view));
    out.push('\n');
    out.push_str(&format!(
        "{} {} to {}\n",
        "y:".dimmed(),
        format_tick(0.0),
        format_tick(upper)
    ));

    if view.series.is_empty() {
        out.push_str(&format!("{}\n", "(select at least two columns to plot)".dimmed()));
        return out;
    }

    match view.chart_type {
        ChartType::Bar => render_bars(view, width, upper, &mut out),
        ChartType::Line => render_lines(view, upper, &mut out),
    }

    out
}

fn legend(view: &ChartView) -> String {
    view.series
        .iter()
        .map(|s| {
            let (r, g, b) = s.color.to_rgb();
            format!("{} {}", "■".truecolor(r, g, b), s.label)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_bars(view: &ChartView, width: usize, upper: f64, out: &mut String) {
    let label_width = (0..view.rows.len())
        .map(|i| view.category(i).chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, 24);

    for i in 0..view.rows.len() {
        let category = truncate(&view.category(i), label_width);
        for (n, series) in view.series.iter().enumerate() {
            let label = if n == 0 { category.as_str() } else { "" };
            let value = view.value(i, &series.key);
            let cells = value.map(|v| bar_cells(v, upper, width)).unwrap_or(0);
            let (r, g, b) = series.color.to_rgb();
            let shown = value.map(format_tick).unwrap_or_else(|| "N/A".to_string());
            out.push_str(&format!(
                "{:<label_width$} │{} {}\n",
                label,
                "█".repeat(cells).truecolor(r, g, b),
                shown.dimmed(),
            ));
        }
    }
}

fn render_lines(view: &ChartView, upper: f64, out: &mut String) {
    let label_width = view
        .series
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0);

    for series in &view.series {
        let line: String = (0..view.rows.len())
            .map(|i| match view.value(i, &series.key) {
                Some(v) => spark(v, upper),
                None => ' ',
            })
            .collect();
        let (r, g, b) = series.color.to_rgb();
        out.push_str(&format!(
            "{:<label_width$} │{}\n",
            series.label,
            line.truecolor(r, g, b)
        ));
    }

    let categories: Vec<String> = (0..view.rows.len()).map(|i| view.category(i)).collect();
    out.push_str(&format!("{}\n", categories.join(", ").dimmed()));
}

/// Number of block cells for `value` on a `[0, upper]` scale.
fn bar_cells(value: f64, upper: f64, width: usize) -> usize {
    if upper <= 0.0 || value <= 0.0 {
        return 0;
    }
    let ratio = (value / upper).min(1.0);
    (ratio * width as f64).round() as usize
}

fn spark(value: f64, upper: f64) -> char {
    if upper <= 0.0 || value <= 0.0 {
        return SPARKS[0];
    }
    let ratio = (value / upper).min(1.0);
    let idx = (ratio * (SPARKS.len() - 1) as f64).round() as usize;
    SPARKS[idx.min(SPARKS.len() - 1)]
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
