//! Renderer-facing chart view.
//!
//! A [`ChartView`] is everything a renderer consumes: the category key, the
//! plotted series with their colors, the Y bound, the chart type and the rows
//! projected onto the selected columns. Both the dashboard and the terminal
//! renderer draw from it.

use serde::Serialize;

use super::palette::Hsl;
use super::{ChartConfig, ChartType, YBound};
use crate::record::{Record, Value};

/// One plotted (non-axis) series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub key: String,
    pub label: String,
    pub color: Hsl,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub chart_type: ChartType,
    /// Column used for the category (X) axis.
    pub category_key: String,
    pub series: Vec<SeriesView>,
    pub y_max: YBound,
    /// Records restricted to the selected columns; absent fields are `null`.
    pub rows: Vec<Record>,
}

/// Project records and configuration into a [`ChartView`].
///
/// `selected_columns` must be the same non-empty list the configuration was
/// built from.
pub fn build_view(
    config: &ChartConfig,
    selected_columns: &[String],
    records: &[Record],
    chart_type: ChartType,
) -> ChartView {
    let category_key = selected_columns.first().cloned().unwrap_or_default();

    let series = selected_columns
        .iter()
        .skip(1)
        .filter_map(|key| {
            config.series.get(key).map(|s| SeriesView {
                key: key.clone(),
                label: s.label.clone(),
                color: s.color,
            })
        })
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            selected_columns
                .iter()
                .map(|key| (key.clone(), record.get(key).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .collect();

    ChartView {
        chart_type,
        category_key,
        series,
        y_max: config.y_max,
        rows,
    }
}

impl ChartView {
    /// Category label of row `index`.
    pub fn category(&self, index: usize) -> String {
        self.rows
            .get(index)
            .and_then(|row| row.get(&self.category_key))
            .map(|v| match v {
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .unwrap_or_default()
    }

    /// Plotted value of `series_key` at row `index`, if numeric.
    pub fn value(&self, index: usize, series_key: &str) -> Option<f64> {
        self.rows.get(index)?.get(series_key)?.as_f64()
    }

    /// Upper end of the Y domain: the fixed bound, or the largest plotted
    /// value when the bound is automatic or not positive. The domain always
    /// starts at 0.
    pub fn y_upper(&self) -> f64 {
        match self.y_max {
            YBound::Fixed(v) if v > 0.0 => v,
            _ => (0..self.rows.len())
                .flat_map(|i| self.series.iter().filter_map(move |s| self.value(i, &s.key)))
                .fold(0.0, f64::max),
        }
    }

    /// Tooltip for the category at row `index`.
    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        let row = self.rows.get(index)?;
        let entries = self
            .series
            .iter()
            .map(|s| TooltipEntry {
                name: s.label.clone(),
                color: s.color,
                value: format_tooltip_value(row.get(&s.key).unwrap_or(&Value::Null)),
            })
            .collect();

        Some(Tooltip {
            title: self.category(index),
            entries,
        })
    }
}

/// Hover tooltip for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub entries: Vec<TooltipEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipEntry {
    pub name: String,
    pub color: Hsl,
    pub value: String,
}

/// Tooltip text for a value: whole-number ceiling, or `N/A`.
///
/// Ceiling is applied again even though fetch may already have rounded the
/// column, since unselected-at-fetch columns arrive raw.
pub fn format_tooltip_value(value: &Value) -> String {
    match value.as_f64() {
        Some(n) => format_tick(n),
        None => "N/A".to_string(),
    }
}

/// Axis tick label: the value rounded up to a whole number.
pub fn format_tick(value: f64) -> String {
    let n = value.ceil();
    if n == 0.0 {
        // avoid "-0"
        "0".to_string()
    } else {
        format!("{n:.0}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartOptions, configure};

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn rows() -> Vec<Record> {
        let mut luke = Record::new();
        luke.insert("name".into(), Value::Text("Luke".into()));
        luke.insert("height".into(), Value::Number(172.0));
        luke.insert("mass".into(), Value::Number(77.3));
        let mut leia = Record::new();
        leia.insert("name".into(), Value::Text("Leia".into()));
        leia.insert("height".into(), Value::Text("150".into()));
        vec![luke, leia]
    }

    fn view(selected: &[&str]) -> ChartView {
        let selected = cols(selected);
        let records = rows();
        let config = configure(&selected, &records, &ChartOptions::default()).unwrap();
        build_view(&config, &selected, &records, ChartType::Bar)
    }

    #[test]
    fn first_column_is_category_not_series() {
        let v = view(&["name", "height", "mass"]);
        assert_eq!(v.category_key, "name");
        let keys: Vec<&str> = v.series.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["height", "mass"]);
    }

    #[test]
    fn rows_are_projected_to_selection() {
        let v = view(&["name", "mass"]);
        assert_eq!(v.rows[0].len(), 2);
        assert_eq!(v.rows[1]["mass"], Value::Null);
        assert!(!v.rows[0].contains_key("height"));
    }

    #[test]
    fn tooltip_ceils_every_series() {
        let v = view(&["name", "height", "mass"]);
        let tip = v.tooltip(0).unwrap();
        assert_eq!(tip.title, "Luke");
        let values: Vec<&str> = tip.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["172", "78"]);

        let tip = v.tooltip(1).unwrap();
        let values: Vec<&str> = tip.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["150", "N/A"]);

        assert!(v.tooltip(5).is_none());
    }

    #[test]
    fn y_upper_uses_fixed_bound() {
        let v = view(&["name", "height"]);
        assert!((v.y_upper() - 189.2).abs() < 1e-9);
    }

    #[test]
    fn y_upper_ignores_non_positive_fixed_bound() {
        let mut v = view(&["name", "height", "mass"]);
        v.y_max = YBound::Fixed(0.0);
        assert!((v.y_upper() - 172.0).abs() < 1e-9);
    }

    #[test]
    fn y_upper_auto_with_axis_only() {
        let v = view(&["name"]);
        assert_eq!(v.y_max, YBound::Auto);
        assert_eq!(v.y_upper(), 0.0);
    }

    #[test]
    fn format_helpers() {
        assert_eq!(format_tick(188.2), "189");
        assert_eq!(format_tick(-0.4), "0");
        assert_eq!(format_tick(-1.5), "-1");
        assert_eq!(format_tooltip_value(&Value::Bool(true)), "N/A");
        assert_eq!(format_tooltip_value(&Value::Number(3.01)), "4");
    }
}
