/// Chart configuration.
///
/// Given the user's ordered column selection and the current record batch,
/// [`configure`] derives everything a renderer needs beyond the data itself:
///
/// - one [`SeriesConfig`] (label + color) per selected column, in selection
///   order, including the category-axis column
/// - the Y-axis upper bound ([`YBound`])
///
/// The first selected column is always the category (X) axis. Columns from
/// index 1 on are plotted as bars or lines. Only the second column drives
/// the Y bound, even when more series are plotted.
///
/// Nothing here holds state between calls; a configuration is rebuilt on
/// every render.
pub mod palette;
pub mod terminal;
pub mod view;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::config::schema::ChartConfigSection;
use crate::record::Record;

use palette::{Hsl, Palette};

pub use view::{ChartView, Tooltip, TooltipEntry, build_view, format_tick, format_tooltip_value};

/// Default multiplier applied above the rounded-up maximum.
pub const DEFAULT_HEADROOM: f64 = 1.1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Cartesian chart flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
}

impl ChartType {
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            _ => None,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bar => write!(f, "bar"),
            Self::Line => write!(f, "line"),
        }
    }
}

/// Display metadata for one selected column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesConfig {
    pub label: String,
    pub color: Hsl,
}

/// Upper bound of the numeric axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YBound {
    /// Let the renderer pick bounds from the data.
    Auto,
    Fixed(f64),
}

impl YBound {
    pub fn fixed(&self) -> Option<f64> {
        match self {
            Self::Fixed(v) => Some(*v),
            Self::Auto => None,
        }
    }
}

/// Serialized as `"auto"` or as a plain number.
impl Serialize for YBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Fixed(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Output of one configuration pass.
#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    /// Series metadata keyed by column, in selection order.
    pub series: IndexMap<String, SeriesConfig>,
    pub y_max: YBound,
}

/// Knobs for [`configure`], resolved from the `[chart]` config section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub palette: Palette,
    pub headroom: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::from_config(&ChartConfigSection::default())
    }
}

impl ChartOptions {
    pub fn from_config(config: &ChartConfigSection) -> Self {
        Self {
            palette: Palette::from_config(config),
            headroom: config.headroom,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one column must be selected to configure a chart")]
    NoColumns,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Derive per-series display metadata and the Y bound.
///
/// With two or more selected columns the bound is
/// `ceil(max(record[selected[1]])) * headroom`, where missing or non-numeric
/// values count as 0. With a single column, no records, or a bound that is
/// not positive, it is [`YBound::Auto`].
pub fn configure(
    selected_columns: &[String],
    records: &[Record],
    options: &ChartOptions,
) -> Result<ChartConfig, ConfigError> {
    if selected_columns.is_empty() {
        return Err(ConfigError::NoColumns);
    }

    let series = selected_columns
        .iter()
        .map(|column| {
            (
                column.clone(),
                SeriesConfig {
                    label: column.clone(),
                    color: options.palette.color_for(column),
                },
            )
        })
        .collect();

    let y_max = match selected_columns.get(1) {
        Some(metric) => y_bound(metric, records, options.headroom),
        None => YBound::Auto,
    };

    Ok(ChartConfig { series, y_max })
}

/// Rounded-up maximum of `column` across records, scaled by `headroom`.
/// A bound that is not positive becomes [`YBound::Auto`].
fn y_bound(column: &str, records: &[Record], headroom: f64) -> YBound {
    let bound = records
        .iter()
        .map(|record| record.get(column).and_then(|v| v.as_f64()).unwrap_or(0.0))
        .reduce(f64::max)
        .map(|max| max.ceil() * headroom);

    match bound {
        Some(bound) if bound > 0.0 => YBound::Fixed(bound),
        _ => YBound::Auto,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn person(name: &str, height: Value) -> Record {
        let mut r = Record::new();
        r.insert("name".into(), Value::Text(name.into()));
        r.insert("height".into(), height);
        r
    }

    #[test]
    fn requires_a_column() {
        let err = configure(&[], &[], &ChartOptions::default()).unwrap_err();
        assert_eq!(err, ConfigError::NoColumns);
    }

    #[test]
    fn axis_only_selection_is_auto() {
        let records = vec![person("Luke", Value::Number(172.0))];
        let config = configure(&cols(&["name"]), &records, &ChartOptions::default()).unwrap();
        assert_eq!(config.y_max, YBound::Auto);
        assert_eq!(config.series.len(), 1);
    }

    #[test]
    fn bound_comes_from_second_column() {
        let records = vec![
            person("Luke", Value::Number(172.0)),
            person("Leia", Value::Number(150.0)),
        ];
        let config =
            configure(&cols(&["name", "height"]), &records, &ChartOptions::default()).unwrap();
        let bound = config.y_max.fixed().unwrap();
        assert!((bound - 189.2).abs() < 1e-9);
    }

    #[test]
    fn bound_ceils_before_scaling() {
        let records = vec![person("a", Value::Number(99.2))];
        let config =
            configure(&cols(&["name", "height"]), &records, &ChartOptions::default()).unwrap();
        assert!((config.y_max.fixed().unwrap() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn bound_ignores_third_column() {
        let mut r = person("a", Value::Number(10.0));
        r.insert("mass".into(), Value::Number(5000.0));
        let config = configure(
            &cols(&["name", "height", "mass"]),
            &[r],
            &ChartOptions::default(),
        )
        .unwrap();
        assert!((config.y_max.fixed().unwrap() - 11.0).abs() < 1e-9);
        assert_eq!(config.series.len(), 3);
    }

    #[test]
    fn zero_bound_falls_back_to_auto() {
        let records = vec![
            person("a", Value::Text("unknown".into())),
            person("b", Value::Null),
            Record::new(),
        ];
        let config =
            configure(&cols(&["name", "height"]), &records, &ChartOptions::default()).unwrap();
        assert_eq!(config.y_max, YBound::Auto);

        let zeros = vec![person("a", Value::Number(0.0)), person("b", Value::Number(-3.0))];
        let config =
            configure(&cols(&["name", "height"]), &zeros, &ChartOptions::default()).unwrap();
        assert_eq!(config.y_max, YBound::Auto);
    }

    #[test]
    fn non_numeric_metric_leaves_other_series_plottable() {
        let mut luke = person("Luke", Value::Text("unknown".into()));
        luke.insert("mass".into(), Value::Number(77.0));
        let config = configure(
            &cols(&["name", "height", "mass"]),
            &[luke],
            &ChartOptions::default(),
        )
        .unwrap();
        assert_eq!(config.y_max, YBound::Auto);
    }

    #[test]
    fn numeric_text_counts_toward_bound() {
        let records = vec![
            person("Luke", Value::Text("172".into())),
            person("Leia", Value::Text("150".into())),
        ];
        let config =
            configure(&cols(&["name", "height"]), &records, &ChartOptions::default()).unwrap();
        assert!((config.y_max.fixed().unwrap() - 189.2).abs() < 1e-9);
    }

    #[test]
    fn no_records_is_auto() {
        let config = configure(&cols(&["name", "height"]), &[], &ChartOptions::default()).unwrap();
        assert_eq!(config.y_max, YBound::Auto);
    }

    #[test]
    fn series_labels_follow_selection_order() {
        let config = configure(
            &cols(&["name", "mass", "height"]),
            &[],
            &ChartOptions::default(),
        )
        .unwrap();
        let keys: Vec<&str> = config.series.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "mass", "height"]);
        assert_eq!(config.series["mass"].label, "mass");
    }

    #[test]
    fn y_bound_serializes_auto_or_number() {
        assert_eq!(serde_json::to_string(&YBound::Auto).unwrap(), "\"auto\"");
        assert_eq!(serde_json::to_string(&YBound::Fixed(11.0)).unwrap(), "11.0");
    }

    #[test]
    fn chart_type_parse_and_display() {
        assert_eq!(ChartType::parse("BAR"), Some(ChartType::Bar));
        assert_eq!(ChartType::parse("line"), Some(ChartType::Line));
        assert_eq!(ChartType::parse("pie"), None);
        assert_eq!(ChartType::Line.to_string(), "line");
    }
}
