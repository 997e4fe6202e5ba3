/// Chart configurator and renderer tests.
use apichart::chart::palette::{Palette, PaletteKind};
use apichart::chart::terminal::render_terminal;
use apichart::chart::{
    ChartOptions, ChartType, ConfigError, YBound, build_view, configure, format_tooltip_value,
};
use apichart::record::{Record, Value, record_from_json};
use serde_json::json;

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn people() -> Vec<Record> {
    [
        json!({ "name": "Luke", "height": 172, "mass": "77" }),
        json!({ "name": "Leia", "height": 150, "mass": "unknown" }),
    ]
    .iter()
    .map(record_from_json)
    .collect()
}

fn hashed() -> ChartOptions {
    ChartOptions {
        palette: Palette::default().with_kind(PaletteKind::Hashed),
        ..ChartOptions::default()
    }
}

// ---------------------------------------------------------------------------
// configure
// ---------------------------------------------------------------------------

#[test]
fn luke_and_leia_bound() {
    let config = configure(&cols(&["name", "height"]), &people(), &ChartOptions::default()).unwrap();
    let bound = config.y_max.fixed().unwrap();
    assert!((bound - 189.2).abs() < 1e-9);
}

#[test]
fn single_column_is_auto() {
    let config = configure(&cols(&["name"]), &people(), &ChartOptions::default()).unwrap();
    assert_eq!(config.y_max, YBound::Auto);
    assert_eq!(config.series.len(), 1);
}

#[test]
fn no_columns_is_an_error() {
    let err = configure(&[], &people(), &ChartOptions::default()).unwrap_err();
    assert_eq!(err, ConfigError::NoColumns);
}

#[test]
fn non_numeric_values_count_as_zero() {
    // "unknown" counts as 0, so the max is 77.
    let config = configure(&cols(&["name", "mass"]), &people(), &ChartOptions::default()).unwrap();
    let bound = config.y_max.fixed().unwrap();
    assert!((bound - 77.0 * 1.1).abs() < 1e-9);
}

#[test]
fn only_second_column_drives_bound() {
    let config = configure(
        &cols(&["name", "mass", "height"]),
        &people(),
        &ChartOptions::default(),
    )
    .unwrap();
    assert!((config.y_max.fixed().unwrap() - 77.0 * 1.1).abs() < 1e-9);
}

#[test]
fn series_follow_selection_order() {
    let config = configure(&cols(&["mass", "name", "height"]), &people(), &hashed()).unwrap();
    let keys: Vec<&str> = config.series.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["mass", "name", "height"]);
    for (key, series) in &config.series {
        assert_eq!(&series.label, key);
        assert_eq!(series.color.saturation, 70);
        assert_eq!(series.color.lightness, 50);
    }
}

#[test]
fn hashed_palette_is_stable_across_calls() {
    let a = configure(&cols(&["name", "height"]), &people(), &hashed()).unwrap();
    let b = configure(&cols(&["height", "name"]), &[], &hashed()).unwrap();
    assert_eq!(a.series["height"].color, b.series["height"].color);
    assert_eq!(a.series["name"].color, b.series["name"].color);
}

#[test]
fn random_palette_stays_on_the_hue_circle() {
    for _ in 0..50 {
        let config = configure(&cols(&["a", "b"]), &[], &ChartOptions::default()).unwrap();
        for series in config.series.values() {
            assert!((0.0..360.0).contains(&series.color.hue));
        }
    }
}

#[test]
fn custom_headroom_is_applied() {
    let options = ChartOptions {
        headroom: 1.5,
        ..ChartOptions::default()
    };
    let config = configure(&cols(&["name", "height"]), &people(), &options).unwrap();
    assert_eq!(config.y_max, YBound::Fixed(258.0));
}

// ---------------------------------------------------------------------------
// View and rendering
// ---------------------------------------------------------------------------

#[test]
fn tooltip_shows_every_series_rounded_up() {
    let selected = cols(&["name", "height", "mass"]);
    let records = people();
    let config = configure(&selected, &records, &hashed()).unwrap();
    let view = build_view(&config, &selected, &records, ChartType::Bar);

    let tip = view.tooltip(1).unwrap();
    assert_eq!(tip.title, "Leia");
    let values: Vec<(&str, &str)> = tip
        .entries
        .iter()
        .map(|e| (e.name.as_str(), e.value.as_str()))
        .collect();
    assert_eq!(values, vec![("height", "150"), ("mass", "N/A")]);
}

#[test]
fn tooltip_value_formatting() {
    assert_eq!(format_tooltip_value(&Value::Number(77.2)), "78");
    assert_eq!(format_tooltip_value(&Value::Text("12.5".into())), "13");
    assert_eq!(format_tooltip_value(&Value::Null), "N/A");
    assert_eq!(format_tooltip_value(&Value::Text("n/a".into())), "N/A");
}

#[test]
fn view_serializes_for_the_dashboard() {
    let selected = cols(&["name", "height"]);
    let records = people();
    let config = configure(&selected, &records, &hashed()).unwrap();
    let view = build_view(&config, &selected, &records, ChartType::Line);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["chart_type"], "line");
    assert_eq!(json["category_key"], "name");
    assert_eq!(json["rows"][0], json!({ "name": "Luke", "height": 172 }));
    assert!(json["series"][0]["color"].as_str().unwrap().starts_with("hsl("));
    assert!(json["y_max"].is_number());
}

#[test]
fn terminal_renderer_draws_both_types() {
    let selected = cols(&["name", "height"]);
    let records = people();
    let config = configure(&selected, &records, &hashed()).unwrap();

    let bar = render_terminal(&build_view(&config, &selected, &records, ChartType::Bar), 40);
    assert!(bar.contains("Luke"));
    assert!(bar.contains("172"));

    let line = render_terminal(&build_view(&config, &selected, &records, ChartType::Line), 40);
    assert!(line.contains("Luke, Leia"));
}

#[test]
fn unknown_metric_does_not_flatten_other_series() {
    let selected = cols(&["name", "height", "mass"]);
    let records = vec![record_from_json(&json!({ "name": "Luke", "height": "unknown", "mass": 77 }))];
    let config = configure(&selected, &records, &hashed()).unwrap();
    assert_eq!(config.y_max, YBound::Auto);

    let view = build_view(&config, &selected, &records, ChartType::Bar);
    assert!((view.y_upper() - 77.0).abs() < 1e-9);

    let out = render_terminal(&view, 40);
    assert!(out.contains("0 to 77"));
    assert!(out.contains('█'));
}
