//! JSON API handlers for the dashboard.
//!
//! Every mutating handler applies one [`Action`] to the session and answers
//! with the new session state. Pipeline failures never surface here; they go
//! to the diagnostics log and the state simply does not change.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::chart::{ChartView, Tooltip, format_tick};
use crate::session::Action;

use super::Dashboard;

/// Number of intervals on the Y axis.
const TICK_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct UrlRequest {
    url: String,
}

#[derive(Deserialize)]
struct EndpointRequest {
    endpoint: String,
}

#[derive(Deserialize)]
struct ColumnRequest {
    column: String,
}

#[derive(Deserialize)]
struct ChartTypeRequest {
    chart_type: String,
}

#[derive(Serialize)]
struct ChartResponse {
    chart: Option<ChartView>,
    y_upper: f64,
    ticks: Vec<Tick>,
    /// One tooltip per row, in row order.
    tooltips: Vec<Tooltip>,
}

#[derive(Debug, Serialize, PartialEq)]
struct Tick {
    value: f64,
    label: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_body<'a, T: Deserialize<'a>>(body: &'a str, what: &str) -> Result<T> {
    serde_json::from_str(body).with_context(|| format!("invalid JSON in {what} request"))
}

fn state(dashboard: &Dashboard) -> Result<serde_json::Value> {
    serde_json::to_value(dashboard.session.snapshot()).context("failed to serialize session state")
}

/// Evenly spaced ticks over `[0, upper]`, labelled with their ceiling.
fn ticks(upper: f64) -> Vec<Tick> {
    if upper <= 0.0 {
        return vec![Tick {
            value: 0.0,
            label: format_tick(0.0),
        }];
    }
    (0..=TICK_COUNT)
        .map(|i| {
            let value = upper * i as f64 / TICK_COUNT as f64;
            Tick {
                value,
                label: format_tick(value),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/state`
pub fn get_state(dashboard: &mut Dashboard) -> Result<serde_json::Value> {
    state(dashboard)
}

/// `POST /api/url` with `{ "url": "https://..." }`.
pub fn post_url(dashboard: &mut Dashboard, body: &str) -> Result<serde_json::Value> {
    let req: UrlRequest = parse_body(body, "url")?;
    let url = req.url.trim();
    if url.is_empty() {
        return Err(anyhow!("url must not be empty"));
    }
    dashboard.session.apply(Action::SetUrl(url.to_string()));
    state(dashboard)
}

/// `POST /api/discover`: list the sub-resources of the current base URL.
pub fn post_discover(dashboard: &mut Dashboard) -> Result<serde_json::Value> {
    dashboard
        .session
        .dispatch(dashboard.source.as_ref(), Action::DiscoverRequested);
    state(dashboard)
}

/// `POST /api/endpoint` with `{ "endpoint": "people" }`.
pub fn post_endpoint(dashboard: &mut Dashboard, body: &str) -> Result<serde_json::Value> {
    let req: EndpointRequest = parse_body(body, "endpoint")?;
    dashboard.session.apply(Action::EndpointSelected(req.endpoint));
    state(dashboard)
}

/// `POST /api/fetch`: load records for the selected endpoint.
pub fn post_fetch(dashboard: &mut Dashboard) -> Result<serde_json::Value> {
    dashboard
        .session
        .dispatch(dashboard.source.as_ref(), Action::FetchRequested);
    state(dashboard)
}

/// `POST /api/columns/toggle` with `{ "column": "height" }`.
pub fn post_toggle_column(dashboard: &mut Dashboard, body: &str) -> Result<serde_json::Value> {
    let req: ColumnRequest = parse_body(body, "column toggle")?;
    dashboard.session.apply(Action::ColumnToggled(req.column));
    state(dashboard)
}

/// `POST /api/chart-type` with `{ "chart_type": "line" }`.
pub fn post_chart_type(dashboard: &mut Dashboard, body: &str) -> Result<serde_json::Value> {
    let req: ChartTypeRequest = parse_body(body, "chart type")?;
    let chart_type = crate::chart::ChartType::parse(&req.chart_type)
        .ok_or_else(|| anyhow!("unknown chart type '{}': expected bar or line", req.chart_type))?;
    dashboard.session.apply(Action::ChartTypeChanged(chart_type));
    state(dashboard)
}

/// `GET /api/chart`: the renderer-ready view, or `null` when nothing is
/// selected.
pub fn get_chart(dashboard: &mut Dashboard) -> Result<serde_json::Value> {
    let view = dashboard.session.chart(&dashboard.options);

    let resp = match view {
        Some(view) => {
            let upper = view.y_upper();
            let tooltips = (0..view.rows.len()).filter_map(|i| view.tooltip(i)).collect();
            ChartResponse {
                y_upper: upper,
                ticks: ticks(upper),
                tooltips,
                chart: Some(view),
            }
        }
        None => ChartResponse {
            chart: None,
            y_upper: 0.0,
            ticks: ticks(0.0),
            tooltips: Vec::new(),
        },
    };

    serde_json::to_value(&resp).context("failed to serialize chart")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartOptions, ChartType};
    use crate::chart::palette::{Palette, PaletteKind};
    use crate::diagnostics::Diagnostics;
    use crate::http::{JsonSource, PipelineError};
    use crate::session::Session;
    use serde_json::json;

    struct Swapi;

    impl JsonSource for Swapi {
        fn get_json(&self, url: &str) -> Result<serde_json::Value, PipelineError> {
            match url {
                "https://swapi.test/api" => Ok(json!({
                    "people": "https://swapi.test/api/people/",
                    "planets": "https://swapi.test/api/planets/",
                    "count": 2
                })),
                "https://swapi.test/api/people" => Ok(json!({
                    "count": 2,
                    "results": [
                        { "name": "Luke", "height": "172", "mass": 77 },
                        { "name": "Leia", "height": "150", "mass": 49 }
                    ]
                })),
                _ => Err(PipelineError::fetch(url, "HTTP 404 Not Found")),
            }
        }
    }

    fn dashboard() -> Dashboard {
        let options = ChartOptions {
            palette: Palette::default().with_kind(PaletteKind::Hashed),
            ..ChartOptions::default()
        };
        Dashboard::new(
            Session::new("https://swapi.test/api", ChartType::Bar, Diagnostics::disabled()),
            Box::new(Swapi),
            options,
        )
    }

    #[test]
    fn full_flow_produces_chart() {
        let mut d = dashboard();

        let s = post_discover(&mut d).unwrap();
        assert_eq!(s["endpoints"], json!(["people", "planets"]));

        post_endpoint(&mut d, r#"{"endpoint":"people"}"#).unwrap();
        let s = post_fetch(&mut d).unwrap();
        assert_eq!(s["record_count"], 2);
        assert_eq!(s["schema"], json!(["name", "height", "mass"]));

        post_toggle_column(&mut d, r#"{"column":"name"}"#).unwrap();
        let s = post_toggle_column(&mut d, r#"{"column":"mass"}"#).unwrap();
        assert_eq!(s["selection"], json!(["name", "mass"]));

        let chart = get_chart(&mut d).unwrap();
        assert_eq!(chart["chart"]["category_key"], "name");
        assert_eq!(chart["chart"]["series"][0]["label"], "mass");
        assert_eq!(chart["tooltips"][0]["title"], "Luke");
        assert_eq!(chart["tooltips"][0]["entries"][0]["value"], "77");
        assert_eq!(chart["ticks"].as_array().unwrap().len(), TICK_COUNT + 1);
    }

    #[test]
    fn selecting_an_endpoint_does_not_fetch() {
        let mut d = dashboard();
        post_discover(&mut d).unwrap();

        let s = post_endpoint(&mut d, r#"{"endpoint":"people"}"#).unwrap();
        assert_eq!(s["selected_endpoint"], "people");
        assert_eq!(s["record_count"], 0);
        assert_eq!(s["schema"], json!([]));

        let s = post_fetch(&mut d).unwrap();
        assert_eq!(s["record_count"], 2);
    }

    #[test]
    fn chart_is_null_without_selection() {
        let mut d = dashboard();
        let chart = get_chart(&mut d).unwrap();
        assert!(chart["chart"].is_null());
        assert_eq!(chart["tooltips"], json!([]));
    }

    #[test]
    fn url_change_resets_state() {
        let mut d = dashboard();
        post_discover(&mut d).unwrap();
        let s = post_url(&mut d, r#"{"url":"https://other.test"}"#).unwrap();
        assert_eq!(s["base_url"], "https://other.test");
        assert_eq!(s["endpoints"], json!([]));
        assert!(post_url(&mut d, r#"{"url":"  "}"#).is_err());
    }

    #[test]
    fn chart_type_validation() {
        let mut d = dashboard();
        let s = post_chart_type(&mut d, r#"{"chart_type":"line"}"#).unwrap();
        assert_eq!(s["chart_type"], "line");
        assert!(post_chart_type(&mut d, r#"{"chart_type":"pie"}"#).is_err());
    }

    #[test]
    fn fetch_404_keeps_previous_records() {
        let mut d = dashboard();
        post_discover(&mut d).unwrap();
        post_endpoint(&mut d, r#"{"endpoint":"people"}"#).unwrap();
        post_fetch(&mut d).unwrap();

        post_endpoint(&mut d, r#"{"endpoint":"planets"}"#).unwrap();
        let s = post_fetch(&mut d).unwrap();
        assert_eq!(s["record_count"], 2);
        assert_eq!(s["selected_endpoint"], "planets");
    }

    #[test]
    fn ticks_cover_domain() {
        let t = ticks(189.2);
        assert_eq!(t.first().map(|t| t.label.as_str()), Some("0"));
        assert_eq!(t.last().map(|t| t.label.as_str()), Some("190"));
        assert_eq!(ticks(0.0).len(), 1);
    }
}
