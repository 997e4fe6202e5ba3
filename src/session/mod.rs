//! Session state machine for one user exploring one API.
//!
//! Holds the user-visible state (base URL, discovered endpoints, selected
//! endpoint, record batch, schema, column selection, chart type) and changes
//! it only through [`Session::apply`].
//!
//! # Transitions
//!
//! | Action               | Effect on state                                             |
//! |----------------------|-------------------------------------------------------------|
//! | `SetUrl`             | new URL; endpoints, records, schema, selection cleared      |
//! | `DiscoverRequested`  | issues a discover token → [`Effect::Discover`]              |
//! | `DiscoverCompleted`  | ok: endpoints replaced, everything downstream cleared       |
//! | `EndpointSelected`   | selected endpoint set (must be a discovered endpoint)       |
//! | `FetchRequested`     | issues a fetch token → [`Effect::Fetch`] (no-op w/o endpoint)|
//! | `FetchCompleted`     | ok: records + schema replaced; selection kept only if the schema is unchanged |
//! | `ColumnToggled`      | selection toggled (column must be in the schema)            |
//! | `ChartTypeChanged`   | chart type set                                              |
//!
//! Failed completions leave every field untouched and go to the diagnostic
//! channel.
//!
//! # Request fencing
//!
//! Every dispatched request carries a [`RequestToken`]. A completion is
//! applied only if its token is the latest one issued for that kind of
//! request and the URL has not changed since dispatch. A successful
//! discovery also invalidates any fetch still in flight. Stale completions
//! are dropped and logged.

pub mod selection;

use serde::Serialize;

use crate::chart::{self, ChartOptions, ChartType, ChartView};
use crate::diagnostics::Diagnostics;
use crate::http::{JsonSource, PipelineError, join_url};
use crate::pipeline;
use crate::record::Record;

pub use selection::Selection;

// ---------------------------------------------------------------------------
// Actions and effects
// ---------------------------------------------------------------------------

/// Identifies one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestToken {
    id: u64,
    url_epoch: u64,
}

impl RequestToken {
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug)]
pub enum Action {
    SetUrl(String),
    DiscoverRequested,
    DiscoverCompleted {
        token: RequestToken,
        result: Result<Vec<String>, PipelineError>,
    },
    EndpointSelected(String),
    FetchRequested,
    FetchCompleted {
        token: RequestToken,
        result: Result<Vec<Record>, PipelineError>,
    },
    ColumnToggled(String),
    ChartTypeChanged(ChartType),
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Discover(DiscoverRequest),
    Fetch(FetchRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverRequest {
    pub token: RequestToken,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub base_url: String,
    pub endpoint: String,
    /// Selection at dispatch time; these columns are ceiling-rounded.
    pub selected_columns: Vec<String>,
}

impl FetchRequest {
    pub fn url(&self) -> String {
        join_url(&self.base_url, &self.endpoint)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Session {
    base_url: String,
    endpoints: Vec<String>,
    selected_endpoint: String,
    records: Vec<Record>,
    schema: Vec<String>,
    selection: Selection,
    chart_type: ChartType,

    next_token: u64,
    url_epoch: u64,
    latest_discover: Option<RequestToken>,
    latest_fetch: Option<RequestToken>,

    diagnostics: Diagnostics,
}

impl Session {
    pub fn new(base_url: impl Into<String>, chart_type: ChartType, diagnostics: Diagnostics) -> Self {
        Self {
            base_url: base_url.into(),
            endpoints: Vec::new(),
            selected_endpoint: String::new(),
            records: Vec::new(),
            schema: Vec::new(),
            selection: Selection::new(),
            chart_type,
            next_token: 0,
            url_epoch: 0,
            latest_discover: None,
            latest_fetch: None,
            diagnostics,
        }
    }

    // -- Accessors --

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn selected_endpoint(&self) -> &str {
        &self.selected_endpoint
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    // -- Transitions --

    /// Apply one action and return the work it requires.
    pub fn apply(&mut self, action: Action) -> Effect {
        match action {
            Action::SetUrl(url) => {
                self.set_url(url);
                Effect::None
            }
            Action::DiscoverRequested => {
                let token = self.issue_token();
                self.latest_discover = Some(token);
                Effect::Discover(DiscoverRequest {
                    token,
                    url: self.base_url.clone(),
                })
            }
            Action::DiscoverCompleted { token, result } => {
                self.complete_discover(token, result);
                Effect::None
            }
            Action::EndpointSelected(endpoint) => {
                self.select_endpoint(endpoint);
                Effect::None
            }
            Action::FetchRequested => self.request_fetch(),
            Action::FetchCompleted { token, result } => {
                self.complete_fetch(token, result);
                Effect::None
            }
            Action::ColumnToggled(column) => {
                if !self.selection.toggle(&column, &self.schema) {
                    self.diagnostics
                        .warn("select", &format!("column '{column}' is not in the current schema"));
                }
                Effect::None
            }
            Action::ChartTypeChanged(chart_type) => {
                self.chart_type = chart_type;
                Effect::None
            }
        }
    }

    /// Apply an action and synchronously carry out its effect against
    /// `source`, feeding the completion back into the session.
    pub fn dispatch(&mut self, source: &dyn JsonSource, action: Action) {
        match self.apply(action) {
            Effect::None => {}
            Effect::Discover(req) => {
                let result = pipeline::discover(source, &req.url);
                self.apply(Action::DiscoverCompleted {
                    token: req.token,
                    result,
                });
            }
            Effect::Fetch(req) => {
                let result = pipeline::fetch(
                    source,
                    &req.base_url,
                    &req.endpoint,
                    &req.selected_columns,
                );
                self.apply(Action::FetchCompleted {
                    token: req.token,
                    result,
                });
            }
        }
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken {
            id: self.next_token,
            url_epoch: self.url_epoch,
        }
    }

    fn is_current(&self, token: RequestToken, latest: Option<RequestToken>) -> bool {
        token.url_epoch == self.url_epoch && latest == Some(token)
    }

    fn set_url(&mut self, url: String) {
        if url == self.base_url {
            return;
        }
        self.base_url = url;
        self.url_epoch += 1;
        self.endpoints.clear();
        self.selected_endpoint.clear();
        self.clear_data();
    }

    fn clear_data(&mut self) {
        self.records.clear();
        self.schema.clear();
        self.selection.clear();
    }

    fn complete_discover(&mut self, token: RequestToken, result: Result<Vec<String>, PipelineError>) {
        if !self.is_current(token, self.latest_discover) {
            self.diagnostics.info(
                "discover",
                &format!("dropped stale response for request #{}", token.id()),
            );
            return;
        }

        match result {
            Ok(endpoints) => {
                self.endpoints = endpoints;
                self.selected_endpoint.clear();
                self.clear_data();
                // Fetches dispatched against the previous endpoint list no longer apply.
                self.latest_fetch = None;
            }
            Err(e) => self.diagnostics.pipeline_error("discover", &e),
        }
    }

    fn select_endpoint(&mut self, endpoint: String) {
        if !self.endpoints.contains(&endpoint) {
            self.diagnostics
                .warn("select", &format!("endpoint '{endpoint}' was not discovered"));
            return;
        }
        self.selected_endpoint = endpoint;
    }

    fn request_fetch(&mut self) -> Effect {
        if self.selected_endpoint.is_empty() {
            return Effect::None;
        }

        let token = self.issue_token();
        self.latest_fetch = Some(token);
        Effect::Fetch(FetchRequest {
            token,
            base_url: self.base_url.clone(),
            endpoint: self.selected_endpoint.clone(),
            selected_columns: self.selection.columns().to_vec(),
        })
    }

    fn complete_fetch(&mut self, token: RequestToken, result: Result<Vec<Record>, PipelineError>) {
        if !self.is_current(token, self.latest_fetch) {
            self.diagnostics.info(
                "fetch",
                &format!("dropped stale response for request #{}", token.id()),
            );
            return;
        }

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                self.diagnostics.pipeline_error("fetch", &e);
                return;
            }
        };

        let schema = pipeline::infer_schema(&records);
        if schema.is_empty() {
            self.diagnostics.warn(
                "fetch",
                &format!(
                    "'{}' returned no usable records; schema cleared",
                    self.selected_endpoint
                ),
            );
        }

        if schema != self.schema {
            self.selection.clear();
        }
        self.records = records;
        self.schema = schema;
    }

    // -- Rendering --

    /// Build the chart view for the current state, or `None` when there is
    /// nothing to draw (no records or no selected columns).
    pub fn chart(&self, options: &ChartOptions) -> Option<ChartView> {
        if self.records.is_empty() || self.selection.is_empty() {
            return None;
        }

        let selected = self.selection.columns();
        let config = chart::configure(selected, &self.records, options).ok()?;
        Some(chart::build_view(
            &config,
            selected,
            &self.records,
            self.chart_type,
        ))
    }

    /// Serializable copy of the user-visible state.
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            base_url: &self.base_url,
            endpoints: &self.endpoints,
            selected_endpoint: &self.selected_endpoint,
            schema: &self.schema,
            selection: &self.selection,
            chart_type: self.chart_type,
            record_count: self.records.len(),
        }
    }
}

/// JSON view of the session served to the dashboard.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    pub base_url: &'a str,
    pub endpoints: &'a [String],
    pub selected_endpoint: &'a str,
    pub schema: &'a [String],
    pub selection: &'a Selection,
    pub chart_type: ChartType,
    pub record_count: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
