//! Embedded chart dashboard for apichart.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard: URL box, endpoint list, column toggles, chart
//! - JSON API endpoints that drive the [`Session`] state machine
//!
//! Launched via `apichart web` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::chart::ChartOptions;
use crate::config::AppConfig;
use crate::diagnostics::Diagnostics;
use crate::http::{ApiClient, JsonSource};
use crate::session::Session;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Everything one dashboard instance owns: the session, the source it fetches
/// from and the chart options resolved from config.
pub struct Dashboard {
    session: Session,
    source: Box<dyn JsonSource>,
    options: ChartOptions,
}

impl Dashboard {
    pub fn new(session: Session, source: Box<dyn JsonSource>, options: ChartOptions) -> Self {
        Self {
            session,
            source,
            options,
        }
    }

    /// Build a dashboard from the effective configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let session = Session::new(
            config.general.base_url.clone(),
            config.general.chart_type,
            Diagnostics::from_config(&config.diagnostics),
        );
        Self::new(
            session,
            Box::new(ApiClient::from_config(&config.http)),
            ChartOptions::from_config(&config.chart),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on the given address.
///
/// Blocks the current thread. Requests are handled sequentially, so session
/// transitions never interleave. A failing handler produces a JSON error
/// response without stopping the server.
pub fn serve(addr: &str, config: &AppConfig) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let mut dashboard = Dashboard::from_config(config);

    println!("apichart dashboard running at http://{addr}");
    println!("Exploring {}", config.general.base_url);
    println!("Press Ctrl+C to stop.\n");

    if config.web.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let (status, resp) = match dispatch(&mut dashboard, &method, &url, body.as_deref()) {
            Ok(resp) => (resp.status_code().0, resp),
            Err(e) => (500, error_response(&e.to_string(), 500)),
        };
        let _ = request.respond(resp);

        println!(
            "{} {} {} {}",
            chrono::Local::now().format("%H:%M:%S"),
            method,
            url,
            status
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route an incoming request to its handler.
pub fn dispatch(
    dashboard: &mut Dashboard,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let path = url.split('?').next().unwrap_or(url);
    let body = body.unwrap_or("{}");

    let value = match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => return Ok(serve_frontend()),

        // Session state
        (&Method::Get, "/api/state") => api::get_state(dashboard)?,
        (&Method::Post, "/api/url") => api::post_url(dashboard, body)?,
        (&Method::Post, "/api/discover") => api::post_discover(dashboard)?,
        (&Method::Post, "/api/endpoint") => api::post_endpoint(dashboard, body)?,
        (&Method::Post, "/api/fetch") => api::post_fetch(dashboard)?,
        (&Method::Post, "/api/columns/toggle") => api::post_toggle_column(dashboard, body)?,
        (&Method::Post, "/api/chart-type") => api::post_chart_type(dashboard, body)?,

        // Chart
        (&Method::Get, "/api/chart") => api::get_chart(dashboard)?,

        _ => return Ok(error_response("not found", 404)),
    };

    json_response(&value)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

fn json_response(value: &serde_json::Value) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(value).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

fn error_response(message: &str, status: u16) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

fn content_type_json() -> Header {
    header("application/json; charset=utf-8")
}

fn content_type_html() -> Header {
    header("text/html; charset=utf-8")
}

fn header(content_type: &str) -> Header {
    // Both values are static ASCII, which `from_bytes` always accepts.
    Header::from_bytes("Content-Type", content_type)
        .unwrap_or_else(|()| unreachable!("static header is valid"))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
