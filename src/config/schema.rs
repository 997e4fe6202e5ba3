/// Configuration schema and defaults for apichart.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[general]`, `[http]`, `[chart]`, `[diagnostics]`, and `[web]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

use crate::chart::{ChartType, DEFAULT_HEADROOM};
use crate::chart::palette::PaletteKind;

/// Default API explored when no URL is given.
pub const DEFAULT_BASE_URL: &str = "https://swapi.dev/api";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level apichart configuration.
///
/// Maps directly to the `~/.apichart/config.toml` and `.apichart.toml` file
/// schemas. Missing sections and fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub http: HttpConfig,
    pub chart: ChartConfigSection,
    pub diagnostics: DiagnosticsConfig,
    pub web: WebConfig,
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Base URL of the API to explore.
    pub base_url: String,
    /// Initial chart type: `bar` or `line`.
    pub chart_type: ChartType,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chart_type: ChartType::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// [http]
// ---------------------------------------------------------------------------

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: concat!("apichart/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [chart]
// ---------------------------------------------------------------------------

/// Chart configurator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfigSection {
    /// Series color strategy: `random` (new hue every render) or `hashed`
    /// (stable hue per column name).
    pub palette: PaletteKind,
    /// HSL saturation for series colors (percent).
    pub saturation: u8,
    /// HSL lightness for series colors (percent).
    pub lightness: u8,
    /// Multiplier applied to the rounded-up maximum to get the Y bound.
    pub headroom: f64,
}

impl Default for ChartConfigSection {
    fn default() -> Self {
        Self {
            palette: PaletteKind::default(),
            saturation: 70,
            lightness: 50,
            headroom: DEFAULT_HEADROOM,
        }
    }
}

// ---------------------------------------------------------------------------
// [diagnostics]
// ---------------------------------------------------------------------------

/// Diagnostic channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Whether diagnostics are written at all.
    pub enabled: bool,
    /// Path to the JSONL diagnostics file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.apichart/diagnostics.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Dashboard server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `apichart web`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Annotated default config written by `apichart config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# apichart configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (APICHART_*)
#   2. Project config (.apichart.toml in current directory)
#   3. User global config (~/.apichart/config.toml)
#   4. Built-in defaults

[general]
base_url = "{DEFAULT_BASE_URL}"
chart_type = "bar"      # bar | line

[http]
timeout_ms = 10000
user_agent = "apichart/{version}"

[chart]
palette = "random"      # random | hashed
saturation = 70
lightness = 50
headroom = 1.1

[diagnostics]
enabled = true
path = "~/.apichart/diagnostics.jsonl"

[web]
addr = "127.0.0.1:9747"
open_browser = true
"#,
            version = env!("CARGO_PKG_VERSION"),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
