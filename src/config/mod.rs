/// Configuration system for apichart.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::AppConfig::default()`]
/// 2. **User global config**: `~/.apichart/config.toml`
/// 3. **Project local config**: `.apichart.toml` in the current working directory
/// 4. **Environment variables**: `APICHART_*` overrides (highest precedence)
///
/// File layers are merged at the key level: a project file that only sets
/// `[chart] palette` keeps every other value from the layers below it.
///
/// # Usage
///
/// ```rust,ignore
/// use apichart::config;
///
/// let cfg = config::load();
/// let client = ApiClient::from_config(&cfg.http);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::AppConfig;

use crate::chart::ChartType;
use crate::chart::palette::PaletteKind;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. Malformed files are skipped so a bad edit never stops the tool.
pub fn load() -> AppConfig {
    let layers = [global_config_path(), project_config_path()];
    let mut config = load_layers(layers.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files over the built-in defaults, in order.
pub fn load_layers<'a>(paths: impl IntoIterator<Item = &'a Path>) -> AppConfig {
    let Ok(mut merged) = toml::Value::try_from(AppConfig::default()) else {
        return AppConfig::default();
    };

    for path in paths {
        if let Some(layer) = load_toml_value(path) {
            merge_values(&mut merged, layer);
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as an untyped value tree.
///
/// Returns `None` if the file doesn't exist or the content is malformed.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`. Tables merge key by key; any
/// other value in the overlay replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.apichart/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".apichart").join("config.toml"))
}

/// Path to the project local config: `.apichart.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".apichart.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None if path == "~" => dirs::home_dir(),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `APICHART_BASE_URL`: API to explore
/// - `APICHART_CHART_TYPE`: `bar` or `line`
/// - `APICHART_TIMEOUT_MS`: HTTP request timeout
/// - `APICHART_PALETTE`: `random` or `hashed`
/// - `APICHART_DIAGNOSTICS`: diagnostics on/off (`1`/`true`/`yes`/`on`)
/// - `APICHART_WEB_ADDR`: dashboard listen address
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(val) = std::env::var("APICHART_BASE_URL")
        && !val.is_empty()
    {
        config.general.base_url = val;
    }
    if let Ok(val) = std::env::var("APICHART_CHART_TYPE")
        && let Some(chart_type) = ChartType::parse(&val)
    {
        config.general.chart_type = chart_type;
    }
    if let Ok(val) = std::env::var("APICHART_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.http.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("APICHART_PALETTE")
        && let Some(palette) = PaletteKind::parse(&val)
    {
        config.chart.palette = palette;
    }
    if let Ok(val) = std::env::var("APICHART_DIAGNOSTICS") {
        config.diagnostics.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("APICHART_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.apichart/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, AppConfig::default_toml()).context("failed to write config file")
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `chart.palette`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

/// Set a dotted key in the config file at `path`, creating it from the
/// defaults when it does not exist yet. The result must still deserialize
/// into an [`AppConfig`].
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&AppConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    let mut defaults =
        toml::Value::try_from(AppConfig::default()).context("failed to serialize defaults")?;
    // Files written by `config init` may omit keys; resolve types against defaults.
    merge_values(&mut defaults, root.clone());
    set_toml_value(&mut defaults, key, value)?;

    let _: AppConfig = defaults
        .clone()
        .try_into()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(leaf) = lookup(&defaults, key).cloned() {
        insert_dotted(&mut root, key, leaf)?;
    }

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path. The key must
/// already exist; its current type decides how `raw_value` is parsed.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (parent_key, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };
    if leaf.is_empty() {
        anyhow::bail!("empty config key");
    }

    let mut current = root;
    if let Some(parent_key) = parent_key {
        for part in parent_key.split('.') {
            current = current
                .get_mut(part)
                .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
        }
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{}'", parent_key.unwrap_or("")))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' is a section, not a value"),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

fn lookup<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(root, |node, part| node.get(part))
}

/// Insert `value` at a dotted key, creating intermediate tables.
fn insert_dotted(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let (leaf, sections) = parts.split_last().context("empty config key")?;

    let mut current = root;
    for part in sections {
        let table = current
            .as_table_mut()
            .with_context(|| format!("expected table above '{key}'"))?;
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    current
        .as_table_mut()
        .with_context(|| format!("expected table above '{key}'"))?
        .insert(leaf.to_string(), value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
