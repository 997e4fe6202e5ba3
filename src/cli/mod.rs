//! CLI command implementations for apichart.
//!
//! Provides subcommand handlers for:
//! - `apichart discover`: list the sub-resources of the base URL
//! - `apichart fetch <endpoint>`: print the normalized record batch
//! - `apichart chart <endpoint> --columns a,b`: draw a chart in the terminal
//! - `apichart web`: start the dashboard
//! - `apichart config show|init|set|reset`: configuration management
//! - `apichart log`: read back the diagnostics log

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::chart::palette::PaletteKind;
use crate::chart::terminal::{render_terminal, truncate};
use crate::chart::{self, ChartOptions, ChartType};
use crate::config::{self, AppConfig};
use crate::diagnostics::{Diagnostics, Level};
use crate::http::{ApiClient, PipelineError};
use crate::pipeline;
use crate::record::{Record, Value};
use crate::web;

/// Width of the terminal plot area, in cells.
const CHART_WIDTH: usize = 50;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Output format for `apichart chart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Text,
    Json,
}

impl ChartFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Record a pipeline failure in the diagnostics log and turn it into a CLI
/// error.
fn pipeline_failure(diagnostics: &Diagnostics, operation: &str, err: PipelineError) -> anyhow::Error {
    diagnostics.pipeline_error(operation, &err);
    anyhow::Error::new(err)
}

/// Split a `--columns a,b,c` argument into trimmed, non-empty names.
pub fn parse_columns(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// apichart discover
// ---------------------------------------------------------------------------

/// List the endpoints advertised by the base URL.
pub fn run_discover(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config.http);
    let diagnostics = Diagnostics::from_config(&config.diagnostics);
    let base_url = &config.general.base_url;

    let endpoints = pipeline::discover(&client, base_url)
        .map_err(|e| pipeline_failure(&diagnostics, "discover", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&endpoints)?);
        }
        OutputFormat::Csv => {
            println!("endpoint");
            for endpoint in &endpoints {
                println!("{}", csv_field(endpoint));
            }
        }
        OutputFormat::Table => {
            if endpoints.is_empty() {
                println!("{}", format!("No endpoints found at {base_url}").yellow());
                return Ok(());
            }
            println!("{} {}", "Endpoints at".bold().cyan(), base_url.bold());
            println!("{}", "=".repeat(50));
            for endpoint in &endpoints {
                println!("  {endpoint}");
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// apichart fetch
// ---------------------------------------------------------------------------

/// Fetch an endpoint and print its records.
///
/// `columns` restricts the printed columns and marks them for ceiling
/// rounding; when empty, every schema column is printed as-is.
pub fn run_fetch(
    config: &AppConfig,
    endpoint: &str,
    columns: &[String],
    format: OutputFormat,
) -> Result<()> {
    let client = ApiClient::from_config(&config.http);
    let diagnostics = Diagnostics::from_config(&config.diagnostics);

    let records = pipeline::fetch(&client, &config.general.base_url, endpoint, columns)
        .map_err(|e| pipeline_failure(&diagnostics, "fetch", e))?;
    let schema = pipeline::infer_schema(&records);

    if records.is_empty() {
        diagnostics.warn("fetch", &format!("'{endpoint}' returned no usable records"));
        println!("{}", format!("No records returned by '{endpoint}'.").yellow());
        return Ok(());
    }

    let shown: Vec<String> = if columns.is_empty() {
        schema
    } else {
        check_columns(columns, &schema)?;
        columns.to_vec()
    };

    match format {
        OutputFormat::Json => print_records_json(&records, &shown)?,
        OutputFormat::Csv => print_records_csv(&records, &shown),
        OutputFormat::Table => print_records_table(endpoint, &records, &shown),
    }

    Ok(())
}

fn check_columns(columns: &[String], schema: &[String]) -> Result<()> {
    let unknown: Vec<&str> = columns
        .iter()
        .filter(|c| !schema.contains(*c))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!(
            "unknown column(s): {}. Available: {}",
            unknown.join(", "),
            schema.join(", ")
        );
    }
    Ok(())
}

fn cell<'a>(record: &'a Record, column: &str) -> Option<&'a Value> {
    record.get(column).filter(|v| !v.is_null())
}

fn print_records_table(endpoint: &str, records: &[Record], columns: &[String]) {
    println!(
        "{} {} {}",
        endpoint.bold().cyan(),
        "·".dimmed(),
        format!("{} records", records.len()).dimmed()
    );

    let widths: Vec<usize> = columns
        .iter()
        .map(|c| {
            records
                .iter()
                .filter_map(|r| cell(r, c))
                .map(|v| v.to_string().chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
                .min(24)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<width$}", truncate(c, *w), width = *w))
        .collect();
    println!("  {}", header.join("  ").bold());
    println!("  {}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for (i, record) in records.iter().enumerate() {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| {
                let text = cell(record, c).map(|v| v.to_string()).unwrap_or_default();
                format!("{:<width$}", truncate(&text, *w), width = *w)
            })
            .collect();
        let line = format!("  {}", line.join("  "));
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_records_json(records: &[Record], columns: &[String]) -> Result<()> {
    let projected: Vec<Record> = records
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| (c.clone(), r.get(c).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&projected)?);
    Ok(())
}

fn print_records_csv(records: &[Record], columns: &[String]) {
    let header: Vec<String> = columns.iter().map(|c| csv_field(c)).collect();
    println!("{}", header.join(","));
    for record in records {
        let line: Vec<String> = columns
            .iter()
            .map(|c| {
                cell(record, c)
                    .map(|v| csv_field(&v.to_string()))
                    .unwrap_or_default()
            })
            .collect();
        println!("{}", line.join(","));
    }
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// apichart chart
// ---------------------------------------------------------------------------

/// Options for `apichart chart` beyond the config file.
#[derive(Debug, Clone)]
pub struct ChartArgs {
    pub endpoint: String,
    pub columns: Vec<String>,
    pub chart_type: ChartType,
    pub palette: PaletteKind,
    pub format: ChartFormat,
}

/// Fetch an endpoint and chart the selected columns.
pub fn run_chart(config: &AppConfig, args: &ChartArgs) -> Result<()> {
    if args.columns.is_empty() {
        bail!("--columns needs at least one column (the first is the category axis)");
    }

    let client = ApiClient::from_config(&config.http);
    let diagnostics = Diagnostics::from_config(&config.diagnostics);

    let records = pipeline::fetch(
        &client,
        &config.general.base_url,
        &args.endpoint,
        &args.columns,
    )
    .map_err(|e| pipeline_failure(&diagnostics, "fetch", e))?;

    if records.is_empty() {
        diagnostics.warn("fetch", &format!("'{}' returned no usable records", args.endpoint));
        bail!("'{}' returned no records to chart", args.endpoint);
    }
    check_columns(&args.columns, &pipeline::infer_schema(&records))?;

    let mut options = ChartOptions::from_config(&config.chart);
    options.palette = options.palette.with_kind(args.palette);

    let chart_config = chart::configure(&args.columns, &records, &options)?;
    let view = chart::build_view(&chart_config, &args.columns, &records, args.chart_type);

    match args.format {
        ChartFormat::Json => {
            let tooltips: Vec<_> = (0..view.rows.len()).filter_map(|i| view.tooltip(i)).collect();
            let value = serde_json::json!({
                "chart": view,
                "y_upper": view.y_upper(),
                "tooltips": tooltips,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ChartFormat::Text => {
            println!(
                "{} {} {}",
                args.endpoint.bold().cyan(),
                "·".dimmed(),
                format!("{} chart of {} records", view.chart_type, view.rows.len()).dimmed()
            );
            print!("{}", render_terminal(&view, CHART_WIDTH));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// apichart web
// ---------------------------------------------------------------------------

/// Start the dashboard server. Blocks until interrupted.
pub fn run_web(config: &AppConfig) -> Result<()> {
    web::serve(&config.web.addr, config)
}

// ---------------------------------------------------------------------------
// apichart config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective apichart Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.apichart/config.toml", global_exists);
    print_source(".apichart.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "APICHART_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.apichart/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point apichart at your API.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// apichart log
// ---------------------------------------------------------------------------

/// Print the most recent diagnostics entries.
pub fn run_log(config: &AppConfig, tail: usize) -> Result<()> {
    let diagnostics = Diagnostics::from_config(&config.diagnostics);
    let Some(path) = diagnostics.path() else {
        println!("{}", "Diagnostics are disabled.".yellow());
        return Ok(());
    };

    let entries = diagnostics.tail(tail);
    if entries.is_empty() {
        println!(
            "{}",
            format!("No diagnostics recorded in {}", path.display()).yellow()
        );
        return Ok(());
    }

    for entry in &entries {
        let level = match entry.level {
            Level::Error => entry.level.to_string().red().bold(),
            Level::Warn => entry.level.to_string().yellow().bold(),
            Level::Info => entry.level.to_string().dimmed(),
        };
        let timestamp = chrono::DateTime::parse_from_rfc3339(&entry.timestamp)
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| entry.timestamp.clone());
        println!(
            "{} {:<5} {:<9} {}",
            timestamp.dimmed(),
            level,
            entry.operation,
            entry.message
        );
    }

    Ok(())
}

/// Resolve `--url` over the configured base URL.
pub fn with_url_override(mut config: AppConfig, url: Option<String>) -> Result<AppConfig> {
    if let Some(url) = url {
        let url = url.trim().to_string();
        if url.is_empty() {
            bail!("--url must not be empty");
        }
        config.general.base_url = url;
    }
    Ok(config)
}

/// Parse `--type` / `--palette` values, naming the flag on failure.
pub fn parse_chart_type(raw: Option<&str>, default: ChartType) -> Result<ChartType> {
    match raw {
        None => Ok(default),
        Some(s) => ChartType::parse(s)
            .with_context(|| format!("invalid --type '{s}': expected bar or line")),
    }
}

pub fn parse_palette(raw: Option<&str>, default: PaletteKind) -> Result<PaletteKind> {
    match raw {
        None => Ok(default),
        Some(s) => PaletteKind::parse(s)
            .with_context(|| format!("invalid --palette '{s}': expected random or hashed")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
