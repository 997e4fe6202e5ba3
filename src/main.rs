use anyhow::Result;
use clap::{Parser, Subcommand};

use apichart::cli::{self, ChartArgs, ChartFormat, OutputFormat};
use apichart::config;

#[derive(Debug, Parser)]
#[command(name = "apichart")]
#[command(about = "Discover a JSON API, fetch a resource, and chart its columns")]
#[command(version)]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the endpoints advertised by the base URL
    Discover {
        /// Base URL to explore (overrides config)
        #[arg(long)]
        url: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Fetch one endpoint and print its records
    Fetch {
        /// Endpoint name as listed by `discover`
        endpoint: String,
        /// Base URL to explore (overrides config)
        #[arg(long)]
        url: Option<String>,
        /// Comma-separated columns to print (rounded up if numeric)
        #[arg(long)]
        columns: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Fetch one endpoint and chart the selected columns
    Chart {
        /// Endpoint name as listed by `discover`
        endpoint: String,
        /// Comma-separated columns; the first is the category axis
        #[arg(long, required = true)]
        columns: String,
        /// Base URL to explore (overrides config)
        #[arg(long)]
        url: Option<String>,
        /// Chart type: bar or line (default from config)
        #[arg(long = "type")]
        chart_type: Option<String>,
        /// Output format: text (default), json
        #[arg(long, default_value = "text")]
        format: String,
        /// Series colors: random or hashed (default from config)
        #[arg(long)]
        palette: Option<String>,
    },
    /// Start the chart dashboard in the browser
    Web {
        /// Listen address (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show recent diagnostics (failed requests, empty batches, stale responses)
    Log {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        tail: usize,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file to ~/.apichart/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a single value, e.g. `general.base_url https://example.com/api`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Discover { url, format } => {
            let config = cli::with_url_override(config::load(), url)?;
            cli::run_discover(&config, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Fetch {
            endpoint,
            url,
            columns,
            format,
        } => {
            let config = cli::with_url_override(config::load(), url)?;
            let columns = cli::parse_columns(columns.as_deref());
            cli::run_fetch(
                &config,
                &endpoint,
                &columns,
                OutputFormat::from_str_opt(Some(&format)),
            )
        }
        Commands::Chart {
            endpoint,
            columns,
            url,
            chart_type,
            format,
            palette,
        } => {
            let config = cli::with_url_override(config::load(), url)?;
            let args = ChartArgs {
                endpoint,
                columns: cli::parse_columns(Some(&columns)),
                chart_type: cli::parse_chart_type(
                    chart_type.as_deref(),
                    config.general.chart_type,
                )?,
                palette: cli::parse_palette(palette.as_deref(), config.chart.palette)?,
                format: ChartFormat::from_str_opt(Some(&format)),
            };
            cli::run_chart(&config, &args)
        }
        Commands::Web { addr } => {
            let mut config = config::load();
            if let Some(addr) = addr {
                config.web.addr = addr;
            }
            cli::run_web(&config)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
        Commands::Log { tail } => {
            let config = config::load();
            cli::run_log(&config, tail)
        }
    }
}
