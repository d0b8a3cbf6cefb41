use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pitchdeck::cli;

#[derive(Debug, Parser)]
#[command(name = "pitchdeck")]
#[command(about = "Password-gated annual plan proposal dashboard")]
#[command(version)]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the proposal dashboard
    Serve {
        /// Listen address (default: server.addr, 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open the dashboard in a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Price an annual commitment
    Quote {
        /// Commitment in millions of credits (default: the recommendation)
        #[arg(long)]
        commitment: Option<u32>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the volume discount tiers
    Tiers {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show usage by service for a filter selection
    Usage {
        /// credits or dollars
        #[arg(long)]
        mode: Option<String>,
        /// all, 6m or 3m
        #[arg(long)]
        range: Option<String>,
        /// Comma-separated service keys, e.g. emailFinder,mobileFinder
        #[arg(long)]
        services: Option<String>,
        /// Comma-separated month labels, e.g. "Jan 2025,Feb 2025"
        #[arg(long)]
        months: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Validate a usage dataset (default: the configured or embedded one)
    Validate {
        path: Option<PathBuf>,
    },
    /// Summarize proposal activity from the event log
    Activity {
        /// Only include the last N days of events
        #[arg(long)]
        days: Option<u32>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check that a dashboard is running and healthy
    Check {
        /// Dashboard address (default: server.addr)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.pitchdeck/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value by dotted key, e.g. gate.password
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_browser } => cli::run_serve(addr.as_deref(), no_browser),
        Commands::Quote { commitment, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_quote(commitment, fmt)
        }
        Commands::Tiers { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_tiers(fmt)
        }
        Commands::Usage {
            mode,
            range,
            services,
            months,
            format,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            let args = cli::UsageArgs {
                mode,
                range,
                services,
                months,
            };
            cli::run_usage(&args, fmt)
        }
        Commands::Validate { path } => cli::run_validate(path.as_deref()),
        Commands::Activity { days, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_activity(days, fmt)
        }
        Commands::Check { addr } => cli::run_check(addr.as_deref()),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
