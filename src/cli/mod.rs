//! CLI command implementations for pitchdeck.
//!
//! Provides subcommand handlers for:
//! - `pitchdeck serve`: run the proposal dashboard
//! - `pitchdeck quote --commitment N`: price one annual commitment
//! - `pitchdeck tiers`: the discount tier table
//! - `pitchdeck usage`: the usage view for a filter selection
//! - `pitchdeck validate [PATH]`: check a usage dataset
//! - `pitchdeck activity --days N`: summarize the event log
//! - `pitchdeck check`: probe a running dashboard
//! - `pitchdeck config show|init|set|reset`: configuration management

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::analytics::logger::EventLog;
use crate::analytics::reporter::{self, ActivityReport};
use crate::config::{self, PitchdeckConfig};
use crate::data::Dataset;
use crate::pricing::{PricingCalculator, Quote, TierRow};
use crate::usage::{self, AggregatorSettings, Unit, UsageView, ViewState};
use crate::utils::format::{
    format_compact, format_credits, format_currency, format_number, format_percent, format_rate,
};
use crate::web::{self, AppState};

/// Output format for reporting commands.
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

/// Config, dataset and calculator as every offline command needs them.
fn load_context() -> Result<(PitchdeckConfig, Dataset, PricingCalculator)> {
    let cfg = config::load();
    let dataset = Dataset::load(cfg.data.path.as_deref())?;
    let calculator =
        PricingCalculator::from_config(&cfg.pricing).context("invalid [pricing] config")?;
    Ok((cfg, dataset, calculator))
}

// ---------------------------------------------------------------------------
// pitchdeck serve
// ---------------------------------------------------------------------------

/// Start the dashboard. `addr` overrides `server.addr`.
pub fn run_serve(addr: Option<&str>, no_browser: bool) -> Result<()> {
    let cfg = config::load();
    let addr = addr.map_or_else(|| cfg.server.addr.clone(), str::to_string);
    let open = cfg.server.open_browser && !no_browser;
    let state = AppState::from_config(cfg)?;
    web::serve(&state, &addr, open)
}

// ---------------------------------------------------------------------------
// pitchdeck quote
// ---------------------------------------------------------------------------

/// Price an annual commitment; without one, the recommended commitment.
pub fn run_quote(commitment: Option<u32>, format: OutputFormat) -> Result<()> {
    let (_, dataset, calculator) = load_context()?;
    let current = dataset.snapshot();
    let commitment =
        commitment.unwrap_or_else(|| calculator.recommendation(&current).commitment_millions);
    let quote = calculator.quote_against(commitment, &current);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quote)?),
        OutputFormat::Csv => print_quote_csv(&quote),
        OutputFormat::Table => print_quote_table(&quote),
    }
    Ok(())
}

fn print_quote_table(quote: &Quote) {
    println!(
        "{}",
        format!("Annual Commitment: {}M credits", quote.commitment_millions)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(50));
    println!(
        "  {} {}M credits ({} off)",
        "Tier:            ".bold(),
        quote.tier.threshold_millions,
        format_percent(quote.tier.discount_pct(), 0)
    );
    println!(
        "  {} {} (standard {})",
        "Price per credit:".bold(),
        format_rate(quote.price_per_credit),
        format_rate(quote.base_rate)
    );
    println!(
        "  {} {} (standard {})",
        "Monthly cost:    ".bold(),
        format_currency(quote.discounted_monthly_cost, 2),
        format_currency(quote.standard_monthly_cost, 2)
    );
    println!(
        "  {} {} (standard {})",
        "Annual cost:     ".bold(),
        format_currency(quote.discounted_annual_cost, 0),
        format_currency(quote.standard_annual_cost, 0)
    );
    println!(
        "  {} {}",
        "Annual savings:  ".bold(),
        format_currency(quote.annual_savings, 0).green()
    );
    println!(
        "  {} {:.1} months of free service",
        "Equivalent to:   ".bold(),
        quote.free_months_equivalent
    );
    println!(
        "  {} {}",
        "Price lock:      ".bold(),
        if quote.price_lock { "12 months" } else { "no" }
    );

    if let Some(vs) = &quote.versus_current {
        println!();
        println!("{}", "Against Current Spend".bold().cyan());
        println!(
            "  {} {}",
            "Current annual run rate:".bold(),
            format_currency(vs.current_annual_spend, 0)
        );
        let delta = if vs.savings_vs_current_spend >= 0.0 {
            format!("{} less per year", format_currency(vs.savings_vs_current_spend, 0)).green()
        } else {
            format!(
                "{} more per year for {} additional credits",
                format_currency(-vs.savings_vs_current_spend, 0),
                format_compact(vs.credits_above_current)
            )
            .yellow()
        };
        println!("  {} {}", "This commitment:        ".bold(), delta);
    }
}

fn print_quote_csv(quote: &Quote) {
    println!(
        "commitment_millions,tier_millions,price_per_credit,discounted_monthly_cost,\
         discounted_annual_cost,annual_savings,free_months_equivalent,price_lock"
    );
    println!(
        "{},{},{:.4},{:.2},{:.2},{:.2},{:.2},{}",
        quote.commitment_millions,
        quote.tier.threshold_millions,
        quote.price_per_credit,
        quote.discounted_monthly_cost,
        quote.discounted_annual_cost,
        quote.annual_savings,
        quote.free_months_equivalent,
        quote.price_lock,
    );
}

// ---------------------------------------------------------------------------
// pitchdeck tiers
// ---------------------------------------------------------------------------

/// Show the discount tier table, marking the recommended tier.
pub fn run_tiers(format: OutputFormat) -> Result<()> {
    let (_, dataset, calculator) = load_context()?;
    let recommended = calculator.recommendation(&dataset.snapshot()).commitment_millions;
    let rows = calculator.tier_rows(recommended);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => print_tiers_csv(&rows),
        OutputFormat::Table => print_tiers_table(&rows, calculator.base_rate()),
    }
    Ok(())
}

fn print_tiers_table(rows: &[TierRow], base_rate: f64) {
    println!("{}", "Volume Discount Tiers".bold().cyan());
    println!("{}", "=".repeat(72));
    println!(
        "  {:<12} {:>8} {:>10} {:>14} {:>14} {:>6}",
        "Commitment", "Discount", "Per credit", "Annual cost", "Savings", "Lock"
    );
    println!("  {}", "-".repeat(70));

    for (i, row) in rows.iter().enumerate() {
        let line = format!(
            "  {:<12} {:>8} {:>10} {:>14} {:>14} {:>6}",
            format!("{}M", row.tier.threshold_millions),
            format_percent(row.tier.discount_pct(), 0),
            format_rate(row.tier.price_per_credit),
            format_currency(row.discounted_annual_cost, 0),
            format_currency(row.annual_savings, 0),
            if row.price_lock { "yes" } else { "-" },
        );

        if row.is_current {
            println!("{} {}", line.green().bold(), "<- recommended".dimmed());
        } else if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }

    println!();
    println!(
        "  {}",
        format!("Standard rate: {} per credit", format_rate(base_rate)).dimmed()
    );
}

fn print_tiers_csv(rows: &[TierRow]) {
    println!(
        "threshold_millions,discount,price_per_credit,discounted_annual_cost,annual_savings,price_lock"
    );
    for row in rows {
        println!(
            "{},{:.2},{:.4},{:.2},{:.2},{}",
            row.tier.threshold_millions,
            row.tier.discount,
            row.tier.price_per_credit,
            row.discounted_annual_cost,
            row.annual_savings,
            row.price_lock,
        );
    }
}

// ---------------------------------------------------------------------------
// pitchdeck usage
// ---------------------------------------------------------------------------

/// Filter arguments for `pitchdeck usage`, as typed on the command line.
#[derive(Debug, Default, Clone)]
pub struct UsageArgs {
    pub mode: Option<String>,
    pub range: Option<String>,
    pub services: Option<String>,
    pub months: Option<String>,
}

/// Show the usage view for the given filters.
pub fn run_usage(args: &UsageArgs, format: OutputFormat) -> Result<()> {
    let (cfg, dataset, _) = load_context()?;
    let state = ViewState::from_params(
        &cfg.usage,
        &dataset,
        args.mode.as_deref(),
        args.range.as_deref(),
        args.services.as_deref(),
        args.months.as_deref(),
    )?;
    let view = usage::aggregate(&dataset, &state, &AggregatorSettings::from(&cfg.usage));

    if view.last_month.is_none() {
        println!("{}", "No usage for this selection.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Csv => print_usage_csv(&view),
        OutputFormat::Table => print_usage_table(&view),
    }
    Ok(())
}

fn usage_cell(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Credits => format_credits(value),
        Unit::Dollars => format_currency(value, 2),
    }
}

fn growth_cell(growth: f64) -> colored::ColoredString {
    let text = format!("{:+.0}%", growth);
    if growth >= 0.0 { text.green() } else { text.red() }
}

fn print_usage_table(view: &UsageView) {
    let last = view.last_month.as_deref().unwrap_or("-");
    println!(
        "{}",
        format!("Usage by Service: {last} ({}, {})", view.range, view.mode)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(60));
    println!(
        "  {} {}",
        "Months:        ".bold(),
        view.months.join(", ")
    );
    println!(
        "  {} {}",
        "Last month:    ".bold(),
        usage_cell(view.totals.last_month_total, view.mode)
    );
    println!(
        "  {} {}",
        "Selection:     ".bold(),
        usage_cell(view.totals.filtered_total, view.mode)
    );
    println!(
        "  {} {} / {}",
        "Growth:        ".bold(),
        format!("{} avg", format_percent(view.growth.average, 0)),
        format!("{} recent", format_percent(view.growth.recent, 1))
    );
    println!();

    println!(
        "  {:<26} {:>18} {:>8}",
        "Service", "Usage", "Growth"
    );
    println!("  {}", "-".repeat(54));
    for row in &view.services {
        println!(
            "  {:<26} {:>18} {:>8}",
            row.name,
            usage_cell(row.usage, view.mode),
            growth_cell(row.growth),
        );
    }
    println!();

    println!("{}", "Category Distribution".bold().cyan());
    for slice in &view.categories {
        println!(
            "  {:<26} {:>7}  {}",
            slice.name,
            format_percent(slice.value, 1),
            usage_cell(slice.actual_value, view.mode).dimmed()
        );
        for member in &slice.members {
            println!(
                "    {} {:<22} {:>7}",
                "·".dimmed(),
                member.name,
                format_percent(member.value, 1)
            );
        }
    }
}

fn print_usage_csv(view: &UsageView) {
    println!("service,usage,growth_pct");
    for row in &view.services {
        println!("{},{:.2},{:.0}", row.key.key(), row.usage, row.growth);
    }
}

// ---------------------------------------------------------------------------
// pitchdeck validate
// ---------------------------------------------------------------------------

/// Validate a dataset file, or the configured/embedded dataset.
pub fn run_validate(path: Option<&Path>) -> Result<()> {
    let cfg = config::load();
    let path = path.or(cfg.data.path.as_deref());
    let dataset = Dataset::load(path)?;
    let source = path.map_or_else(|| "embedded dataset".to_string(), |p| p.display().to_string());

    println!("{} {} is valid", "✓".green().bold(), source);
    println!(
        "  {} {} ({} to {})",
        "Months:       ".bold(),
        dataset.months().len(),
        dataset.first().month,
        dataset.latest().month
    );
    println!(
        "  {} {}",
        "Total credits:".bold(),
        format_credits(dataset.total().sum_of_credits)
    );
    println!(
        "  {} {}",
        "Total cost:   ".bold(),
        format_currency(dataset.total().total_cost, 2)
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// pitchdeck activity
// ---------------------------------------------------------------------------

/// Summarize the proposal event log.
pub fn run_activity(days: Option<u32>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let log = EventLog::from_config(&cfg.logging);
    if log.path().is_none() {
        println!(
            "{}",
            "Event logging is disabled (logging.enabled = false).".yellow()
        );
        return Ok(());
    }

    let report = reporter::compute_report(&log, days);
    if report.total_events == 0 {
        println!(
            "{}",
            "No activity yet. Share the dashboard to start collecting events.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => print_activity_csv(&report),
        OutputFormat::Table => print_activity_table(&report, days),
    }
    Ok(())
}

fn print_activity_table(report: &ActivityReport, days: Option<u32>) {
    let title = match days {
        Some(d) => format!("Proposal Activity: Last {d} Days"),
        None => "Proposal Activity".to_string(),
    };
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {} {}",
        "Total events: ".bold(),
        format_number(report.total_events as u64)
    );
    println!(
        "  {} {} of {} ({})",
        "Gate granted: ".bold(),
        report.gate.granted,
        report.gate.attempts,
        format_percent(report.gate.success_pct(), 0)
    );
    println!("  {} {}", "Quotes:       ".bold(), report.quotes);
    if let Some(most) = &report.most_quoted {
        println!(
            "  {} {}M credits ({} times)",
            "Most quoted:  ".bold(),
            most.commitment_millions,
            most.count
        );
    }
    if let (Some(first), Some(last)) = (&report.first_seen, &report.last_seen) {
        println!("  {} {first}", "First seen:   ".bold());
        println!("  {} {last}", "Last seen:    ".bold());
    }

    if !report.section_views.is_empty() {
        println!();
        println!("{}", "Section Views".bold().cyan());
        for stat in &report.section_views {
            println!("  {:<24} {:>6}", stat.section, stat.views);
        }
    }

    if !report.daily.is_empty() {
        println!();
        println!("{}", "Daily".bold().cyan());
        for day in &report.daily {
            println!("  {:<12} {:>6}", day.date, day.events);
        }
    }
}

fn print_activity_csv(report: &ActivityReport) {
    println!("date,events");
    for day in &report.daily {
        println!("{},{}", day.date, day.events);
    }
}

// ---------------------------------------------------------------------------
// pitchdeck check
// ---------------------------------------------------------------------------

/// Probe a running dashboard's `/api/health`.
pub fn run_check(addr: Option<&str>) -> Result<()> {
    let cfg = config::load();
    let addr = addr.unwrap_or(&cfg.server.addr);
    let url = format!("http://{addr}/api/health");

    println!("{}", "pitchdeck Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_check_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.pitchdeck/config.toml found"
        } else {
            "not found (run `pitchdeck config init` to create)"
        },
    );

    let health: serde_json::Value = match ureq::get(&url)
        .timeout(Duration::from_secs(3))
        .call()
    {
        Ok(resp) => resp.into_json().context("health response is not JSON")?,
        Err(e) => {
            print_check_item("Dashboard", false, &format!("not reachable at {addr}: {e}"));
            bail!("dashboard is not running at {addr}");
        }
    };

    print_check_item("Dashboard", true, &format!("reachable at {addr}"));
    print_check_item(
        "Version",
        true,
        health["version"].as_str().unwrap_or("unknown"),
    );
    print_check_item(
        "Dataset",
        health["months"].as_u64().unwrap_or(0) > 0,
        &format!(
            "{} months, {} to {}",
            health["months"],
            health["first_month"].as_str().unwrap_or("?"),
            health["latest_month"].as_str().unwrap_or("?")
        ),
    );
    print_check_item(
        "Pricing tiers",
        health["tiers"].as_u64().unwrap_or(0) > 0,
        &health["tiers"].to_string(),
    );
    let event_log = health["event_log"].as_str();
    print_check_item(
        "Event log",
        event_log.is_some(),
        event_log.unwrap_or("disabled"),
    );

    Ok(())
}

fn print_check_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// pitchdeck config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective pitchdeck Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = Path::new(".pitchdeck.toml").exists();
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.pitchdeck/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.pitchdeck/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".pitchdeck.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".pitchdeck.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "PITCHDECK_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.pitchdeck/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to set the client, password and pricing.".dimmed()
    );
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
// Tests
// ---------------------------------------------------------------------------
