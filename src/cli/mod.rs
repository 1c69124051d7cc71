//! CLI command implementations for alertdash.
//!
//! Provides subcommand handlers for:
//! - `alertdash serve` — run the web dashboard
//! - `alertdash health` — check config, API key, completion client, document link
//! - `alertdash guide <TYPE>` — print response steps for a disaster type
//! - `alertdash sample` — print a categorized random sample of alerts
//! - `alertdash config show|init|set|reset` — configuration management

use anyhow::Result;
use colored::Colorize;

use crate::alerts::{AlertRecord, SeverityBuckets, categorize, generate_messages, sample_messages};
use crate::config;
use crate::document::extract_file_id;
use crate::guide::{self, ADVISORY};
use crate::llm::ChatService;
use crate::web::{self, App};

/// Output format for commands that print data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// alertdash serve
// ---------------------------------------------------------------------------

/// Start the dashboard. `addr` overrides `server.addr`.
pub fn run_serve(addr: Option<String>, open: bool) -> Result<()> {
    let cfg = config::load();
    let addr = addr.unwrap_or_else(|| cfg.server.addr.clone());
    let open = open || cfg.server.open_browser;

    let app = App::from_config(cfg);
    web::serve(app, &addr, open)
}

// ---------------------------------------------------------------------------
// alertdash health
// ---------------------------------------------------------------------------

/// Check configuration and chat client status.
pub fn run_health() -> Result<()> {
    println!("{}", "alertdash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.alertdash/config.toml found"
        } else {
            "not found (run `alertdash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".alertdash.toml found"
        } else {
            "none (optional)"
        },
    );

    let has_key = !cfg.llm.api_key.trim().is_empty();
    print_health_item(
        "API key",
        has_key,
        if has_key {
            "configured"
        } else {
            "missing (set ALERTDASH_API_KEY)"
        },
    );

    let chat = ChatService::from_config(&cfg.llm);
    match chat.init_error() {
        None => print_health_item(
            "Completion client",
            true,
            &format!(
                "{} at {}",
                chat.model_name().unwrap_or_default(),
                chat.endpoint().unwrap_or_default()
            ),
        ),
        Some(reason) => print_health_item("Completion client", false, reason),
    }

    let file_id = extract_file_id(&cfg.document.url);
    print_health_item(
        "Document link",
        file_id.is_some(),
        &match file_id {
            Some(id) => format!("file id {id}"),
            None => format!("no /d/<id>/ segment in {}", cfg.document.url),
        },
    );

    print_health_item(
        "Dashboard",
        cfg.dashboard.sample_size > 0,
        &format!(
            "pool {} / sample {}",
            cfg.dashboard.pool_size, cfg.dashboard.sample_size
        ),
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// alertdash guide
// ---------------------------------------------------------------------------

/// Print the numbered response steps for `disaster_type`.
pub fn run_guide(disaster_type: &str) -> Result<()> {
    println!(
        "{}",
        format!("Response Steps for {disaster_type}").bold().cyan()
    );
    println!();
    for step in guide::numbered_steps(disaster_type) {
        println!("  {step}");
    }
    println!();
    println!("{}", ADVISORY.blue());
    Ok(())
}

// ---------------------------------------------------------------------------
// alertdash sample
// ---------------------------------------------------------------------------

/// Generate a pool, draw a sample, and print it grouped by severity.
pub fn run_sample(size: Option<usize>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let size = size.unwrap_or(cfg.dashboard.sample_size);

    let mut rng = rand::thread_rng();
    let pool = generate_messages(cfg.dashboard.pool_size, &mut rng);
    let buckets = categorize(&sample_messages(&pool, size, &mut rng));

    match format {
        OutputFormat::Json => print_sample_json(&buckets)?,
        OutputFormat::Table => print_sample_table(&buckets),
    }
    Ok(())
}

fn print_sample_table(buckets: &SeverityBuckets) {
    let (high, medium, low) = buckets.counts();
    println!(
        "{} {}",
        "Severity Distribution".bold().cyan(),
        format!("({} sampled)", buckets.total()).dimmed()
    );
    println!("{}", "=".repeat(40));
    for bar in buckets.chart().bars {
        println!("  {:<8} {:>3} {}", bar.label, bar.count, "█".repeat(bar.count));
    }
    println!();

    print_bucket(&format!("High Severity Messages ({high})"), &buckets.high, |s| {
        s.red()
    });
    print_bucket(
        &format!("Medium Severity Messages ({medium})"),
        &buckets.medium,
        |s| s.yellow(),
    );
    print_bucket(&format!("Low Severity Messages ({low})"), &buckets.low, |s| {
        s.blue()
    });
}

fn print_bucket(
    title: &str,
    records: &[AlertRecord],
    paint: impl Fn(&str) -> colored::ColoredString,
) {
    println!("{}", title.bold());
    if records.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for record in records {
        println!("  {}", paint(&record.message));
    }
    println!();
}

fn print_sample_json(buckets: &SeverityBuckets) -> Result<()> {
    let value = serde_json::json!({
        "chart": buckets.chart(),
        "high": buckets.high,
        "medium": buckets.medium,
        "low": buckets.low,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// alertdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective alertdash Configuration".bold().cyan());
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
    print_source("~/.alertdash/config.toml", global_exists);
    print_source(".alertdash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "ALERTDASH_* environment variables".dimmed()
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

/// Initialize a default config file at `~/.alertdash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Set llm.api_key (or ALERTDASH_API_KEY) to enable the chatbot.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    let shown = if key == "llm.api_key" { "********" } else { value };
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), shown);
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
