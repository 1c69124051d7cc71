use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use alertdash::{cli, config};

#[derive(Debug, Parser)]
#[command(name = "alertdash")]
#[command(about = "Disaster alert dashboard with a document-grounded response chatbot")]
#[command(version)]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web dashboard
    Serve {
        /// Listen address (overrides server.addr)
        #[arg(long)]
        addr: Option<String>,
        /// Open the dashboard in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Check configuration, API key, completion client and document link
    Health,
    /// Print the response steps for a disaster type (Wildfire, Earthquake, Flood)
    Guide {
        disaster_type: String,
    },
    /// Print a categorized random sample of generated alerts
    Sample {
        /// Number of alerts to draw (defaults to dashboard.sample_size)
        #[arg(long)]
        size: Option<usize>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
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
    /// Write a default config to ~/.alertdash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a single value, e.g. `llm.model deepseek-chat`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn init_tracing() {
    // RUST_LOG wins over logging.level from config.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config::load().logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let app = App::parse();
    init_tracing();

    match app.command {
        Commands::Serve { addr, open } => cli::run_serve(addr, open),
        Commands::Health => cli::run_health(),
        Commands::Guide { disaster_type } => cli::run_guide(&disaster_type),
        Commands::Sample { size, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_sample(size, fmt)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
