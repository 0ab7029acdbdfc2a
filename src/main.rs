//! Crime ETL tools - command line entry point
//!
//! Drives the `rss_scraper` and `postgres_loader` tools by hand, the same way
//! an orchestrator would call them.

use clap::{Parser, Subcommand};
use crime_etl_tools::config::EtlConfig;
use crime_etl_tools::error::{EtlError, EtlResult};
use crime_etl_tools::loader::LOAD_ERROR_PREFIX;
use crime_etl_tools::observability::init_default_logging;
use crime_etl_tools::tools::ToolSystem;
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};

/// RSS fetching and PostgreSQL loading tools for crime news ETL
#[derive(Parser)]
#[command(name = "crime-etl")]
#[command(about = "RSS feed fetching and crime article loading tools")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch raw XML from feed URLs and print it as JSON
    Fetch {
        /// Feed URL (repeatable, order is preserved)
        #[arg(long = "url", value_name = "URL", required = true)]
        urls: Vec<String>,
    },
    /// Insert crime articles from a JSON file ("-" reads stdin)
    Load {
        /// JSON array of articles, or an object with an "articles" array
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// List registered tools and their parameter schemas
    Tools,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting crime-etl v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e.public_message());
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Fetch { urls } => run_tool(&config, "rss_scraper", json!({ "urls": urls })).await,
        Commands::Load { file } => load_file(&config, &file).await,
        Commands::Tools => list_tools(&config).await,
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!(kind = ?e.kind(), "Command failed: {}", e.public_message());
        process::exit(1);
    }
}

fn load_configuration(config_path: Option<&Path>) -> EtlResult<EtlConfig> {
    if let Some(path) = config_path {
        info!("Loading configuration from: {}", path.display());
        return Ok(EtlConfig::load_from_file(path)?);
    }

    for path_str in ["crime-etl.toml", "config/crime-etl.toml"] {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading configuration from: {}", path.display());
            return Ok(EtlConfig::load_from_file(&path)?);
        }
    }

    info!("No configuration file found, using defaults");
    Ok(EtlConfig::default())
}

async fn load_file(config: &EtlConfig, path: &Path) -> EtlResult<()> {
    let articles = read_articles(path)?;
    run_tool(config, "postgres_loader", json!({ "articles": articles })).await
}

/// Accepts either a bare array or `{"articles": [...]}`
fn read_articles(path: &Path) -> EtlResult<Value> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content).map(|_| content)
    } else {
        std::fs::read_to_string(path)
    }
    .map_err(|e| EtlError::invalid_input(format!("cannot read {}: {e}", path.display())))?;

    let value: Value = serde_json::from_str(&content)
        .map_err(|e| EtlError::invalid_input(format!("articles are not valid JSON: {e}")))?;
    match value {
        Value::Array(_) => Ok(value),
        Value::Object(mut map) => map
            .remove("articles")
            .ok_or_else(|| EtlError::invalid_input("expected an \"articles\" array")),
        _ => Err(EtlError::invalid_input("expected a JSON array of articles")),
    }
}

async fn run_tool(config: &EtlConfig, tool_name: &str, parameters: Value) -> EtlResult<()> {
    let mut tool_system = ToolSystem::new();
    tool_system.initialize(config).await?;

    let output = tool_system.execute_tool(tool_name, &parameters).await;
    tool_system.shutdown().await?;

    match output? {
        Value::String(status) => {
            println!("{status}");
            // postgres_loader reports a rolled-back batch as a status string
            if status.starts_with(LOAD_ERROR_PREFIX) {
                return Err(EtlError::database(status));
            }
        }
        other => println!("{}", to_pretty_json(&other)?),
    }

    Ok(())
}

async fn list_tools(config: &EtlConfig) -> EtlResult<()> {
    let mut tool_system = ToolSystem::new();
    tool_system.initialize(config).await?;

    for name in tool_system.list_tools() {
        if let Some(description) = tool_system.describe_tool(&name) {
            println!("{} - {}", description.name, description.description);
            println!("{}", to_pretty_json(&description.parameters)?);
        }
    }

    tool_system.shutdown().await?;
    Ok(())
}

fn to_pretty_json(value: &Value) -> EtlResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| EtlError::internal(e.to_string()))
}

fn handle_config_command(config: &EtlConfig, show: bool) -> EtlResult<()> {
    if show {
        let rendered = toml::to_string_pretty(config)
            .map_err(|e| EtlError::internal(format!("cannot render configuration: {e}")))?;
        println!("Current configuration:");
        println!("{rendered}");
    }

    info!("Configuration validation complete");
    Ok(())
}
