//! Notesum CLI - note summaries over HTTP

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use notesum_core::config::Config;
use notesum_core::storage::Database;
use notesum_core::summary::SummaryService;
use notesum_server::{AppState, router};
use tracing::info;

#[derive(Parser)]
#[command(name = "notesum")]
#[command(author, version, about = "Notes with generated summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides server.bind_addr)
        #[arg(long)]
        bind: Option<String>,
        /// SQLite database file (overrides database.path)
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Summarize text once and print the result
    Summarize {
        /// Text to summarize
        text: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check system health
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notesum=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, database } => cmd_serve(bind, database).await,
        Commands::Summarize { text } => cmd_summarize(&text).await,
        Commands::Config { action } => cmd_config(action, cli.quiet),
        Commands::Doctor => cmd_doctor(cli.quiet).await,
    }
}

async fn cmd_serve(bind: Option<String>, database: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(bind) = bind {
        config.set("server.bind_addr", &bind)?;
    }
    if let Some(path) = database {
        config.database.path = path;
    }

    let state = AppState::from_config(&config).await?;
    let app = router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

async fn cmd_summarize(text: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let summaries = SummaryService::from_config(&config.llm)?;
    let summary = summaries.summarize(text).await?;
    println!("{}", summary);
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Notesum Health Check");
        println!("====================");
        println!();
    }

    let mut all_ok = true;

    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            println!("[!!] Configuration: Error - {}", e);
            anyhow::bail!("Configuration is invalid");
        }
    };

    match config.llm.resolved_api_key() {
        Ok(Some(_)) => {
            if !quiet {
                let redacted = config.llm.redacted_api_key()?.unwrap_or_default();
                println!("[OK] Summarizer: completion API ({})", redacted);
            }
        }
        Ok(None) => {
            if !quiet {
                println!("[--] Summarizer: fallback (no API key)");
                println!("     Set NOTESUM_API_KEY or DEEPSEEK_API_KEY to use the completion API");
            }
        }
        Err(e) => {
            all_ok = false;
            println!("[!!] Summarizer: Error - {}", e);
        }
    }

    match Database::from_settings(&config.database).await {
        Ok(db) => {
            match db.health_check().await {
                Ok(()) => {
                    if !quiet {
                        let status = db.migration_status().await?;
                        println!(
                            "[OK] Database: {} (schema v{})",
                            db.path().display(),
                            status.current_version
                        );
                    }
                }
                Err(e) => {
                    all_ok = false;
                    println!("[!!] Database: {}", e);
                }
            }
            db.close().await;
        }
        Err(e) => {
            all_ok = false;
            println!("[!!] Database: {}", e);
        }
    }

    if !quiet {
        match Config::config_path() {
            Ok(path) if path.exists() => println!("[OK] Config file: {}", path.display()),
            Ok(path) => println!("[--] Config file: {} (using defaults)", path.display()),
            Err(e) => println!("[!!] Config file: {}", e),
        }
        println!();
    }

    if all_ok {
        if !quiet {
            println!("All checks passed.");
        }
        Ok(())
    } else {
        anyhow::bail!("Some checks failed")
    }
}
