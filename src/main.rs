use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use startup_blog::config::ConfigError;
use startup_blog::{AppConfig, AppState, assistant::AssistError, server};

/// startup-blog - blog backend with an AI writing assistant
#[derive(Parser)]
#[command(name = "startup-blog")]
#[command(about = "Startup blog API server with Gemini-powered writing assistance")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeCommand),
    /// Send a test prompt to Gemini and print the reply
    Check,
}

/// Run the HTTP API server
#[derive(Parser)]
struct ServeCommand {
    /// Interface to bind (overrides HOST)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(cmd) => handle_serve(cmd).await,
        Commands::Check => handle_check().await,
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Configuration problems are user errors; everything else is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<ConfigError>()
            || matches!(
                cause.downcast_ref::<AssistError>(),
                Some(AssistError::ServiceUnavailable)
            )
    })
}

/// Handles the serve command by starting the HTTP server.
async fn handle_serve(cmd: ServeCommand) -> Result<()> {
    let config = apply_overrides(AppConfig::from_env()?, cmd);
    let state = AppState::from_config(&config)?;

    server::serve(&config, state).await
}

/// Command-line flags take precedence over the environment.
fn apply_overrides(mut config: AppConfig, cmd: ServeCommand) -> AppConfig {
    if let Some(host) = cmd.host {
        config.host = host;
    }
    if let Some(port) = cmd.port {
        config.port = port;
    }
    if let Some(database) = cmd.database {
        config.database_path = database;
    }
    config
}

/// Handles the check command by sending a single test prompt.
async fn handle_check() -> Result<()> {
    let config = AppConfig::from_env()?;
    let assistant = server::assistant_from_config(&config)?;

    let reply = assistant
        .test_connection()
        .await
        .context("Gemini connection test failed")?;

    println!("Model: {}", config.model);
    println!("Response: {}", reply.trim());
    Ok(())
}
