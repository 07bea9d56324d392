//! SpeedyAI CLI - relay server for the SpeedyAI Roblox plugin.

use clap::{Parser, Subcommand};
use speedyai::api::{create_router_with_state, AppState};
use speedyai::config::{Config, LogVerbosity};
use speedyai::provider::{AnthropicProvider, GeminiProvider, OpenAiProvider, ProviderSet};
use std::net::SocketAddr;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "speedyai")]
#[command(about = "Relay prompts from the SpeedyAI Roblox plugin to hosted AI providers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Log verbosity level (defaults to the config file setting)
        #[arg(short, long, value_enum)]
        log_level: Option<LogLevel>,

        /// Config file path
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum LogLevel {
    Minimal,
    Compact,
    Verbose,
}

impl From<LogLevel> for LogVerbosity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Minimal => LogVerbosity::Minimal,
            LogLevel::Compact => LogVerbosity::Compact,
            LogLevel::Verbose => LogVerbosity::Verbose,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, log_level, config }) => {
            run_server(port, log_level, config).await?;
        }
        Some(Commands::Config { path }) => {
            show_config(path)?;
        }
        None => {
            run_server(None, None, None).await?;
        }
    }

    Ok(())
}

async fn run_server(
    port_override: Option<u16>,
    log_level: Option<LogLevel>,
    config_path: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut config = config.with_env_overrides();

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(level) = log_level {
        config.app.log_verbosity = level.into();
    }

    let host: std::net::IpAddr = config.gateway.host.parse()?;
    let addr = SocketAddr::new(host, config.gateway.port);

    let state = AppState::from_config(&config);
    let app = create_router_with_state(state);

    let configured = ProviderSet::configured(&config.providers);
    for name in [OpenAiProvider::NAME, GeminiProvider::NAME, AnthropicProvider::NAME] {
        if !configured.contains(&name) {
            tracing::warn!("No API key for {}; its routes will fail", name);
        }
    }

    match config.app.log_verbosity {
        LogVerbosity::Minimal => {
            println!("speedyai:{}", config.gateway.port);
        }
        LogVerbosity::Compact => {
            println!("→ SpeedyAI relay starting on http://{}", addr);
            println!("→ Providers: {}", provider_list(&configured));
        }
        LogVerbosity::Verbose => {
            println!("────────────────────────────────────────");
            println!("SpeedyAI v{}", env!("CARGO_PKG_VERSION"));
            println!("────────────────────────────────────────");
            println!("Relay:      http://{}", addr);
            println!("Health:     http://{}/health", addr);
            println!("Logs:       http://{}/logs", addr);
            println!("Providers:  {}", provider_list(&configured));
            println!(
                "Forwarding: {}",
                config.forwarding.url.as_deref().unwrap_or("off")
            );
            println!("────────────────────────────────────────");
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Relay listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\nRelay stopped.");
    Ok(())
}

fn provider_list(configured: &[&str]) -> String {
    if configured.is_empty() {
        "none configured".to_string()
    } else {
        configured.join(", ")
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

fn show_config(show_path: bool) -> anyhow::Result<()> {
    if show_path {
        println!("{}", Config::default_path().display());
        return Ok(());
    }

    let config = Config::load()?.with_env_overrides();
    println!("{}", config.to_redacted_toml()?);
    Ok(())
}
