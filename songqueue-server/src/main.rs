//! # SongQueue Server
//!
//! Shared song-request queue with live updates.
//!
//! Requesters add songs over HTTP, operators mark them done or skipped, and
//! every connected viewer receives each change over a websocket as it
//! happens. Entries live in a single SQLite file.

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use songqueue_core::database::SqliteDatabase;
use songqueue_server::{
    AppState,
    infra::config::{Config, ConfigLoad, ConfigLoader},
    routes,
};
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "songqueue-server")]
#[command(about = "Song request queue with realtime websocket updates")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Path to a songqueue.toml configuration file
    #[arg(short, long, env = "SONGQUEUE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_runtime_config(&cli.serve)?;

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        return run_db_migrate(&config).await;
    }

    run_server(config).await
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Arc<Config>> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config.clone() {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    Ok(Arc::new(config))
}

async fn open_database(config: &Config) -> anyhow::Result<SqliteDatabase> {
    let db = SqliteDatabase::connect(
        &config.database.url,
        config.database.max_connections,
    )
    .await
    .with_context(|| {
        format!("failed to open database at {}", config.database.url)
    })?;
    db.initialize_schema()
        .await
        .context("database migration failed")?;
    Ok(db)
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    db.close().await;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(config: Arc<Config>) -> anyhow::Result<()> {
    let db = Arc::new(open_database(&config).await?);
    info!(url = %config.database.url, "database ready");

    let state = AppState::new(Arc::clone(&config), Arc::clone(&db));
    let router = routes::create_app(state);

    let addr = config.bind_address();
    match config.static_files.root.as_ref() {
        Some(root) => info!(root = %root.display(), "serving web UI"),
        None => info!("no static root configured; serving API only"),
    }
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "SongQueue server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
