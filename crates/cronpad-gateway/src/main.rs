use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod app;
mod cli;
mod http;

use cli::{Cli, Commands};
use cronpad_core::config::CronpadConfig;
use cronpad_store::{CrontabCli, TableManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cronpad_gateway=info,cronpad_store=info,cronpad_table=info,tower_http=debug".into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    // load config: --config > CRONPAD_CONFIG env > ~/.cronpad/cronpad.toml
    let config = CronpadConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        CronpadConfig::default()
    });

    let store = CrontabCli::from_config(&config.store);
    let tables = TableManager::new(Arc::new(store));

    match cli.command.unwrap_or(Commands::Serve {
        bind: None,
        port: None,
    }) {
        Commands::Show => show(&tables).await,
        Commands::Serve { bind, port } => serve(config, tables, bind, port).await,
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

async fn show(tables: &TableManager) -> anyhow::Result<()> {
    let outcome = tables.fetch().await?;
    for line in &outcome.skipped {
        warn!(line = %line, "not shown: unrecognized line");
    }
    println!("{}", serde_json::to_string_pretty(&outcome.entries)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// serve
// ---------------------------------------------------------------------------

async fn serve(
    mut config: CronpadConfig,
    tables: TableManager,
    bind: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        config.gateway.bind = bind;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    info!(
        store = tables.store_name(),
        program = %config.store.program,
        timeout_secs = config.store.effective_timeout_secs(),
        "store configured"
    );

    let state = Arc::new(app::AppState::new(config, tables));
    let router = app::build_router(state);

    info!("Cronpad gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Cronpad gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
}
