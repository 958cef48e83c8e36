//! `clinica_server` entry point.
//!
//! Startup order: configuration → logging → database → router → listener.

use clap::Parser;
use clinica_core::db::{open_db, open_db_in_memory};
use clinica_core::{core_version, init_logging};
use clinica_server::{create_router, AppState, DatabaseLocation, ServerConfig};
use log::{error, info, warn};
use std::error::Error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();

    if let Err(err) = init_logging(config.log_level(), config.log_dir.as_deref()) {
        eprintln!("clinica_server: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    let conn = match config.database_location() {
        DatabaseLocation::Memory => open_db_in_memory()?,
        DatabaseLocation::File(path) => open_db(path)?,
    };

    let app = create_router(AppState::new(conn));
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=server status=ok bind={} version={}",
        listener.local_addr()?,
        core_version()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
