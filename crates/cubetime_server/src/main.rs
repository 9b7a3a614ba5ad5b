use anyhow::Context;
use cubetime_core::{init_logging, open_db};
use cubetime_server::{build_router, AppState, Config};
use log::{error, info};
use std::future::Future;
use std::io;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logging(&config.log_level, &config.log_dir.to_string_lossy())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let app = build_router(AppState::new(conn));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        "event=server_start module=server status=ok addr={addr} db_path={} log_dir={}",
        config.db_path.display(),
        config.log_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires, or right away if it could not be installed.
async fn wait_for_signal(signal: impl Future<Output = io::Result<()>>) {
    if let Err(err) = signal.await {
        error!("event=shutdown_signal module=server status=error error_code=signal_install_failed error={err}");
    }
}
