//! `serve` subcommand — run the HTTP API until Ctrl+C.

use super::{AmixerCli, Config, Result, ensure_valid};
use crate::server::{self, AppState};

pub(super) fn cmd_serve(config: Config) -> Result<()> {
    ensure_valid(&config)?;
    let addr = config.socket_addr()?;

    let source = AmixerCli::new(&config.amixer_path, config.card_index);
    let state = AppState::new(Box::new(source), config.strict_updates);
    let app = server::router(state, &config.cors_allowed_origins);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!(
            "Serving card {} via {} on http://{addr}",
            config.card_index,
            config.amixer_path
        );
        if config.strict_updates {
            log::info!("Strict updates enabled");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        log::info!("Server stopped");
        Ok(())
    })
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => {
            // Without a handler the server can only be killed
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
