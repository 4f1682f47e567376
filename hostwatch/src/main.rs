/**
 * HOSTWATCH - Point d'entrée principal du serveur
 *
 * RÔLE : Bootstrap : .env, config, logging, sonde OS, routeur HTTP.
 * Le routeur est construit ici et vit jusqu'à l'arrêt (Ctrl-C / SIGTERM).
 */

mod config;
mod error;
mod http;
mod logging;
mod metrics;
mod page;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::http::AppState;
use crate::metrics::SysinfoSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    let cfg = config::load_config().await.context("Failed to load configuration")?;
    logging::init(cfg.debug);
    info!(debug = cfg.debug, "hostwatch {} starting", env!("CARGO_PKG_VERSION"));

    let source = SysinfoSource::new().context("Failed to initialize OS metrics")?;
    let app = http::build_router(AppState::new(Arc::new(source)));

    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("hostwatch stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
