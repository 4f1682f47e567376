/**
 * API HTTP HOSTWATCH - Serveur HTTP exposant l'utilisation CPU / mémoire de l'hôte
 *
 * RÔLE :
 * Chaque requête échantillonne l'OS (via `MetricsSource`), applique le seuil
 * statique de 80% et sérialise la réponse.
 *
 * ROUTES :
 * - GET /         page HTML (CPU instantané + mémoire, warning si > 80%)
 * - GET /metrics  JSON {"cpu", "mem"} (CPU moyenné sur la fenêtre configurée)
 * - GET /health   liveness, ne touche pas à l'OS
 *
 * ERREURS :
 * - Échec de la sonde OS -> 500 avec un corps générique, la cause reste dans les logs
 * - Pas de retry, pas de cache, pas d'état partagé entre requêtes
 */

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;

use crate::error::MetricsError;
use crate::metrics::{self, MetricsSample, MetricsSource};
use crate::page::{render_index, IndexView};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MetricsSource>,
    pub cpu_window: Duration,
}

impl AppState {
    pub fn new(source: Arc<dyn MetricsSource>) -> Self {
        Self { source, cpu_window: metrics::CPU_WINDOW }
    }
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/metrics", get(get_metrics))
        .route("/health", get(|| async { "ok" }))
        .with_state(app_state)
}

// GET / (page HTML)
async fn index(State(app): State<AppState>) -> Result<Html<String>, MetricsError> {
    let sample = metrics::sample_instant(app.source.as_ref())?;
    Ok(Html(render_index(&IndexView::from(&sample))))
}

// GET /metrics (JSON, pas de warning)
async fn get_metrics(State(app): State<AppState>) -> Result<Json<MetricsSample>, MetricsError> {
    let sample = metrics::sample_windowed(app.source.as_ref(), app.cpu_window).await?;
    Ok(Json(sample))
}
