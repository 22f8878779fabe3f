use crate::{
    config::Config,
    errors::{AppError, AppResult},
    guard::PathGuard,
    lister::{self, DirEntry},
    security::ListLimiter,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::{sync::Arc, time::Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub guard: Arc<PathGuard>,
    pub limiter: ListLimiter,
}

impl AppState {
    pub fn new(cfg: Config, guard: PathGuard) -> Self {
        let limiter = ListLimiter::new(cfg.limits.requests_per_second, cfg.limits.burst);
        Self { cfg: Arc::new(cfg), guard: Arc::new(guard), limiter }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub path: Option<String>,
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr: std::net::SocketAddr =
        format!("{}:{}", state.cfg.server.bind_addr, state.cfg.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let app = build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cfg.cors.allowed_origins);
    let router = Router::new()
        .route("/api/health", get(health))
        .route("/api/fs/list", get(list_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    match cors {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(CorsLayer::new().allow_origin(origins).allow_methods([Method::GET]))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"ok": true})))
}

async fn list_dir(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let requested = query
        .as_ref()
        .ok()
        .and_then(|Query(p)| p.path.clone())
        .unwrap_or_default();

    match list_approved(&state, query).await {
        Ok(entries) => {
            audit(&request_id, &requested, "allow", "OK", started, entries.len());
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(e) => {
            let decision = match &e {
                AppError::Forbidden | AppError::RateLimited => "deny",
                _ => "error",
            };
            audit(&request_id, &requested, decision, e.code(), started, 0);
            e.into_response()
        }
    }
}

async fn list_approved(
    state: &AppState,
    query: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Vec<DirEntry>> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let path = params.path.filter(|p| !p.is_empty()).ok_or(AppError::MissingPath)?;
    state.limiter.check()?;

    let guard = state.guard.clone();
    tokio::task::spawn_blocking(move || -> AppResult<Vec<DirEntry>> {
        let approved = guard.authorize(&path)?;
        Ok(lister::list(&approved)?)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

fn audit(request_id: &str, path: &str, decision: &str, code: &str, started: Instant, entries: usize) {
    tracing::info!(
        request_id = request_id,
        path = path,
        decision = decision,
        code = code,
        duration_ms = started.elapsed().as_millis() as u64,
        entries = entries,
        "audit"
    );
}
