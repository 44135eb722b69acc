//! Development server: live manifests plus static files.
//!
//! A middleware inspects every request path. Paths ending in one of the
//! manifest endpoints (`/__dev-collage-manifest`, `/__dev-approach-manifest`,
//! `/__dev-prototype-manifest`) are answered with a fresh scan; everything
//! else falls through to static file serving of the public directory.
//!
//! Manifest responses always carry `Cache-Control: no-store` so the browser
//! never serves a stale snapshot to the polling client. A failed scan answers
//! `500` with a JSON `{"error": ...}` body and logs the real cause.

use crate::cache::{self, ManifestCache};
use crate::category::Category;
use crate::imaging::RustBackend;
use crate::scan::{Manifest, ScanError, ScanSettings, build_manifest};
use axum::{
    Json, Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Shared state for manifest requests.
#[derive(Clone)]
pub struct AppState {
    pub projects_root: PathBuf,
    pub settings: Arc<ScanSettings>,
    /// `None` rescans on every request.
    pub cache: Option<Arc<Mutex<ManifestCache>>>,
}

impl AppState {
    pub fn new(projects_root: PathBuf, settings: ScanSettings, use_cache: bool) -> Self {
        Self {
            projects_root,
            settings: Arc::new(settings),
            cache: use_cache.then(|| Arc::new(Mutex::new(ManifestCache::new()))),
        }
    }

    /// Build (or fetch from cache) the manifest for a category. Blocking.
    pub fn manifest(&self, category: Category) -> Result<Arc<Manifest>, ScanError> {
        let build = || {
            build_manifest(
                &self.projects_root,
                category,
                &RustBackend::new(),
                &self.settings,
            )
        };
        match &self.cache {
            Some(cache) => cache::build_cached(cache, &self.projects_root, category, build),
            None => build().map(Arc::new),
        }
    }
}

/// Build the router. With `public_dir` set, non-manifest requests serve
/// files from it; otherwise they get a 404.
pub fn create_router(state: AppState, public_dir: Option<PathBuf>) -> Router {
    let router = match public_dir {
        Some(dir) => Router::new().fallback_service(ServeDir::new(dir)),
        None => Router::new().fallback(not_found),
    };

    router
        .layer(middleware::from_fn_with_state(state, manifest_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the process is stopped.
pub async fn serve(
    state: AppState,
    public_dir: Option<PathBuf>,
    addr: SocketAddr,
) -> std::io::Result<()> {
    let app = create_router(state, public_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Dev manifest server listening on http://{}", addr);
    for category in Category::ALL {
        tracing::info!("  {} → http://{}/{}", category, addr, category.endpoint());
    }
    axum::serve(listener, app).await
}

async fn manifest_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match Category::from_endpoint_path(req.uri().path()) {
        Some(category) => manifest_response(state, category).await,
        None => next.run(req).await,
    }
}

/// Run the scan off the async runtime and turn the outcome into a response.
async fn manifest_response(state: AppState, category: Category) -> Response {
    let result = tokio::task::spawn_blocking(move || state.manifest(category)).await;

    let body = match result {
        Ok(Ok(manifest)) => serde_json::to_string(&*manifest).map_err(|e| e.to_string()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("scan task failed: {e}")),
    };

    match body {
        Ok(json) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            json,
        )
            .into_response(),
        Err(msg) => {
            tracing::error!("[dev-{}-manifest] {}", category, msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CACHE_CONTROL, "no-store")],
                Json(serde_json::json!({
                    "error": format!("Failed to build dev {category} manifest.")
                })),
            )
                .into_response()
        }
    }
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}
