use super::assets::index_page;
use super::layout::{DEFAULT_MAX_TICKS, Viewport, settle};
use super::{LinkGraph, Neighborhood, neighborhood, resolve_start};
use crate::config::ViewerConfig;
use crate::style;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

/// Application state shared across handlers
pub struct AppState {
    pub graph: LinkGraph,
    pub viewer: ViewerConfig,
}

impl AppState {
    pub fn new(graph: LinkGraph, viewer: ViewerConfig) -> Self {
        Self { graph, viewer }
    }

    /// Requested hops are clamped to `viewer.max_hops`.
    fn neighborhood_for(&self, current: Option<&str>, hops: Option<usize>) -> Neighborhood {
        let hops = self.viewer.clamp_hops(hops);
        let location = current.unwrap_or("/");
        match resolve_start(&self.graph, location, &self.viewer.section_root) {
            Some(start) => neighborhood(&self.graph, start, hops),
            None => Neighborhood::empty(hops),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NeighborhoodQuery {
    pub current: Option<String>,
    pub hops: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    pub current: Option<String>,
    pub hops: Option<usize>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/graph.json", get(document_handler))
        .route("/api/neighborhood", get(neighborhood_handler))
        .route("/api/layout", get(layout_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server for the graph viewer
pub async fn serve(state: AppState, port: u16, open_browser: bool) -> std::io::Result<()> {
    let nodes = state.graph.node_count();
    let app = router(Arc::new(state));

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, nodes, "Serving graph viewer");

    style::header("Starting sitegraph viewer...");
    style::status(&format!("Open in browser: {}", style::url(&url)));
    style::hint("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    axum::serve(listener, app).await
}

async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(index_page(&state.viewer))
}

async fn document_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.graph.document().clone())
}

async fn neighborhood_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NeighborhoodQuery>,
) -> impl IntoResponse {
    let hood = state.neighborhood_for(query.current.as_deref(), query.hops);
    debug!(current = ?query.current, start = ?hood.start, nodes = hood.nodes.len(), "Neighborhood request");
    Json(hood)
}

/// The simulation is CPU-bound, so it runs on the blocking pool instead of
/// a runtime worker.
async fn layout_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LayoutQuery>,
) -> Response {
    let defaults = Viewport::default();
    let viewport = Viewport::new(
        query.width.unwrap_or(defaults.width),
        query.height.unwrap_or(defaults.height),
    );

    let task = tokio::task::spawn_blocking(move || {
        let hood = state.neighborhood_for(query.current.as_deref(), query.hops);
        settle(&hood, viewport, DEFAULT_MAX_TICKS)
    });

    match task.await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            error!(error = %e, "Layout task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "layout failed").into_response()
        }
    }
}
