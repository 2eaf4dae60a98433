use std::io;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Settings;

pub mod api;
pub mod routes;

/// All requests go through [routes::route_request]; axum only supplies the
/// transport and request tracing.
pub fn build_router(settings: Arc<Settings>) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(settings)
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(
    State(settings): State<Arc<Settings>>,
    method: Method,
    uri: Uri,
    body: String,
) -> routes::HttpResponse {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    routes::route_request(method.as_str(), path, &body, &settings)
}

pub async fn serve(settings: Arc<Settings>) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(settings.bind.as_str()).await?;
    info!(addr = %settings.bind, "crsplit server listening");
    axum::serve(listener, build_router(settings)).await
}

/// Blocking entry point used by the CLI.
pub fn run_server(settings: &Settings) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(serve(Arc::new(settings.clone())))
}
