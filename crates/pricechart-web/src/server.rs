//! HTTP surface for a pre-rendered dashboard.

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use pricechart_core::{DashboardConfig, PriceSeries};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::WebError;
use crate::page::Dashboard;

/// Immutable response bodies shared by every request.
#[derive(Debug, Clone)]
pub struct DashboardState {
    page: Bytes,
    series_json: Bytes,
}

impl DashboardState {
    /// Render the page and serialize the series once, up front.
    pub fn new(config: &DashboardConfig, series: &PriceSeries) -> Result<Self, WebError> {
        let page = Dashboard::from_series(config, series).render_html();
        let series_json = serde_json::to_vec(series)?;
        Ok(Self {
            page: Bytes::from(page),
            series_json: Bytes::from(series_json),
        })
    }
}

pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/series", get(series))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: DashboardState, addr: SocketAddr) -> Result<(), WebError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| WebError::Bind { addr, source })?;
    let local = listener.local_addr()?;
    info!("dashboard listening on http://{local}");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index(State(state): State<DashboardState>) -> impl IntoResponse {
    Html(state.page)
}

async fn series(State(state): State<DashboardState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.series_json,
    )
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
