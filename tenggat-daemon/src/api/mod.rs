mod endpoints;
mod errors;

use crate::{api::endpoints::*, store::Store, worker::Reminders};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub reminders: Reminders,
}

pub fn router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
        .on_failure(DefaultOnFailure::new().level(Level::WARN));

    Router::new()
        .route(
            "/api/tasks",
            get(list_tasks_endpoint)
                .post(create_task_endpoint)
                .delete(delete_all_tasks_endpoint),
        )
        .route(
            "/api/tasks/:id",
            get(find_task_endpoint)
                .put(edit_task_endpoint)
                .delete(delete_task_endpoint),
        )
        .route("/api/tasks/:id/toggle", post(toggle_task_endpoint))
        .route("/api/summary", get(summary_endpoint))
        .route(
            "/api/settings",
            get(get_settings_endpoint).put(update_settings_endpoint),
        )
        .route("/api/settings/test", post(test_settings_endpoint))
        .layer(trace_layer)
        .with_state(state)
}

#[tracing::instrument(skip_all)]
pub async fn run(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind address")?;
    tracing::info!("Listening at http://{addr}");

    axum::serve(listener, router(state))
        .await
        .context("Failed to serve HTTP")
}
