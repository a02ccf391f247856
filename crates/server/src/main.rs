use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use server_api::{parse_payment_form, send_payment, ApiContext};
use shared::{
    error::ApiError,
    protocol::{send_payment_route, OrderReceipt},
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_database_url};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, route = send_payment_route(), "storefront server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(send_payment_route(), post(http_send_payment))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|error| {
        warn!(%error, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

/// Accepts the form as raw JSON text regardless of content type. Every
/// failure is answered with a bare 500 so callers cannot tell causes apart.
async fn http_send_payment(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<OrderReceipt>, StatusCode> {
    let form = parse_payment_form(&body).map_err(payment_failure)?;
    let receipt = send_payment(&state.api, &form)
        .await
        .map_err(payment_failure)?;
    Ok(Json(receipt))
}

fn payment_failure(err: ApiError) -> StatusCode {
    error!(code = ?err.code, message = %err.message, "payment request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
