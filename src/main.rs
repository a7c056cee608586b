//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
#[cfg(test)]
mod test_utils;

use crate::config::{AppConfig, AppState};
use crate::middleware::auth::session_guard;

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de leitura por período (protegidas pela sessão)
    let booking_routes = Router::new()
        .route("/overview", get(handlers::bookings::get_overview))
        .route("/rooms", get(handlers::bookings::get_room_statistics))
        .route("/sources", get(handlers::bookings::get_source_breakdown))
        .route("/sources/{source}", get(handlers::bookings::get_source_details))
        .route("/trend", get(handlers::bookings::get_trend_indicator))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_guard,
        ));

    // A tela do dashboard, com seleção de período/origem por usuário
    let dashboard_routes = Router::new()
        .route("/view", get(handlers::dashboard::get_view))
        .route("/view/period", put(handlers::dashboard::select_period))
        .route(
            "/view/source",
            put(handlers::dashboard::select_source).delete(handlers::dashboard::clear_source),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/bookings", booking_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;
    let app = build_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
