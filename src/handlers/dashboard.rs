// src/handlers/dashboard.rs

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentSession,
    models::{booking::Period, dashboard::DashboardSnapshot},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SelectPeriodPayload {
    #[validate(range(min = 2023, max = 2025, message = "Ano fora dos períodos suportados."))]
    #[schema(example = 2024)]
    pub year: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SelectSourcePayload {
    #[validate(length(min = 1, max = 64, message = "O nome da origem deve ter entre 1 e 64 caracteres."))]
    #[schema(example = "Booking.com")]
    pub source: String,
}

// GET /api/dashboard/view
#[utoipa::path(
    get,
    path = "/api/dashboard/view",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Estado atual da tela de reservas", body = DashboardSnapshot),
        (status = 401, description = "Sem sessão")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_view(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<DashboardSnapshot> {
    Json(
        app_state
            .views
            .snapshot(&app_state.bookings_service, &session)
            .await,
    )
}

// PUT /api/dashboard/view/period
#[utoipa::path(
    put,
    path = "/api/dashboard/view/period",
    tag = "Dashboard",
    request_body = SelectPeriodPayload,
    responses(
        (status = 200, description = "Período trocado; os dados chegam em segundo plano", body = DashboardSnapshot),
        (status = 400, description = "Ano inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn select_period(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<SelectPeriodPayload>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let period = Period::try_from(payload.year)?;

    let snapshot = app_state
        .views
        .select_period(&app_state.bookings_service, &session, period)
        .await;
    Ok(Json(snapshot))
}

// PUT /api/dashboard/view/source
#[utoipa::path(
    put,
    path = "/api/dashboard/view/source",
    tag = "Dashboard",
    request_body = SelectSourcePayload,
    responses(
        (status = 200, description = "Origem aberta no detalhe", body = DashboardSnapshot),
        (status = 404, description = "Origem desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn select_source(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<SelectSourcePayload>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let source = app_state.bookings_service.parse_source(&payload.source)?;

    let snapshot = app_state
        .views
        .select_source(&app_state.bookings_service, &session, Some(source))
        .await;
    Ok(Json(snapshot))
}

// DELETE /api/dashboard/view/source
#[utoipa::path(
    delete,
    path = "/api/dashboard/view/source",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Detalhe da origem fechado", body = DashboardSnapshot)
    ),
    security(("api_jwt" = []))
)]
pub async fn clear_source(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<DashboardSnapshot> {
    Json(
        app_state
            .views
            .select_source(&app_state.bookings_service, &session, None)
            .await,
    )
}
