// src/handlers/bookings.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentSession,
    models::{
        booking::{Period, RoomStatistic, SourceBreakdown},
        dashboard::{BookingsOverview, SourceDetails, TrendIndicator},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// Ano do período (2023, 2024 ou 2025). Padrão: 2024.
    pub year: Option<i32>,
}

impl PeriodQuery {
    fn period(&self) -> Result<Period, AppError> {
        self.year.map(Period::try_from).unwrap_or(Ok(Period::default()))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    /// Variação percentual (com sinal)
    pub value: Decimal,
    /// Inverte o que conta como favorável (ex: cancelamentos)
    #[serde(default)]
    pub invert: bool,
}

// GET /api/bookings/overview
#[utoipa::path(
    get,
    path = "/api/bookings/overview",
    tag = "Bookings",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Cards, origens, quartos e gráficos do período", body = BookingsOverview),
        (status = 400, description = "Período não suportado"),
        (status = 401, description = "Sem sessão"),
        (status = 422, description = "Linhas inconsistentes"),
        (status = 502, description = "Falha na consulta ao banco")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    _session: CurrentSession,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.bookings_service.overview(query.period()?).await?;
    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/bookings/rooms
#[utoipa::path(
    get,
    path = "/api/bookings/rooms",
    tag = "Bookings",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Estatísticas por tipo de quarto", body = Vec<RoomStatistic>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_room_statistics(
    State(app_state): State<AppState>,
    _session: CurrentSession,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.bookings_service.room_statistics(query.period()?).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/bookings/sources
#[utoipa::path(
    get,
    path = "/api/bookings/sources",
    tag = "Bookings",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Reservas por origem", body = SourceBreakdown)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_source_breakdown(
    State(app_state): State<AppState>,
    _session: CurrentSession,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let breakdown = app_state.bookings_service.source_breakdown(query.period()?).await?;
    Ok((StatusCode::OK, Json(breakdown)))
}

// GET /api/bookings/sources/{source}
#[utoipa::path(
    get,
    path = "/api/bookings/sources/{source}",
    tag = "Bookings",
    params(
        ("source" = String, Path, description = "Nome da origem (ex: Booking.com, Direct)"),
        PeriodQuery
    ),
    responses(
        (status = 200, description = "Detalhe da origem", body = SourceDetails),
        (status = 404, description = "Origem desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_source_details(
    State(app_state): State<AppState>,
    _session: CurrentSession,
    Path(source): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let source = app_state.bookings_service.parse_source(&source)?;
    let details = app_state
        .bookings_service
        .source_details(query.period()?, source)
        .await?;
    Ok((StatusCode::OK, Json(details)))
}

// GET /api/bookings/trend
#[utoipa::path(
    get,
    path = "/api/bookings/trend",
    tag = "Bookings",
    params(TrendQuery),
    responses(
        (status = 200, description = "Seta e cor de um indicador de tendência", body = TrendIndicator)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_trend_indicator(
    _session: CurrentSession,
    Query(query): Query<TrendQuery>,
) -> Json<TrendIndicator> {
    Json(TrendIndicator::from_trend(query.value, query.invert))
}
