// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Bookings ---
        handlers::bookings::get_overview,
        handlers::bookings::get_room_statistics,
        handlers::bookings::get_source_breakdown,
        handlers::bookings::get_source_details,
        handlers::bookings::get_trend_indicator,

        // --- Dashboard ---
        handlers::dashboard::get_view,
        handlers::dashboard::select_period,
        handlers::dashboard::select_source,
        handlers::dashboard::clear_source,
    ),
    components(
        schemas(
            // --- BOOKINGS ---
            models::booking::YearlyStatistics,
            models::booking::SourceBookingRow,
            models::booking::RoomStatistic,
            models::booking::SourceCount,
            models::booking::SourceBreakdown,
            models::booking::BookingSource,

            // --- DASHBOARD ---
            models::dashboard::TrendDirection,
            models::dashboard::TrendTone,
            models::dashboard::TrendIndicator,
            models::dashboard::StatCard,
            models::dashboard::ValueFormat,
            models::dashboard::ChartBar,
            models::dashboard::BarChartSpec,
            models::dashboard::RoomSection,
            models::dashboard::BookingsOverview,
            models::dashboard::SourceDetails,
            models::dashboard::ViewStatus,
            models::dashboard::DashboardSnapshot,

            // --- Payloads ---
            handlers::dashboard::SelectPeriodPayload,
            handlers::dashboard::SelectSourcePayload,
        )
    ),
    tags(
        (name = "Bookings", description = "Reservas por período: origens, quartos e gráficos"),
        (name = "Dashboard", description = "Tela de reservas com seleção de período e origem")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
