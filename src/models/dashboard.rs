// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::booking::{Period, RoomStatistic, SourceBookingRow, SourceBreakdown};

// 1. Indicador de tendência dos cards

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TrendDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TrendTone {
    Favorable,
    Unfavorable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendIndicator {
    pub direction: TrendDirection,
    pub tone: TrendTone,
    /// Valor absoluto em %, como exibido ("12.5% vs last period").
    #[schema(example = "12.5")]
    pub magnitude: Decimal,
}

// 2. Cards do topo

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    #[schema(example = "Total Bookings")]
    pub title: String,
    #[schema(example = "1 240")]
    pub value: String,
    #[schema(example = "37.5% of 120 bookings")]
    pub caption: Option<String>,
    pub trend: Option<TrendIndicator>,
}

// 3. Gráficos (instruções declarativas para o renderizador)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ValueFormat {
    Count,
    CurrencyZar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    #[schema(example = "Deluxe Suite")]
    pub label: String,
    #[schema(example = "42")]
    pub value: Decimal,
    /// Texto do tooltip já formatado.
    #[schema(example = "42 bookings")]
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BarChartSpec {
    #[schema(example = "room-popularity")]
    pub id: String,
    #[schema(example = "Room Popularity")]
    pub title: String,
    #[schema(example = "roomType")]
    pub x_key: String,
    #[schema(example = "totalBookings")]
    pub y_key: String,
    pub value_format: ValueFormat,
    pub bars: Vec<ChartBar>,
}

// 4. Visão geral de um período

/// Seção de quartos. Falha de qualidade nas linhas de receita fica aqui,
/// sem derrubar cards e origens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSection {
    pub status: ViewStatus,
    pub room_statistics: Vec<RoomStatistic>,
    pub charts: Vec<BarChartSpec>,
    pub reason: Option<String>,
}

impl RoomSection {
    pub fn ready(room_statistics: Vec<RoomStatistic>, charts: Vec<BarChartSpec>) -> Self {
        Self {
            status: ViewStatus::Ready,
            room_statistics,
            charts,
            reason: None,
        }
    }

    pub fn no_data(reason: impl Into<String>) -> Self {
        Self {
            status: ViewStatus::NoData,
            room_statistics: Vec::new(),
            charts: Vec::new(),
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingsOverview {
    #[schema(value_type = i32, example = 2024)]
    pub period: Period,
    pub cards: Vec<StatCard>,
    pub sources: SourceBreakdown,
    pub rooms: RoomSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceDetails {
    #[schema(example = "Booking.com")]
    pub source: String,
    #[schema(value_type = i32, example = 2024)]
    pub period: Period,
    #[schema(example = 45)]
    pub total_bookings: i64,
    /// Só a origem externa tem linhas detalhadas; reservas diretas são o complemento.
    pub bookings: Vec<SourceBookingRow>,
}

// 5. Estado da tela do dashboard (por sessão)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ViewStatus {
    Loading,
    Ready,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    #[schema(value_type = i32, example = 2024)]
    pub period: Period,
    #[schema(example = "Booking.com")]
    pub selected_source: Option<String>,
    pub generation: u64,
    pub status: ViewStatus,
    pub overview: Option<BookingsOverview>,
    pub source_details: Option<SourceDetails>,
    pub reason: Option<String>,
}
