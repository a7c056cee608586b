// src/models/booking.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::error::{AggregationError, AppError};

// --- Período (filtro de ano) ---

// Conjunto fechado de anos com dados carregados no banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Period {
    Y2023,
    #[default]
    Y2024,
    Y2025,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Y2023, Period::Y2024, Period::Y2025];

    pub fn year(self) -> i32 {
        match self {
            Period::Y2023 => 2023,
            Period::Y2024 => 2024,
            Period::Y2025 => 2025,
        }
    }

    // O ano anterior pode estar fora do conjunto (ex: 2022), por isso é um i32 cru.
    pub fn previous_year(self) -> i32 {
        self.year() - 1
    }
}

impl TryFrom<i32> for Period {
    type Error = AppError;

    fn try_from(year: i32) -> Result<Self, Self::Error> {
        Period::ALL
            .into_iter()
            .find(|p| p.year() == year)
            .ok_or(AppError::InvalidPeriod(year))
    }
}

impl From<Period> for i32 {
    fn from(period: Period) -> Self {
        period.year()
    }
}

// --- Linhas vindas do banco ---

// Tabela de consolidação anual (yearly_statistics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStatistics {
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 120)]
    pub total_bookings: i64,
}

// Linha da tabela da origem externa ("Booking.com Data")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceBookingRow {
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = "Deluxe Suite")]
    pub room_type: Option<String>,
    #[schema(example = "2024-03-01")]
    pub arrival: Option<String>,
    #[schema(example = "1850.00")]
    pub revenue: Option<Decimal>,
}

// Linha crua de receita, com colunas que podem vir nulas.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RawRevenueRow {
    pub room_type: Option<String>,
    pub revenue: Option<Decimal>,
    pub nights: Option<i32>,
    pub arrival: Option<String>,
}

// Reserva validada: todos os campos obrigatórios presentes.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRow {
    pub room_type: String,
    pub revenue: Decimal,
    pub arrival: NaiveDate,
    pub nights: i32,
}

impl BookingRow {
    /// Valida uma linha crua. `row` é o índice usado nas mensagens de erro.
    pub fn from_raw(row: usize, raw: RawRevenueRow) -> Result<Self, AggregationError> {
        let room_type = raw
            .room_type
            .filter(|r| !r.trim().is_empty())
            .ok_or(AggregationError::MissingField { row, field: "room_type" })?;
        let revenue = raw
            .revenue
            .ok_or(AggregationError::MissingField { row, field: "revenue" })?;
        let nights = raw
            .nights
            .ok_or(AggregationError::MissingField { row, field: "nights" })?;
        let arrival_text = raw
            .arrival
            .ok_or(AggregationError::MissingField { row, field: "arrival" })?;

        // Aceita "YYYY-MM-DD" e também timestamps ("YYYY-MM-DD HH:MM:SS")
        let arrival = arrival_text
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| AggregationError::InvalidDate {
                row,
                value: arrival_text.clone(),
            })?;

        Ok(Self {
            room_type,
            revenue,
            arrival,
            nights,
        })
    }
}

// --- Agregados derivados ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatistic {
    #[schema(example = "Deluxe Suite")]
    pub room_type: String,
    #[schema(example = 42)]
    pub total_bookings: i64,
    /// Média das diárias (receita / noites) de cada reserva.
    #[schema(example = "1250.75")]
    pub avg_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceCount {
    #[schema(example = "Booking.com")]
    pub source: String,
    #[schema(example = 45)]
    pub count: i64,
    /// `None` quando o período não tem reservas.
    #[schema(example = "37.5")]
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceBreakdown {
    pub total_bookings: i64,
    pub external: SourceCount,
    pub direct: SourceCount,
    /// Falso quando o total do período é zero.
    pub has_data: bool,
    /// Falso quando a origem externa tem mais reservas que o total do período.
    pub consistent: bool,
}

impl SourceBreakdown {
    pub fn counts(&self) -> [&SourceCount; 2] {
        [&self.external, &self.direct]
    }
}

// --- Origem selecionada ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum BookingSource {
    External,
    Direct,
}

impl BookingSource {
    pub const DIRECT_NAME: &'static str = "Direct";

    /// Resolve o nome vindo do cliente ("Booking.com", "direct", ...).
    pub fn parse(name: &str, external_name: &str) -> Result<Self, AppError> {
        let name = name.trim();
        if name.eq_ignore_ascii_case(Self::DIRECT_NAME) {
            Ok(BookingSource::Direct)
        } else if name.eq_ignore_ascii_case(external_name) {
            Ok(BookingSource::External)
        } else {
            Err(AppError::UnknownSource(name.to_string()))
        }
    }

    pub fn display_name(self, external_name: &str) -> String {
        match self {
            BookingSource::External => external_name.to_string(),
            BookingSource::Direct => Self::DIRECT_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn raw(room: Option<&str>, revenue: Option<i64>, nights: Option<i32>, arrival: Option<&str>) -> RawRevenueRow {
        RawRevenueRow {
            room_type: room.map(str::to_string),
            revenue: revenue.map(Decimal::from),
            nights,
            arrival: arrival.map(str::to_string),
        }
    }

    #[test]
    fn period_accepts_only_supported_years() {
        assert_eq!(Period::try_from(2023).unwrap(), Period::Y2023);
        assert_eq!(Period::try_from(2025).unwrap().year(), 2025);
        assert!(matches!(Period::try_from(2022), Err(AppError::InvalidPeriod(2022))));
        assert_eq!(Period::default(), Period::Y2024);
        assert_eq!(Period::Y2023.previous_year(), 2022);
    }

    #[test]
    fn period_serializes_as_year() {
        assert_eq!(serde_json::to_string(&Period::Y2025).unwrap(), "2025");
        let parsed: Period = serde_json::from_str("2023").unwrap();
        assert_eq!(parsed, Period::Y2023);
        assert!(serde_json::from_str::<Period>("1999").is_err());
    }

    #[test]
    fn raw_row_with_timestamp_arrival_is_accepted() {
        let row = BookingRow::from_raw(0, raw(Some("Suite"), Some(300), Some(3), Some("2024-05-02 14:00:00"))).unwrap();
        assert_eq!(row.arrival, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(row.nights, 3);
    }

    #[test]
    fn raw_row_missing_fields_are_reported() {
        let err = BookingRow::from_raw(4, raw(None, Some(100), Some(1), Some("2024-01-01"))).unwrap_err();
        assert_eq!(err, AggregationError::MissingField { row: 4, field: "room_type" });

        let err = BookingRow::from_raw(1, raw(Some("A"), None, Some(1), Some("2024-01-01"))).unwrap_err();
        assert_eq!(err, AggregationError::MissingField { row: 1, field: "revenue" });

        let err = BookingRow::from_raw(2, raw(Some("A"), Some(100), None, Some("2024-01-01"))).unwrap_err();
        assert_eq!(err, AggregationError::MissingField { row: 2, field: "nights" });
    }

    #[test]
    fn raw_row_with_bad_date_is_rejected() {
        let err = BookingRow::from_raw(0, raw(Some("A"), Some(100), Some(1), Some("01/02/2024"))).unwrap_err();
        assert!(matches!(err, AggregationError::InvalidDate { row: 0, .. }));
    }

    #[test]
    fn source_names_resolve_case_insensitively() {
        assert_eq!(BookingSource::parse("booking.com", "Booking.com").unwrap(), BookingSource::External);
        assert_eq!(BookingSource::parse(" DIRECT ", "Booking.com").unwrap(), BookingSource::Direct);
        assert!(BookingSource::parse("Airbnb", "Booking.com").is_err());
        assert_eq!(BookingSource::Direct.display_name("Booking.com"), "Direct");
    }
}
