// src/db/booking_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::QueryError,
    models::booking::{RawRevenueRow, SourceBookingRow, YearlyStatistics},
};

// Nomes das tabelas no banco hospedado (contrato externo)
pub const YEARLY_STATISTICS_TABLE: &str = "yearly_statistics";
pub const SOURCE_BOOKINGS_TABLE: &str = "Booking.com Data";
pub const REVENUE_TABLE: &str = "RevenueData_2023-2025";

/// Leituras que o dashboard faz no banco. Um método por tabela consumida.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Consolidação do ano. `None` quando o ano não tem linha.
    async fn yearly_statistics(&self, year: i32) -> Result<Option<YearlyStatistics>, QueryError>;

    /// Linhas da origem externa no ano.
    async fn source_bookings(&self, year: i32) -> Result<Vec<SourceBookingRow>, QueryError>;

    /// Linhas de receita cuja chegada começa com o ano.
    async fn revenue_rows(&self, year: i32) -> Result<Vec<RawRevenueRow>, QueryError>;
}

const YEARLY_STATISTICS_SQL: &str =
    r#"SELECT "year", "total_bookings" FROM "yearly_statistics" WHERE "year" = $1"#;

const SOURCE_BOOKINGS_SQL: &str = r#"
    SELECT "Year" AS "year", "Room_Type" AS "room_type", "Arrival"::text AS "arrival", "Revenue" AS "revenue"
    FROM "Booking.com Data"
    WHERE "Year" = $1
"#;

const REVENUE_ROWS_SQL: &str = r#"
    SELECT "Room_Type" AS "room_type", "Revenue" AS "revenue", "Room_Nights" AS "nights", "Arrival"::text AS "arrival"
    FROM "RevenueData_2023-2025"
    WHERE "Arrival"::text ILIKE $1
"#;

// Prefixo do ILIKE: o ano só tem dígitos, então não há curinga a escapar
fn arrival_prefix(year: i32) -> String {
    format!("{year}%")
}

#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn yearly_statistics(&self, year: i32) -> Result<Option<YearlyStatistics>, QueryError> {
        let mut rows = sqlx::query_as::<_, YearlyStatistics>(YEARLY_STATISTICS_SQL)
            .bind(year)
            .fetch_all(&self.pool)
            .await?;

        // Equivalente ao `.single()`: mais de uma linha é erro de contrato
        if rows.len() > 1 {
            return Err(QueryError::UnexpectedRowCount {
                table: YEARLY_STATISTICS_TABLE.to_string(),
                count: rows.len(),
            });
        }

        Ok(rows.pop())
    }

    async fn source_bookings(&self, year: i32) -> Result<Vec<SourceBookingRow>, QueryError> {
        let rows = sqlx::query_as::<_, SourceBookingRow>(SOURCE_BOOKINGS_SQL)
            .bind(year)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!("{} linhas de '{}' em {}", rows.len(), SOURCE_BOOKINGS_TABLE, year);
        Ok(rows)
    }

    async fn revenue_rows(&self, year: i32) -> Result<Vec<RawRevenueRow>, QueryError> {
        let rows = sqlx::query_as::<_, RawRevenueRow>(REVENUE_ROWS_SQL)
            .bind(arrival_prefix(year))
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!("{} linhas de '{}' em {}", rows.len(), REVENUE_TABLE, year);
        Ok(rows)
    }
}
