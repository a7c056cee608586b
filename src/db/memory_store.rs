// src/db/memory_store.rs

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;

use crate::{
    common::error::QueryError,
    db::booking_repo::BookingStore,
    models::booking::{RawRevenueRow, SourceBookingRow, YearlyStatistics},
};

/// Store em memória com as mesmas regras de filtro das consultas SQL.
/// Usado nos testes.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    yearly: HashMap<i32, YearlyStatistics>,
    source_rows: Vec<SourceBookingRow>,
    revenue_rows: Vec<RawRevenueRow>,
    delays: HashMap<i32, Duration>,
    failure: Option<String>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_yearly(mut self, year: i32, total_bookings: i64) -> Self {
        self.yearly.insert(year, YearlyStatistics { year, total_bookings });
        self
    }

    pub fn with_source_row(mut self, row: SourceBookingRow) -> Self {
        self.source_rows.push(row);
        self
    }

    pub fn with_revenue_row(mut self, row: RawRevenueRow) -> Self {
        self.revenue_rows.push(row);
        self
    }

    /// Atrasa todas as respostas de um ano (simula rede lenta).
    pub fn with_delay(mut self, year: i32, delay: Duration) -> Self {
        self.delays.insert(year, delay);
        self
    }

    /// Toda consulta falha com `QueryError::Connection`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    async fn simulate(&self, year: i32) -> Result<(), QueryError> {
        if let Some(delay) = self.delays.get(&year) {
            tokio::time::sleep(*delay).await;
        }
        match &self.failure {
            Some(message) => Err(QueryError::Connection(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn yearly_statistics(&self, year: i32) -> Result<Option<YearlyStatistics>, QueryError> {
        self.simulate(year).await?;
        Ok(self.yearly.get(&year).cloned())
    }

    async fn source_bookings(&self, year: i32) -> Result<Vec<SourceBookingRow>, QueryError> {
        self.simulate(year).await?;
        Ok(self
            .source_rows
            .iter()
            .filter(|r| r.year == year)
            .cloned()
            .collect())
    }

    async fn revenue_rows(&self, year: i32) -> Result<Vec<RawRevenueRow>, QueryError> {
        self.simulate(year).await?;
        let prefix = year.to_string();
        Ok(self
            .revenue_rows
            .iter()
            .filter(|r| r.arrival.as_deref().is_some_and(|a| a.starts_with(&prefix)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn revenue(arrival: Option<&str>) -> RawRevenueRow {
        RawRevenueRow {
            room_type: Some("Suite".into()),
            revenue: Some(Decimal::from(100)),
            nights: Some(1),
            arrival: arrival.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn revenue_rows_are_filtered_by_arrival_prefix() {
        let store = MemoryBookingStore::new()
            .with_revenue_row(revenue(Some("2024-02-01")))
            .with_revenue_row(revenue(Some("2023-12-31")))
            .with_revenue_row(revenue(None));

        let rows = store.revenue_rows(2024).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].arrival.as_deref(), Some("2024-02-01"));
    }

    #[tokio::test]
    async fn missing_yearly_row_is_none() {
        let store = MemoryBookingStore::new().with_yearly(2024, 10);
        assert_eq!(store.yearly_statistics(2024).await.unwrap().unwrap().total_bookings, 10);
        assert!(store.yearly_statistics(2023).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failing_store_reports_connection_error() {
        let store = MemoryBookingStore::new().failing("offline");
        assert!(matches!(
            store.source_bookings(2024).await,
            Err(QueryError::Connection(m)) if m == "offline"
        ));
    }
}
