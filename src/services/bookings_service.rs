// src/services/bookings_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::BookingStore,
    models::{
        booking::{BookingSource, Period, RoomStatistic, SourceBookingRow, SourceBreakdown},
        dashboard::{BookingsOverview, RoomSection, SourceDetails, StatCard, TrendIndicator},
    },
    services::{aggregation, charts},
};

/// Tudo que foi buscado e calculado para um período.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodData {
    pub overview: BookingsOverview,
    pub source_rows: Vec<SourceBookingRow>,
}

impl PeriodData {
    pub fn source_details(&self, source: BookingSource) -> SourceDetails {
        let breakdown = &self.overview.sources;
        match source {
            BookingSource::External => SourceDetails {
                source: breakdown.external.source.clone(),
                period: self.overview.period,
                total_bookings: breakdown.external.count,
                bookings: self.source_rows.clone(),
            },
            BookingSource::Direct => SourceDetails {
                source: breakdown.direct.source.clone(),
                period: self.overview.period,
                total_bookings: breakdown.direct.count,
                bookings: Vec::new(),
            },
        }
    }
}

#[derive(Clone)]
pub struct BookingsService {
    store: Arc<dyn BookingStore>,
    external_source: String,
}

impl BookingsService {
    pub fn new(store: Arc<dyn BookingStore>, external_source: impl Into<String>) -> Self {
        Self {
            store,
            external_source: external_source.into(),
        }
    }

    pub fn external_source(&self) -> &str {
        &self.external_source
    }

    pub fn parse_source(&self, name: &str) -> Result<BookingSource, AppError> {
        BookingSource::parse(name, &self.external_source)
    }

    /// Total consolidado do ano; ano sem linha conta como zero reservas.
    async fn total_bookings(&self, year: i32) -> Result<Option<i64>, AppError> {
        Ok(self
            .store
            .yearly_statistics(year)
            .await?
            .map(|s| s.total_bookings))
    }

    pub async fn room_statistics(&self, period: Period) -> Result<Vec<RoomStatistic>, AppError> {
        let rows = self.store.revenue_rows(period.year()).await?;
        Ok(aggregation::aggregate_revenue_rows(rows)?)
    }

    pub async fn source_breakdown(&self, period: Period) -> Result<SourceBreakdown, AppError> {
        let total = self.total_bookings(period.year()).await?.unwrap_or(0);
        let source_rows = self.store.source_bookings(period.year()).await?;
        Ok(aggregation::compute_source_breakdown(
            total,
            &self.external_source,
            source_rows.len() as i64,
        ))
    }

    /// Busca as três tabelas do período e roda a agregação.
    pub async fn load_period(&self, period: Period) -> Result<PeriodData, AppError> {
        let year = period.year();
        tracing::info!("📊 Carregando reservas de {}", year);

        let (current_total, previous_total, source_rows, revenue_rows) = tokio::try_join!(
            self.total_bookings(year),
            self.total_bookings(period.previous_year()),
            async { Ok::<_, AppError>(self.store.source_bookings(year).await?) },
            async { Ok::<_, AppError>(self.store.revenue_rows(year).await?) },
        )?;

        let total = current_total.unwrap_or(0);
        let sources = aggregation::compute_source_breakdown(total, &self.external_source, source_rows.len() as i64);

        // Linha de receita ruim só invalida a seção de quartos
        let rooms = match aggregation::aggregate_revenue_rows(revenue_rows) {
            Ok(room_statistics) => {
                let charts = vec![
                    charts::room_popularity_chart(&room_statistics),
                    charts::average_rate_chart(&room_statistics),
                ];
                RoomSection::ready(room_statistics, charts)
            }
            Err(e) => {
                tracing::warn!("⚠️ Estatísticas por quarto indisponíveis em {}: {}", year, e);
                RoomSection::no_data(e.to_string())
            }
        };

        let overview = BookingsOverview {
            period,
            cards: build_cards(total, previous_total, &sources),
            sources,
            rooms,
        };

        Ok(PeriodData { overview, source_rows })
    }

    pub async fn overview(&self, period: Period) -> Result<BookingsOverview, AppError> {
        Ok(self.load_period(period).await?.overview)
    }

    pub async fn source_details(&self, period: Period, source: BookingSource) -> Result<SourceDetails, AppError> {
        Ok(self.load_period(period).await?.source_details(source))
    }
}

fn build_cards(total: i64, previous_total: Option<i64>, sources: &SourceBreakdown) -> Vec<StatCard> {
    // Sem ano anterior (ou com zero reservas) não há tendência
    let trend = previous_total
        .and_then(|previous| aggregation::percentage_change(previous, total).ok())
        .map(|change| TrendIndicator::from_trend(change.round_dp(1), false));

    let mut cards = vec![StatCard {
        title: "Total Bookings".to_string(),
        value: charts::format_count(total),
        caption: None,
        trend,
    }];

    for source in sources.counts() {
        cards.push(StatCard {
            title: source.source.clone(),
            value: charts::format_count(source.count),
            caption: Some(format!(
                "{} of {} bookings",
                charts::format_percentage(source.percentage),
                charts::format_count(sources.total_bookings)
            )),
            trend: None,
        });
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::error::{AggregationError, QueryError},
        db::MemoryBookingStore,
        models::{
            booking::RawRevenueRow,
            dashboard::{TrendDirection, TrendTone, ViewStatus},
        },
        test_utils::{sample_store, source_row},
    };
    use rust_decimal::Decimal;

    fn service(store: MemoryBookingStore) -> BookingsService {
        BookingsService::new(Arc::new(store), "Booking.com")
    }

    #[tokio::test]
    async fn overview_combines_sources_rooms_and_cards() {
        let overview = service(sample_store()).overview(Period::Y2024).await.unwrap();

        assert_eq!(overview.period, Period::Y2024);
        assert_eq!(overview.sources.total_bookings, 8);
        assert_eq!(overview.sources.external.count, 3);
        assert_eq!(overview.sources.direct.count, 5);
        assert_eq!(overview.sources.external.percentage, Some(Decimal::new(375, 1)));

        let suite = overview
            .rooms
            .room_statistics
            .iter()
            .find(|r| r.room_type == "Suite")
            .unwrap();
        assert_eq!(suite.total_bookings, 2);
        assert_eq!(suite.avg_rate, Decimal::from(75));

        assert_eq!(overview.rooms.status, ViewStatus::Ready);
        assert_eq!(overview.rooms.charts.len(), 2);
        assert_eq!(overview.cards.len(), 3);
        assert_eq!(overview.cards[1].caption.as_deref(), Some("37.5% of 8 bookings"));
    }

    #[tokio::test]
    async fn total_card_trends_against_previous_year() {
        let overview = service(sample_store()).overview(Period::Y2024).await.unwrap();
        let trend = overview.cards[0].trend.as_ref().unwrap();

        // 2023 tinha 10 reservas, 2024 tem 8
        assert_eq!(trend.direction, TrendDirection::Down);
        assert_eq!(trend.tone, TrendTone::Unfavorable);
        assert_eq!(trend.magnitude, Decimal::from(20));
    }

    #[tokio::test]
    async fn missing_previous_year_means_no_trend() {
        let overview = service(sample_store()).overview(Period::Y2023).await.unwrap();
        assert!(overview.cards[0].trend.is_none());
    }

    #[tokio::test]
    async fn empty_period_degrades_to_no_data() {
        let overview = service(MemoryBookingStore::new()).overview(Period::Y2025).await.unwrap();
        assert!(!overview.sources.has_data);
        assert!(overview.rooms.room_statistics.is_empty());
        assert_eq!(overview.cards[1].caption.as_deref(), Some("No data of 0 bookings"));
    }

    #[tokio::test]
    async fn query_errors_are_propagated() {
        let err = service(MemoryBookingStore::new().failing("timeout"))
            .overview(Period::Y2024)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Query(QueryError::Connection(_))));
    }

    fn zero_nights_row() -> RawRevenueRow {
        RawRevenueRow {
            room_type: Some("Loft".into()),
            revenue: Some(Decimal::from(500)),
            nights: Some(0),
            arrival: Some("2024-09-09".into()),
        }
    }

    #[tokio::test]
    async fn zero_nights_row_fails_room_statistics() {
        let store = sample_store().with_revenue_row(zero_nights_row());
        let err = service(store).room_statistics(Period::Y2024).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Aggregation(AggregationError::InvalidNights { nights: 0, .. })
        ));
    }

    #[tokio::test]
    async fn zero_nights_row_keeps_sources_and_cards() {
        let store = sample_store().with_revenue_row(zero_nights_row());
        let overview = service(store).overview(Period::Y2024).await.unwrap();

        assert_eq!(overview.sources.external.count, 3);
        assert_eq!(overview.sources.direct.count, 5);
        assert_eq!(overview.cards.len(), 3);

        assert_eq!(overview.rooms.status, ViewStatus::NoData);
        assert!(overview.rooms.room_statistics.is_empty());
        assert!(overview.rooms.charts.is_empty());
        assert!(overview.rooms.reason.unwrap().contains("Loft"));
    }

    #[tokio::test]
    async fn source_details_list_external_rows_only() {
        let svc = service(sample_store().with_source_row(source_row(2023, "Suite")));

        let external = svc.source_details(Period::Y2024, BookingSource::External).await.unwrap();
        assert_eq!(external.source, "Booking.com");
        assert_eq!(external.total_bookings, 3);
        assert_eq!(external.bookings.len(), 3);

        let direct = svc.source_details(Period::Y2024, BookingSource::Direct).await.unwrap();
        assert_eq!(direct.source, "Direct");
        assert_eq!(direct.total_bookings, 5);
        assert!(direct.bookings.is_empty());
    }

    #[tokio::test]
    async fn source_breakdown_alone() {
        let breakdown = service(sample_store()).source_breakdown(Period::Y2024).await.unwrap();
        assert_eq!(breakdown.direct.percentage, Some(Decimal::new(625, 1)));
    }
}
