// src/services/dashboard_view.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        booking::{BookingSource, Period},
        dashboard::{DashboardSnapshot, ViewStatus},
    },
    services::{
        bookings_service::{BookingsService, PeriodData},
        session::Session,
    },
};

/// Identifica uma busca em andamento: a seleção que a disparou + geração.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub period: Period,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Discarded,
}

#[derive(Debug, Clone)]
enum SectionState {
    Loading,
    Ready(Box<PeriodData>),
    NoData(String),
}

/// Estado da tela de reservas de um usuário.
#[derive(Debug, Clone)]
pub struct DashboardView {
    period: Period,
    source: Option<BookingSource>,
    generation: u64,
    state: SectionState,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new(Period::default())
    }
}

impl DashboardView {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            source: None,
            generation: 0,
            state: SectionState::Loading,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Troca o período e devolve o ticket da nova busca.
    /// Qualquer busca anterior ainda em voo passa a ser obsoleta.
    pub fn select_period(&mut self, period: Period) -> FetchTicket {
        self.period = period;
        self.generation += 1;
        self.state = SectionState::Loading;
        FetchTicket {
            period,
            generation: self.generation,
        }
    }

    pub fn select_source(&mut self, source: Option<BookingSource>) {
        self.source = source;
    }

    /// Aplica o resultado de uma busca, a menos que ela seja obsoleta.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<PeriodData, AppError>) -> ApplyOutcome {
        if ticket.generation != self.generation || ticket.period != self.period {
            tracing::debug!(
                "Resposta obsoleta descartada ({} / geração {}, atual {} / {})",
                ticket.period.year(),
                ticket.generation,
                self.period.year(),
                self.generation
            );
            return ApplyOutcome::Discarded;
        }

        self.state = match result {
            Ok(data) => SectionState::Ready(Box::new(data)),
            Err(e) => {
                tracing::warn!("⚠️ Período {} sem dados: {}", self.period.year(), e);
                SectionState::NoData(e.to_string())
            }
        };
        ApplyOutcome::Applied
    }

    pub fn snapshot(&self, external_source: &str) -> DashboardSnapshot {
        let mut snapshot = DashboardSnapshot {
            period: self.period,
            selected_source: self.source.map(|s| s.display_name(external_source)),
            generation: self.generation,
            status: ViewStatus::Loading,
            overview: None,
            source_details: None,
            reason: None,
        };

        match &self.state {
            SectionState::Loading => {}
            SectionState::Ready(data) => {
                snapshot.status = ViewStatus::Ready;
                snapshot.overview = Some(data.overview.clone());
                snapshot.source_details = self.source.map(|s| data.source_details(s));
            }
            SectionState::NoData(reason) => {
                snapshot.status = ViewStatus::NoData;
                snapshot.reason = Some(reason.clone());
            }
        }

        snapshot
    }
}

// Tela aberta + validade da sessão que a abriu
#[derive(Debug)]
struct OpenView {
    view: DashboardView,
    expires_at: DateTime<Utc>,
}

/// Telas abertas, uma por usuário. Uma tela vive enquanto a sessão dela
/// for válida; as vencidas são removidas a cada acesso.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    views: Arc<RwLock<HashMap<Uuid, OpenView>>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot atual; na primeira visita abre a tela no período padrão.
    pub async fn snapshot(&self, service: &BookingsService, session: &Session) -> DashboardSnapshot {
        let mut views = self.views.write().await;
        let view = self.open_view(&mut views, service, session);
        view.snapshot(service.external_source())
    }

    pub async fn select_period(
        &self,
        service: &BookingsService,
        session: &Session,
        period: Period,
    ) -> DashboardSnapshot {
        let mut views = self.views.write().await;
        evict_expired(&mut views, Utc::now());

        let entry = views.entry(session.user_id).or_insert_with(|| OpenView {
            view: DashboardView::default(),
            expires_at: session.expires_at,
        });
        entry.expires_at = entry.expires_at.max(session.expires_at);

        let ticket = entry.view.select_period(period);
        self.spawn_fetch(service, session.user_id, ticket);
        entry.view.snapshot(service.external_source())
    }

    pub async fn select_source(
        &self,
        service: &BookingsService,
        session: &Session,
        source: Option<BookingSource>,
    ) -> DashboardSnapshot {
        let mut views = self.views.write().await;
        let view = self.open_view(&mut views, service, session);
        view.select_source(source);
        view.snapshot(service.external_source())
    }

    pub async fn apply(&self, user_id: Uuid, ticket: FetchTicket, result: Result<PeriodData, AppError>) -> ApplyOutcome {
        let mut views = self.views.write().await;
        match views.get_mut(&user_id) {
            Some(entry) => entry.view.apply(ticket, result),
            // Tela já removida (sessão vencida)
            None => ApplyOutcome::Discarded,
        }
    }

    #[cfg(test)]
    async fn open_views(&self) -> usize {
        self.views.read().await.len()
    }

    fn open_view<'a>(
        &self,
        views: &'a mut HashMap<Uuid, OpenView>,
        service: &BookingsService,
        session: &Session,
    ) -> &'a mut DashboardView {
        evict_expired(views, Utc::now());

        let entry = views.entry(session.user_id).or_insert_with(|| {
            let mut view = DashboardView::default();
            let ticket = view.select_period(view.period());
            self.spawn_fetch(service, session.user_id, ticket);
            OpenView {
                view,
                expires_at: session.expires_at,
            }
        });
        // Token renovado estende a vida da tela
        entry.expires_at = entry.expires_at.max(session.expires_at);
        &mut entry.view
    }

    // A busca roda fora do lock; o resultado volta via `apply`.
    fn spawn_fetch(&self, service: &BookingsService, user_id: Uuid, ticket: FetchTicket) {
        let registry = self.clone();
        let service = service.clone();
        tokio::spawn(async move {
            let result = service.load_period(ticket.period).await;
            registry.apply(user_id, ticket, result).await;
        });
    }
}

fn evict_expired(views: &mut HashMap<Uuid, OpenView>, now: DateTime<Utc>) {
    let before = views.len();
    views.retain(|_, entry| entry.expires_at > now);

    let evicted = before - views.len();
    if evicted > 0 {
        tracing::debug!("{} tela(s) removida(s) por sessão vencida", evicted);
    }
}
