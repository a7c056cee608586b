// src/test_utils.rs
//
// Dados e helpers compartilhados pelos testes.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::AppState,
    db::MemoryBookingStore,
    models::booking::{RawRevenueRow, SourceBookingRow},
    services::session::JwtSessionProvider,
};

pub const TEST_JWT_SECRET: &str = "test-secret";

pub fn source_row(year: i32, room_type: &str) -> SourceBookingRow {
    SourceBookingRow {
        year,
        room_type: Some(room_type.to_string()),
        arrival: Some(format!("{}-06-01", year)),
        revenue: Some(Decimal::from(1000)),
    }
}

pub fn revenue_row(room_type: &str, revenue: i64, nights: i32, arrival: &str) -> RawRevenueRow {
    RawRevenueRow {
        room_type: Some(room_type.to_string()),
        revenue: Some(Decimal::from(revenue)),
        nights: Some(nights),
        arrival: Some(arrival.to_string()),
    }
}

/// 2023: 10 reservas. 2024: 8 reservas, 3 delas pela origem externa.
pub fn sample_store() -> MemoryBookingStore {
    MemoryBookingStore::new()
        .with_yearly(2023, 10)
        .with_yearly(2024, 8)
        .with_source_row(source_row(2024, "Suite"))
        .with_source_row(source_row(2024, "Standard"))
        .with_source_row(source_row(2024, "Suite"))
        .with_revenue_row(revenue_row("Suite", 100, 2, "2024-01-10"))
        .with_revenue_row(revenue_row("Suite", 300, 3, "2024-02-14"))
        .with_revenue_row(revenue_row("Standard", 900, 3, "2024-03-01"))
        .with_revenue_row(revenue_row("Standard", 800, 1, "2023-11-20"))
}

pub fn test_state(store: MemoryBookingStore) -> AppState {
    AppState::with_parts(
        Arc::new(store),
        Arc::new(JwtSessionProvider::new(TEST_JWT_SECRET, None)),
        "Booking.com",
    )
}

/// Token como o serviço de identidade emitiria; `ttl_secs` negativo gera token expirado.
pub fn issue_token(user_id: Uuid, ttl_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = json!({
        "sub": user_id,
        "exp": now + ttl_secs,
        "iat": now,
        "aud": "authenticated",
        "email": "manager@example.com",
        "role": "authenticated",
    });

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_ref()),
    )
    .unwrap()
}
