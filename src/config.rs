// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{BookingStore, PgBookingStore},
    services::{
        bookings_service::BookingsService,
        dashboard_view::ViewRegistry,
        session::{JwtSessionProvider, SessionProvider},
    },
};

// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub external_source_name: String,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", v))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_audience: env::var("JWT_AUDIENCE").ok().filter(|v| !v.is_empty()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections,
            external_source_name: env::var("EXTERNAL_SOURCE_NAME")
                .unwrap_or_else(|_| "Booking.com".to_string()),
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub bookings_service: BookingsService,
    pub session_provider: Arc<dyn SessionProvider>,
    pub views: ViewRegistry,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        if config.run_migrations {
            sqlx::migrate!()
                .run(&db_pool)
                .await
                .context("Falha ao rodar as migrações do banco de dados")?;
            tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
        }

        // --- Monta o gráfico de dependências ---
        let store = Arc::new(PgBookingStore::new(db_pool));
        let session_provider = Arc::new(JwtSessionProvider::new(
            &config.jwt_secret,
            config.jwt_audience.as_deref(),
        ));

        Ok(Self::with_parts(store, session_provider, &config.external_source_name))
    }

    pub fn with_parts(
        store: Arc<dyn BookingStore>,
        session_provider: Arc<dyn SessionProvider>,
        external_source_name: &str,
    ) -> Self {
        Self {
            bookings_service: BookingsService::new(store, external_source_name),
            session_provider,
            views: ViewRegistry::new(),
        }
    }
}
