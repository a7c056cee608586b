// src/services/session.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Sessão validada de quem está vendo o dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

// "Claims" dos tokens emitidos pelo serviço de identidade
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time
    #[serde(default)]
    pub email: Option<String>,
}

/// Quem responde "existe sessão para este token?".
/// Injetado no AppState; o dashboard nunca consulta estado global.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, token: &str) -> Option<Session>;
}

#[derive(Clone)]
pub struct JwtSessionProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionProvider {
    pub fn new(jwt_secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::default();
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_ref()),
            validation,
        }
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn get_session(&self, token: &str) -> Option<Session> {
        let data = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Token rejeitado: {}", e);
                return None;
            }
        };

        let expires_at = DateTime::<Utc>::from_timestamp(data.claims.exp as i64, 0)?;

        Some(Session {
            user_id: data.claims.sub,
            email: data.claims.email,
            expires_at,
        })
    }
}
