// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, services::session::Session};

// Confere a sessão uma vez por requisição e a deixa nos "extensions".
pub async fn session_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthenticated)?;

    let session = app_state
        .session_provider
        .get_session(bearer.token())
        .await
        .ok_or(AppError::Unauthenticated)?;

    tracing::debug!(
        user_id = %session.user_id,
        email = session.email.as_deref().unwrap_or("-"),
        expires_at = %session.expires_at,
        "sessão válida"
    );
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

// Extrator para obter a sessão diretamente nos handlers
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or(AppError::Unauthenticated)
    }
}
