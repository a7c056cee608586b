use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Falhas vindas da camada de acesso a dados (rede, auth do banco, query malformada).
// Nunca são repetidas automaticamente: sobem para quem chamou.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Falha de conexão com o banco: {0}")]
    Connection(String),

    #[error("Resultado fora do formato esperado: {0}")]
    Malformed(String),

    #[error("Tabela '{table}' retornou {count} linhas, esperado no máximo uma")]
    UnexpectedRowCount { table: String, count: usize },

    #[error("Erro de banco de dados: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                QueryError::Connection(err.to_string())
            }
            // Coluna ausente ou de outro tipo: o contrato da tabela mudou
            sqlx::Error::ColumnNotFound(_) | sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                QueryError::Malformed(err.to_string())
            }
            other => QueryError::Database(other),
        }
    }
}

// Linhas inconsistentes ou divisões sem denominador.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("Linha {row}: campo obrigatório '{field}' ausente")]
    MissingField { row: usize, field: &'static str },

    #[error("Linha {row}: tipo de quarto '{room_type}' com {nights} diárias")]
    InvalidNights {
        row: usize,
        room_type: String,
        nights: i32,
    },

    #[error("Linha {row}: data de chegada inválida '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("Divisão por zero")]
    DivisionByZero,

    #[error("Estouro numérico ao comparar {previous} com {current}")]
    Overflow { previous: i64, current: i64 },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Sessão ausente ou expirada")]
    Unauthenticated,

    #[error("Período não suportado: {0}")]
    InvalidPeriod(i32),

    #[error("Origem de reserva desconhecida: {0}")]
    UnknownSource(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Query(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Unauthenticated => {
                // O cliente deve mandar o usuário para a tela de login.
                let body = Json(json!({
                    "error": "Sessão ausente ou expirada.",
                    "redirect": "/login",
                }));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }
            AppError::InvalidPeriod(year) => (
                StatusCode::BAD_REQUEST,
                format!("O ano {} não está entre os períodos suportados.", year),
            ),
            AppError::UnknownSource(source) => (
                StatusCode::NOT_FOUND,
                format!("Origem de reserva '{}' não encontrada.", source),
            ),
            AppError::Aggregation(ref e) => {
                tracing::warn!("⚠️ Dados inconsistentes: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            AppError::Query(ref e) => {
                tracing::error!("🔥 Falha na consulta: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Não foi possível consultar os dados.".to_string(),
                )
            }
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
