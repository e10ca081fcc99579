// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

// Erros de domínio. As mensagens saem em espanhol porque são exibidas
// diretamente no console do laboratório.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permiso requerido: {0}")]
    Forbidden(&'static str),

    #[error("Orden no encontrada")]
    OrderNotFound,

    #[error("Pago no encontrado")]
    PaymentNotFound,

    #[error("Material no encontrado")]
    MaterialNotFound,

    #[error("Proveedor no encontrado o inactivo")]
    ProviderUnavailable,

    #[error("Solo se pueden registrar pagos de órdenes completadas")]
    OrderNotPayable,

    #[error("Transición de estado no permitida: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Monto inválido")]
    InvalidAmount,

    #[error("Período inválido")]
    InvalidPeriod,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Coleção ilegível: {0}")]
    CorruptCollection(&'static str),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// Corpo padrão das respostas de erro.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidAmount | AppError::InvalidPeriod => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidToken | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::OrderNotFound | AppError::PaymentNotFound | AppError::MaterialNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::ProviderUnavailable
            | AppError::OrderNotPayable
            | AppError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::CorruptCollection(_)
            | AppError::SerializationError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        let status = self.status();
        match self {
            // Devolve todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status,
                    error: "Uno o más campos son inválidos.".into(),
                    details: Some(json!(details)),
                }
            }
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                ApiError {
                    status,
                    error: "Ocurrió un error inesperado.".into(),
                    details: None,
                }
            }
            e => ApiError {
                status,
                error: e.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error().into_response()
    }
}
