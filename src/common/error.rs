// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::common::auth_errors::{AuthErrorCode, FALLBACK_AUTH_MESSAGE};

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erros por campo vindos do FormState (campo -> mensagem)
    #[error("Formulário inválido")]
    InvalidForm(BTreeMap<String, String>),

    #[error("Erro de autenticação: {}", .0.code())]
    Auth(AuthErrorCode),

    // Falha interna durante login, cadastro ou recuperação de senha
    #[error("Falha inesperada na autenticação")]
    AuthUnexpected,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Link de recuperação inválido ou expirado")]
    InvalidResetToken,

    #[error("Informações da empresa não encontradas")]
    CompanyInfoNotFound,

    #[error("Template não encontrado")]
    TemplateNotFound,

    #[error("Logo não encontrada")]
    LogoNotFound,

    #[error("Origem da logo não suportada")]
    InvalidLogoSource,

    #[error("Erro de cache: {0}")]
    CacheError(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                return invalid_fields(details);
            }
            AppError::InvalidForm(errors) => {
                let details = errors
                    .into_iter()
                    .map(|(field, message)| (field, vec![message]))
                    .collect();
                return invalid_fields(details);
            }
            AppError::Auth(code) => {
                let body = Json(json!({
                    "error": code.message(),
                    "code": code.code(),
                }));
                return (code.status(), body).into_response();
            }
            AppError::AuthUnexpected => {
                (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_AUTH_MESSAGE)
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "Link de recuperação inválido ou expirado.",
            ),
            AppError::CompanyInfoNotFound => (
                StatusCode::NOT_FOUND,
                "Informações da empresa não encontradas.",
            ),
            AppError::TemplateNotFound => (StatusCode::NOT_FOUND, "Template não encontrado"),
            AppError::LogoNotFound => (StatusCode::NOT_FOUND, "Logo não encontrada."),
            AppError::InvalidLogoSource => (
                StatusCode::BAD_REQUEST,
                "Formato de logo não suportado. Envie uma imagem em base64.",
            ),

            // Todos os outros erros viram 500; o `tracing` loga o detalhe.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

fn invalid_fields(details: BTreeMap<String, Vec<String>>) -> Response {
    let body = Json(json!({
        "error": "Um ou mais campos são inválidos.",
        "details": details,
    }));
    (StatusCode::BAD_REQUEST, body).into_response()
}

// Erro simples usado como rejeição de extratores.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
