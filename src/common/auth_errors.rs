// src/common/auth_errors.rs

use axum::http::StatusCode;
use serde::Serialize;

pub const FALLBACK_AUTH_MESSAGE: &str = "Ocorreu um erro inesperado. Tente novamente.";

/// Códigos de erro de autenticação conhecidos pelo app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    OperationNotAllowed,
    WeakPassword,
    NetworkRequestFailed,
    UserDisabled,
    UserNotFound,
    WrongPassword,
    TooManyRequests,
    InvalidCredential,
}

impl AuthErrorCode {
    pub const ALL: [AuthErrorCode; 10] = [
        AuthErrorCode::EmailAlreadyInUse,
        AuthErrorCode::InvalidEmail,
        AuthErrorCode::OperationNotAllowed,
        AuthErrorCode::WeakPassword,
        AuthErrorCode::NetworkRequestFailed,
        AuthErrorCode::UserDisabled,
        AuthErrorCode::UserNotFound,
        AuthErrorCode::WrongPassword,
        AuthErrorCode::TooManyRequests,
        AuthErrorCode::InvalidCredential,
    ];

    pub fn code(self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::OperationNotAllowed => "auth/operation-not-allowed",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::NetworkRequestFailed => "auth/network-request-failed",
            AuthErrorCode::UserDisabled => "auth/user-disabled",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::TooManyRequests => "auth/too-many-requests",
            AuthErrorCode::InvalidCredential => "auth/invalid-credential",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => {
                "Este email já está em uso. Tente fazer login ou use outro email."
            }
            AuthErrorCode::InvalidEmail => "O email fornecido é inválido.",
            AuthErrorCode::OperationNotAllowed => {
                "Operação não permitida. Entre em contato com o suporte."
            }
            AuthErrorCode::WeakPassword => "A senha é muito fraca. Use pelo menos 6 caracteres.",
            AuthErrorCode::NetworkRequestFailed => {
                "Erro de conexão. Verifique sua internet e tente novamente."
            }
            AuthErrorCode::UserDisabled => {
                "Esta conta foi desativada. Entre em contato com o suporte."
            }
            AuthErrorCode::UserNotFound => {
                "Usuário não encontrado. Verifique o email e tente novamente."
            }
            AuthErrorCode::WrongPassword | AuthErrorCode::InvalidCredential => {
                "Email ou senha incorretos. Tente novamente."
            }
            AuthErrorCode::TooManyRequests => {
                "Muitas tentativas. Aguarde um momento e tente novamente."
            }
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            AuthErrorCode::EmailAlreadyInUse => StatusCode::CONFLICT,
            AuthErrorCode::InvalidEmail | AuthErrorCode::WeakPassword => StatusCode::BAD_REQUEST,
            AuthErrorCode::OperationNotAllowed | AuthErrorCode::UserDisabled => {
                StatusCode::FORBIDDEN
            }
            AuthErrorCode::NetworkRequestFailed => StatusCode::SERVICE_UNAVAILABLE,
            AuthErrorCode::UserNotFound => StatusCode::NOT_FOUND,
            AuthErrorCode::WrongPassword | AuthErrorCode::InvalidCredential => {
                StatusCode::UNAUTHORIZED
            }
            AuthErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_distinct_string() {
        let codes: std::collections::HashSet<_> =
            AuthErrorCode::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), AuthErrorCode::ALL.len());
        assert!(codes.iter().all(|c| c.starts_with("auth/")));
    }

    #[test]
    fn known_codes_map_to_fixed_messages() {
        assert_eq!(
            AuthErrorCode::EmailAlreadyInUse.message(),
            "Este email já está em uso. Tente fazer login ou use outro email."
        );
        assert_eq!(
            AuthErrorCode::WrongPassword.message(),
            AuthErrorCode::InvalidCredential.message()
        );
        assert_eq!(AuthErrorCode::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn fallback_message_is_not_a_code_message() {
        assert!(AuthErrorCode::ALL
            .iter()
            .all(|c| c.message() != FALLBACK_AUTH_MESSAGE));
    }
}
