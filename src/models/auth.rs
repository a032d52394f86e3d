// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::user::UserProfile;
use crate::common::auth_errors::AuthErrorCode;

// Credencial + perfil, como vem da tabela `users`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub uid: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            uid: self.uid,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterUserPayload {
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "maria@trampocerto.com.br")]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// Dados para login
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginUserPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ForgotPasswordPayload {
    pub email: String,
}

// Troca de senha a partir do token enviado por e-mail
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "O token de recuperação é obrigatório."))]
    pub token: String,
    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub new_password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Entrada do catálogo de erros de autenticação.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthErrorInfo {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl From<AuthErrorCode> for AuthErrorInfo {
    fn from(code: AuthErrorCode) -> Self {
        Self {
            code: code.code().to_string(),
            message: code.message().to_string(),
            status: code.status().as_u16(),
        }
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
    pub jti: Uuid,  // ID da sessão, usado no logout
}
