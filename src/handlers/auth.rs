// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::{auth_errors::AuthErrorCode, error::AppError},
    config::AppState,
    middleware::auth::{AuthenticatedUser, CurrentSession},
    models::{
        auth::{
            AuthErrorInfo, AuthResponse, ForgotPasswordPayload, LoginUserPayload, MessageResponse,
            RegisterUserPayload, ResetPasswordPayload,
        },
        user::UserProfile,
    },
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Conta criada", body = AuthResponse),
        (status = 400, description = "Campos inválidos"),
        (status = 409, description = "Email já está em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state.auth_service.sign_up(payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Sessão iniciada", body = AuthResponse),
        (status = 400, description = "Campos em branco"),
        (status = 401, description = "Email ou senha incorretos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state.auth_service.sign_in(payload).await?;
    Ok((StatusCode::OK, Json(session)))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Sessão encerrada"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    CurrentSession(claims): CurrentSession,
) -> impl IntoResponse {
    app_state.auth_service.sign_out(&claims).await;
    StatusCode::NO_CONTENT
}

// POST /api/auth/forgot-password
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Link de recuperação enviado", body = MessageResponse),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.request_password_reset(payload).await?;

    Ok(Json(MessageResponse {
        message: "Enviamos um link de recuperação para o seu email.".to_string(),
    }))
}

// POST /api/auth/reset-password
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = MessageResponse),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.confirm_password_reset(payload).await?;

    Ok(Json(MessageResponse {
        message: "Senha redefinida com sucesso.".to_string(),
    }))
}

// GET /api/auth/error-codes
#[utoipa::path(
    get,
    path = "/api/auth/error-codes",
    tag = "Auth",
    responses(
        (status = 200, description = "Códigos de erro de autenticação e suas mensagens", body = Vec<AuthErrorInfo>)
    )
)]
pub async fn error_codes() -> Json<Vec<AuthErrorInfo>> {
    Json(AuthErrorCode::ALL.into_iter().map(AuthErrorInfo::from).collect())
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = UserProfile),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let profile = app_state.auth_service.get_profile(user.uid).await?;
    Ok(Json(profile))
}
