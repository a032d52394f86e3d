// src/services/auth.rs

use std::collections::HashMap;
use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{auth_errors::AuthErrorCode, error::AppError},
    db::UserStore,
    forms::auth_forms::{
        ForgotPasswordField, LoginField, RegisterField, forgot_password_form, login_form,
        register_form,
    },
    models::{
        auth::{
            AuthResponse, Claims, ForgotPasswordPayload, LoginUserPayload, RegisterUserPayload,
            ResetPasswordPayload, User,
        },
        user::UserProfile,
    },
};

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub reset_token_ttl: Duration,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    settings: Arc<AuthSettings>,
    // jti das sessões encerradas por logout -> `exp` do token
    revoked: Arc<RwLock<HashMap<Uuid, usize>>>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// Falhas internas dos fluxos de login/cadastro/recuperação não vazam para o
// usuário: viram a mensagem genérica, com o detalhe só no log.
fn unexpected(err: AppError) -> AppError {
    match err {
        AppError::DatabaseError(_)
        | AppError::InternalServerError(_)
        | AppError::BcryptError(_)
        | AppError::JwtError(_)
        | AppError::CacheError(_) => {
            tracing::error!("Falha inesperada na autenticação: {:?}", err);
            AppError::AuthUnexpected
        }
        other => other,
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, settings: AuthSettings) -> Self {
        Self {
            users,
            settings: Arc::new(settings),
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Cadastro: valida o formulário, cria credencial + perfil e já devolve a
    /// sessão.
    pub async fn sign_up(&self, payload: RegisterUserPayload) -> Result<AuthResponse, AppError> {
        let mut form = register_form(&payload);

        let user = form
            .submit(&RegisterField::all(), |values| async move {
                let name = values[&RegisterField::Name].trim().to_string();
                let email = normalize_email(&values[&RegisterField::Email]);
                let password_hash = self.hash_password(&values[&RegisterField::Password]).await?;

                self.users.create_user(&name, &email, &password_hash).await
            })
            .await
            .map_err(|e| unexpected(AppError::from(e)))?;

        tracing::info!("👤 Novo usuário cadastrado: {}", user.uid);
        self.session_for(&user).map_err(unexpected)
    }

    pub async fn sign_in(&self, payload: LoginUserPayload) -> Result<AuthResponse, AppError> {
        let mut form = login_form(&payload);

        let user = form
            .submit(&LoginField::all(), |values| async move {
                let email = normalize_email(&values[&LoginField::Email]);
                let user = self
                    .users
                    .find_by_email(&email)
                    .await?
                    .ok_or(AppError::Auth(AuthErrorCode::InvalidCredential))?;

                if !self
                    .verify_password(&values[&LoginField::Password], &user.password_hash)
                    .await?
                {
                    return Err(AppError::Auth(AuthErrorCode::InvalidCredential));
                }
                Ok::<_, AppError>(user)
            })
            .await
            .map_err(|e| unexpected(AppError::from(e)))?;

        self.session_for(&user).map_err(unexpected)
    }

    /// Encerra a sessão do token apresentado.
    pub async fn sign_out(&self, claims: &Claims) {
        let now = Utc::now().timestamp() as usize;
        let leeway = Validation::default().leeway as usize;
        let mut revoked = self.revoked.write().await;

        // Token vencido (com a folga do `decode`) já é recusado; a entrada sai
        revoked.retain(|_, exp| *exp + leeway > now);
        revoked.insert(claims.jti, claims.exp);
        drop(revoked);

        tracing::info!("👋 Sessão encerrada para {}", claims.sub);
    }

    /// Gera um token de recuperação de uso único e "envia" o link.
    ///
    /// Devolve o token gerado; a rota HTTP não o expõe.
    pub async fn request_password_reset(
        &self,
        payload: ForgotPasswordPayload,
    ) -> Result<String, AppError> {
        let mut form = forgot_password_form(&payload);

        form.submit(&ForgotPasswordField::all(), |values| async move {
            let email = normalize_email(&values[&ForgotPasswordField::Email]);
            let user = self
                .users
                .find_by_email(&email)
                .await?
                .ok_or(AppError::Auth(AuthErrorCode::UserNotFound))?;

            let token = Uuid::new_v4().simple().to_string();
            let expires_at = Utc::now() + self.settings.reset_token_ttl;
            self.users
                .save_reset_token(&token, user.uid, expires_at)
                .await?;

            tracing::info!(
                "📧 Link de recuperação de senha enviado para {} (válido até {})",
                user.email,
                expires_at
            );
            Ok::<_, AppError>(token)
        })
        .await
        .map_err(|e| unexpected(AppError::from(e)))
    }

    pub async fn confirm_password_reset(
        &self,
        payload: ResetPasswordPayload,
    ) -> Result<(), AppError> {
        payload.validate()?;
        self.reset_password(payload).await.map_err(unexpected)
    }

    async fn reset_password(&self, payload: ResetPasswordPayload) -> Result<(), AppError> {
        let (uid, expires_at) = self
            .users
            .take_reset_token(&payload.token)
            .await?
            .ok_or(AppError::InvalidResetToken)?;

        if expires_at < Utc::now() {
            return Err(AppError::InvalidResetToken);
        }

        let password_hash = self.hash_password(&payload.new_password).await?;
        self.users.update_password(uid, &password_hash).await?;

        tracing::info!("🔑 Senha redefinida para {}", uid);
        Ok(())
    }

    /// Decodifica o token e carrega o perfil do dono.
    pub async fn validate_token(&self, token: &str) -> Result<(UserProfile, Claims), AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        let claims = token_data.claims;

        if self.revoked.read().await.contains_key(&claims.jti) {
            return Err(AppError::InvalidToken);
        }

        let profile = self
            .users
            .get_profile(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok((profile, claims))
    }

    pub async fn get_profile(&self, uid: Uuid) -> Result<UserProfile, AppError> {
        self.users
            .get_profile(uid)
            .await?
            .ok_or(AppError::Auth(AuthErrorCode::UserNotFound))
    }

    // ---
    // Auxiliares
    // ---

    fn session_for(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            token: self.create_token(user.uid)?,
            user: user.profile(),
        })
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.settings.token_ttl;

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_ref()),
        )?)
    }

    // bcrypt é pesado: roda fora do executor
    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let cost = self.settings.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
        Ok(valid)
    }
}
