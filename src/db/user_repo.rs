// src/db/user_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::UserStore;
use crate::{
    common::{auth_errors::AuthErrorCode, error::AppError},
    models::auth::User,
};

// O repositório de usuários, responsável pelas tabelas 'users' e 'password_resets'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    // Com tratamento de erro específico para e-mails duplicados.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (uid, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING uid, name, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                // O nome padrão que o Postgres cria para "UNIQUE" na coluna email
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return AppError::Auth(AuthErrorCode::EmailAlreadyInUse);
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    // Busca um usuário pelo seu e-mail
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT uid, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    async fn find_by_id(&self, uid: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT uid, name, email, password_hash, created_at FROM users WHERE uid = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    async fn update_password(&self, uid: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE uid = $1")
            .bind(uid)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_reset_token(
        &self,
        token: &str,
        uid: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Links vencidos nunca mais serão usados
        sqlx::query("DELETE FROM password_resets WHERE expires_at < NOW()")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO password_resets (token, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(token)
        .bind(uid)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn take_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<(Uuid, DateTime<Utc>)>, AppError> {
        // DELETE ... RETURNING garante o uso único
        let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            "DELETE FROM password_resets WHERE token = $1 RETURNING user_id, expires_at",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
