// src/db.rs

// Contratos de persistência usados pelos serviços. As implementações de
// produção ficam nos repositórios Postgres; os testes usam `memory`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        company::{CompanyInfo, UpdateCompanyInfoData},
        template::BudgetTemplate,
        user::UserProfile,
    },
};

pub mod company_repo;
pub mod mock_templates;
pub mod template_repo;
pub mod user_repo;

#[cfg(test)]
pub mod memory;

pub use company_repo::CompanyRepository;
pub use mock_templates::MockTemplates;
pub use template_repo::TemplateRepository;
pub use user_repo::UserRepository;

/// Credenciais, perfis (`users/{uid}`) e tokens de recuperação de senha.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Cria credencial e perfil juntos. E-mail repetido vira
    /// `auth/email-already-in-use`.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, uid: Uuid) -> Result<Option<User>, AppError>;

    async fn get_profile(&self, uid: Uuid) -> Result<Option<UserProfile>, AppError> {
        Ok(self.find_by_id(uid).await?.map(|user| user.profile()))
    }

    async fn update_password(&self, uid: Uuid, password_hash: &str) -> Result<(), AppError>;

    async fn save_reset_token(
        &self,
        token: &str,
        uid: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Consome o token (uso único) e devolve o dono e a validade.
    async fn take_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<(Uuid, DateTime<Utc>)>, AppError>;
}

/// Documentos `companyInfo/{uid}`.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Grava o cadastro. Se já existir, substitui tudo menos `created_at`.
    async fn create_company_info(&self, info: &CompanyInfo) -> Result<CompanyInfo, AppError>;

    async fn get_company_info(&self, user_id: Uuid) -> Result<Option<CompanyInfo>, AppError>;

    /// Merge dos campos presentes. Falha com `CompanyInfoNotFound` se não houver
    /// cadastro.
    async fn update_company_info(
        &self,
        user_id: Uuid,
        data: UpdateCompanyInfoData,
        now: DateTime<Utc>,
    ) -> Result<CompanyInfo, AppError>;
}

/// Templates de orçamento (somente leitura).
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<BudgetTemplate>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<BudgetTemplate>, AppError>;
}
