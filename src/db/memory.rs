// src/db/memory.rs

// Implementações em memória das stores, para os testes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CompanyStore, UserStore};
use crate::{
    common::{auth_errors::AuthErrorCode, error::AppError},
    models::{
        auth::User,
        company::{CompanyInfo, UpdateCompanyInfoData},
    },
};

#[derive(Default)]
pub struct MemoryUserStore {
    pub users: Mutex<HashMap<Uuid, User>>,
    pub resets: Mutex<HashMap<String, (Uuid, DateTime<Utc>)>>,
    // Simula o banco fora do ar
    pub fail: AtomicBool,
}

impl MemoryUserStore {
    fn check_online(&self) -> Result<(), AppError> {
        check_online(&self.fail)
    }
}

fn check_online(fail: &AtomicBool) -> Result<(), AppError> {
    if fail.load(Ordering::Relaxed) {
        return Err(AppError::InternalServerError(anyhow::anyhow!("banco indisponível")));
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        self.check_online()?;
        let mut users = self.users.lock().await;
        if users.values().any(|u| u.email == email) {
            return Err(AppError::Auth(AuthErrorCode::EmailAlreadyInUse));
        }

        let user = User {
            uid: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.uid, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.check_online()?;
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, uid: Uuid) -> Result<Option<User>, AppError> {
        self.check_online()?;
        Ok(self.users.lock().await.get(&uid).cloned())
    }

    async fn update_password(&self, uid: Uuid, password_hash: &str) -> Result<(), AppError> {
        if let Some(user) = self.users.lock().await.get_mut(&uid) {
            user.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn save_reset_token(
        &self,
        token: &str,
        uid: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.check_online()?;
        let mut resets = self.resets.lock().await;
        let now = Utc::now();
        resets.retain(|_, (_, expires)| *expires >= now);
        resets.insert(token.to_string(), (uid, expires_at));
        Ok(())
    }

    async fn take_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<(Uuid, DateTime<Utc>)>, AppError> {
        Ok(self.resets.lock().await.remove(token))
    }
}

#[derive(Default)]
pub struct MemoryCompanyStore {
    pub companies: Mutex<HashMap<Uuid, CompanyInfo>>,
    // Simula o banco fora do ar
    pub fail: AtomicBool,
}

impl MemoryCompanyStore {
    fn check_online(&self) -> Result<(), AppError> {
        check_online(&self.fail)
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    async fn create_company_info(&self, info: &CompanyInfo) -> Result<CompanyInfo, AppError> {
        self.check_online()?;
        let mut companies = self.companies.lock().await;
        let mut stored = info.clone();
        if let Some(existing) = companies.get(&info.id) {
            stored.created_at = existing.created_at;
        }
        companies.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_company_info(&self, user_id: Uuid) -> Result<Option<CompanyInfo>, AppError> {
        self.check_online()?;
        Ok(self.companies.lock().await.get(&user_id).cloned())
    }

    async fn update_company_info(
        &self,
        user_id: Uuid,
        data: UpdateCompanyInfoData,
        now: DateTime<Utc>,
    ) -> Result<CompanyInfo, AppError> {
        self.check_online()?;
        let mut companies = self.companies.lock().await;
        let info = companies
            .get_mut(&user_id)
            .ok_or(AppError::CompanyInfoNotFound)?;
        data.apply_to(info, now);
        Ok(info.clone())
    }
}
