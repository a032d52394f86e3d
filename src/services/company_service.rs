// src/services/company_service.rs

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompanyStore,
    forms::company_info::{
        CompanyFormView, CompanyInfoForm, CompanyInfoFormPayload, normalize_update,
    },
    models::company::{CompanyInfo, CompanyInfoField, CreateCompanyInfoData, UpdateCompanyInfoData},
    services::cache::LocalCache,
};

/// Cadastro da empresa: banco como fonte da verdade, cache local na frente.
#[derive(Clone)]
pub struct CompanyService {
    store: Arc<dyn CompanyStore>,
    cache: LocalCache,
}

impl CompanyService {
    pub fn new(store: Arc<dyn CompanyStore>, cache: LocalCache) -> Self {
        Self { store, cache }
    }

    /// Envio da tela "Informações da Empresa".
    pub async fn submit_form(
        &self,
        user_id: Uuid,
        payload: &CompanyInfoFormPayload,
        required: HashSet<CompanyInfoField>,
    ) -> Result<CompanyInfo, AppError> {
        let mut form = CompanyInfoForm::from_payload(payload, required);
        let info = form.submit(|data| self.create(user_id, data)).await?;
        Ok(info)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        data: CreateCompanyInfoData,
    ) -> Result<CompanyInfo, AppError> {
        let info = data.into_company_info(user_id, Utc::now());
        let saved = self.store.create_company_info(&info).await?;

        self.refresh_cache(&saved).await;
        tracing::info!("🏢 Informações da empresa salvas para {}", user_id);
        Ok(saved)
    }

    /// Cópia do cache se houver; senão busca no banco e repopula o cache.
    pub async fn get(&self, user_id: Uuid) -> Result<Option<CompanyInfo>, AppError> {
        if let Some(cached) = self.cache.get_company_info(user_id).await {
            tracing::debug!("Informações da empresa lidas do cache para {}", user_id);
            return Ok(Some(cached));
        }

        let stored = self.store.get_company_info(user_id).await?;
        if let Some(info) = &stored {
            self.refresh_cache(info).await;
        }
        Ok(stored)
    }

    /// Formulário de edição preenchido com o cadastro atual e validado contra
    /// os grupos exigidos. Sem cadastro, o formulário vem em branco.
    pub async fn edit_form(
        &self,
        user_id: Uuid,
        required: HashSet<CompanyInfoField>,
    ) -> Result<CompanyFormView, AppError> {
        let mut form = CompanyInfoForm::new(required);
        if let Some(info) = self.get(user_id).await? {
            form.prefill(&info);
        }
        form.validate();
        Ok(form.view())
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        data: UpdateCompanyInfoData,
    ) -> Result<CompanyInfo, AppError> {
        let data = normalize_update(data)?;
        let updated = self
            .store
            .update_company_info(user_id, data, Utc::now())
            .await?;

        self.refresh_cache(&updated).await;
        Ok(updated)
    }

    pub async fn save_logo(&self, user_id: Uuid, source: &str) -> Result<String, AppError> {
        self.cache.save_logo(user_id, source).await
    }

    pub async fn get_logo(&self, user_id: Uuid) -> Result<String, AppError> {
        self.cache
            .get_logo(user_id)
            .await
            .ok_or(AppError::LogoNotFound)
    }

    pub async fn clear_cache(&self, user_id: Uuid) {
        self.cache.clear(user_id).await;
        tracing::info!("🧹 Cache local limpo para {}", user_id);
    }

    // O banco já foi gravado; falha de cache só degrada a próxima leitura
    async fn refresh_cache(&self, info: &CompanyInfo) {
        if let Err(e) = self.cache.save_company_info(info).await {
            tracing::warn!("Cache não atualizado para {}: {}", info.user_id, e);
        }
    }
}
