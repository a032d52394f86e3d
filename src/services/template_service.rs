// src/services/template_service.rs

use std::sync::Arc;

use crate::{common::error::AppError, db::TemplateStore, models::template::BudgetTemplate};

#[derive(Clone)]
pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Galeria: só os templates ativos.
    pub async fn list_active(&self) -> Result<Vec<BudgetTemplate>, AppError> {
        self.store.list_active().await
    }

    pub async fn get(&self, id: &str) -> Result<BudgetTemplate, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::TemplateNotFound)
    }
}
