// src/db/template_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use super::TemplateStore;
use crate::{
    common::error::AppError,
    models::template::{BudgetTemplate, TemplateLayout},
};

#[derive(Debug, FromRow)]
struct TemplateRow {
    id: String,
    name: String,
    description: String,
    thumbnail_url: Option<String>,
    category: String,
    is_active: bool,
    layout: Json<TemplateLayout>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TemplateRow> for BudgetTemplate {
    type Error = AppError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        Ok(BudgetTemplate {
            id: row.id,
            name: row.name,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            category: row.category.parse()?,
            is_active: row.is_active,
            layout: row.layout.0,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for TemplateRepository {
    async fn list_active(&self) -> Result<Vec<BudgetTemplate>, AppError> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, name, description, thumbnail_url, category, is_active, layout, created_at
            FROM templates
            WHERE is_active = TRUE
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BudgetTemplate::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BudgetTemplate>, AppError> {
        let row = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, name, description, thumbnail_url, category, is_active, layout, created_at
            FROM templates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BudgetTemplate::try_from).transpose()
    }
}
