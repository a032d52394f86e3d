// src/db/company_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use super::CompanyStore;
use crate::{
    common::error::AppError,
    models::company::{CompanyAddress, CompanyInfo, CompanySocialMedia, UpdateCompanyInfoData},
};

// Endereço e redes sociais ficam em JSONB, como objetos aninhados
#[derive(Debug, FromRow)]
struct CompanyInfoRow {
    id: Uuid,
    user_id: Uuid,
    logo: Option<String>,
    name: String,
    document: Option<String>,
    email: String,
    phone: String,
    address: Option<Json<CompanyAddress>>,
    social_media: Option<Json<CompanySocialMedia>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CompanyInfoRow> for CompanyInfo {
    fn from(row: CompanyInfoRow) -> Self {
        CompanyInfo {
            id: row.id,
            user_id: row.user_id,
            logo: row.logo,
            name: row.name,
            document: row.document,
            email: row.email,
            phone: row.phone,
            address: row.address.map(|Json(a)| a),
            social_media: row.social_media.map(|Json(s)| s),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "id, user_id, logo, name, document, email, phone, address, social_media, created_at, updated_at";

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn create_company_info(&self, info: &CompanyInfo) -> Result<CompanyInfo, AppError> {
        // UPSERT: o documento tem o uid como chave, created_at é preservado
        let sql = format!(
            r#"
            INSERT INTO company_info ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id)
            DO UPDATE SET
                logo = EXCLUDED.logo,
                name = EXCLUDED.name,
                document = EXCLUDED.document,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                social_media = EXCLUDED.social_media,
                updated_at = EXCLUDED.updated_at
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, CompanyInfoRow>(&sql)
            .bind(info.id)
            .bind(info.user_id)
            .bind(&info.logo)
            .bind(&info.name)
            .bind(&info.document)
            .bind(&info.email)
            .bind(&info.phone)
            .bind(info.address.clone().map(Json))
            .bind(info.social_media.clone().map(Json))
            .bind(info.created_at)
            .bind(info.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_company_info(&self, user_id: Uuid) -> Result<Option<CompanyInfo>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM company_info WHERE id = $1");
        let row = sqlx::query_as::<_, CompanyInfoRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CompanyInfo::from))
    }

    async fn update_company_info(
        &self,
        user_id: Uuid,
        data: UpdateCompanyInfoData,
        now: DateTime<Utc>,
    ) -> Result<CompanyInfo, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha, aplica o merge em memória e grava de volta
        let select = format!("SELECT {COLUMNS} FROM company_info WHERE id = $1 FOR UPDATE");
        let mut info: CompanyInfo = sqlx::query_as::<_, CompanyInfoRow>(&select)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::CompanyInfoNotFound)?
            .into();

        data.apply_to(&mut info, now);

        let update = format!(
            r#"
            UPDATE company_info SET
                logo = $2, name = $3, document = $4, email = $5, phone = $6,
                address = $7, social_media = $8, updated_at = $9
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CompanyInfoRow>(&update)
            .bind(user_id)
            .bind(&info.logo)
            .bind(&info.name)
            .bind(&info.document)
            .bind(&info.email)
            .bind(&info.phone)
            .bind(info.address.clone().map(Json))
            .bind(info.social_media.clone().map(Json))
            .bind(info.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }
}
