// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Documento `users/{uid}`: criado uma vez no cadastro e nunca alterado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: Uuid,
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "maria@trampocerto.com.br")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}
