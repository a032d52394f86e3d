// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAddress {
    #[schema(example = "Rua das Flores")]
    pub street: String,
    #[schema(example = "123")]
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    #[schema(example = "SP")]
    pub state: String,
    #[schema(example = "01234-567")]
    pub zip_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "@trampocerto")]
    pub instagram: Option<String>,
}

// Documento `companyInfo/{uid}` (o id é o uid do dono)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "12.345.678/0001-95")]
    pub document: Option<String>,
    pub email: String,
    #[schema(example = "(11) 99999-8888")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<CompanyAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media: Option<CompanySocialMedia>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyInfoData {
    pub logo: Option<String>,
    pub name: String,
    pub document: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: Option<CompanyAddress>,
    pub social_media: Option<CompanySocialMedia>,
}

impl CreateCompanyInfoData {
    pub fn into_company_info(self, user_id: Uuid, now: DateTime<Utc>) -> CompanyInfo {
        CompanyInfo {
            id: user_id,
            user_id,
            logo: self.logo,
            name: self.name,
            document: self.document,
            email: self.email,
            phone: self.phone,
            address: self.address,
            social_media: self.social_media,
            created_at: now,
            updated_at: now,
        }
    }
}

// Atualização parcial: só os campos presentes são alterados
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyInfoData {
    pub logo: Option<String>,
    pub name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<CompanyAddress>,
    pub social_media: Option<CompanySocialMedia>,
}

impl UpdateCompanyInfoData {
    /// Aplica o merge sobre o documento atual e atualiza `updated_at`.
    pub fn apply_to(self, info: &mut CompanyInfo, now: DateTime<Utc>) {
        if let Some(logo) = self.logo {
            info.logo = Some(logo);
        }
        if let Some(name) = self.name {
            info.name = name;
        }
        if let Some(document) = self.document {
            info.document = Some(document);
        }
        if let Some(email) = self.email {
            info.email = email;
        }
        if let Some(phone) = self.phone {
            info.phone = phone;
        }
        if let Some(address) = self.address {
            info.address = Some(address);
        }
        if let Some(social_media) = self.social_media {
            info.social_media = Some(social_media);
        }
        info.updated_at = now;
    }
}

// Grupos de campos que a tela pode exigir (parâmetro `required`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CompanyInfoField {
    Logo,
    Name,
    Document,
    Email,
    Phone,
    Address,
    SocialMedia,
}

impl CompanyInfoField {
    pub const DEFAULT_REQUIRED: [CompanyInfoField; 3] = [
        CompanyInfoField::Name,
        CompanyInfoField::Email,
        CompanyInfoField::Phone,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "logo" => Some(CompanyInfoField::Logo),
            "name" => Some(CompanyInfoField::Name),
            "document" => Some(CompanyInfoField::Document),
            "email" => Some(CompanyInfoField::Email),
            "phone" => Some(CompanyInfoField::Phone),
            "address" => Some(CompanyInfoField::Address),
            "socialMedia" => Some(CompanyInfoField::SocialMedia),
            _ => None,
        }
    }
}
