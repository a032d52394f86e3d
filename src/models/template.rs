// src/models/template.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Modern,
    Classic,
    Minimal,
    Professional,
    Colorful,
}

impl FromStr for TemplateCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modern" => Ok(TemplateCategory::Modern),
            "classic" => Ok(TemplateCategory::Classic),
            "minimal" => Ok(TemplateCategory::Minimal),
            "professional" => Ok(TemplateCategory::Professional),
            "colorful" => Ok(TemplateCategory::Colorful),
            other => Err(anyhow::anyhow!("Categoria de template desconhecida: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateColors {
    #[schema(example = "#0a7ea4")]
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateFonts {
    #[schema(example = "sans")]
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateLayout {
    pub colors: TemplateColors,
    pub fonts: TemplateFonts,
    // Ordem das seções no orçamento
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTemplate {
    #[schema(example = "template-1-modern")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub category: TemplateCategory,
    pub is_active: bool,
    pub layout: TemplateLayout,
    pub created_at: DateTime<Utc>,
}
