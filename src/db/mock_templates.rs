// src/db/mock_templates.rs

// Catálogo fixo da galeria de templates, usado enquanto a coleção
// `templates` não é populada (TEMPLATES_SOURCE=mock).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use super::TemplateStore;
use crate::{
    common::error::AppError,
    models::template::{
        BudgetTemplate, TemplateCategory, TemplateColors, TemplateFonts, TemplateLayout,
    },
};

const FULL_SECTIONS: [&str; 5] = ["header", "items", "summary", "terms", "footer"];
const SHORT_SECTIONS: [&str; 4] = ["header", "items", "summary", "footer"];

struct TemplateSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: TemplateCategory,
    colors: [&'static str; 3],
    fonts: [&'static str; 2],
    sections: &'static [&'static str],
}

const SEEDS: [TemplateSeed; 5] = [
    TemplateSeed {
        id: "template-1-modern",
        name: "Moderno",
        description: "Design moderno e minimalista, ideal para serviços de tecnologia e design",
        category: TemplateCategory::Modern,
        colors: ["#0a7ea4", "#687076", "#11181C"],
        fonts: ["sans", "sans"],
        sections: &FULL_SECTIONS,
    },
    TemplateSeed {
        id: "template-2-classic",
        name: "Clássico",
        description: "Estilo tradicional e elegante, perfeito para serviços profissionais",
        category: TemplateCategory::Classic,
        colors: ["#2c3e50", "#7f8c8d", "#34495e"],
        fonts: ["serif", "serif"],
        sections: &FULL_SECTIONS,
    },
    TemplateSeed {
        id: "template-3-minimal",
        name: "Minimalista",
        description: "Clean e direto ao ponto, ótimo para freelancers",
        category: TemplateCategory::Minimal,
        colors: ["#000000", "#666666", "#333333"],
        fonts: ["sans", "sans"],
        sections: &SHORT_SECTIONS,
    },
    TemplateSeed {
        id: "template-4-professional",
        name: "Profissional",
        description: "Layout corporativo e confiável para grandes projetos",
        category: TemplateCategory::Professional,
        colors: ["#1e3a8a", "#64748b", "#0f172a"],
        fonts: ["sans", "sans"],
        sections: &FULL_SECTIONS,
    },
    TemplateSeed {
        id: "template-5-colorful",
        name: "Criativo",
        description: "Vibrante e colorido, ideal para áreas criativas",
        category: TemplateCategory::Colorful,
        colors: ["#8b5cf6", "#ec4899", "#f59e0b"],
        fonts: ["rounded", "sans"],
        sections: &FULL_SECTIONS,
    },
];

fn build(seed: &TemplateSeed, created_at: DateTime<Utc>) -> BudgetTemplate {
    let [primary, secondary, accent] = seed.colors;
    let [heading, body] = seed.fonts;

    BudgetTemplate {
        id: seed.id.to_string(),
        name: seed.name.to_string(),
        description: seed.description.to_string(),
        thumbnail_url: None,
        category: seed.category,
        is_active: true,
        layout: TemplateLayout {
            colors: TemplateColors {
                primary: primary.to_string(),
                secondary: secondary.to_string(),
                accent: accent.to_string(),
            },
            fonts: TemplateFonts {
                heading: heading.to_string(),
                body: body.to_string(),
            },
            sections: seed.sections.iter().map(|s| s.to_string()).collect(),
        },
        created_at,
    }
}

// Montado uma única vez, na primeira consulta
static MOCK_TEMPLATES: Lazy<Vec<BudgetTemplate>> = Lazy::new(|| {
    let now = Utc::now();
    SEEDS.iter().map(|seed| build(seed, now)).collect()
});

#[derive(Clone, Default)]
pub struct MockTemplates;

#[async_trait]
impl TemplateStore for MockTemplates {
    async fn list_active(&self) -> Result<Vec<BudgetTemplate>, AppError> {
        Ok(MOCK_TEMPLATES.iter().filter(|t| t.is_active).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BudgetTemplate>, AppError> {
        Ok(MOCK_TEMPLATES.iter().find(|t| t.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn gallery_lists_the_five_templates_in_order() {
        let templates = MockTemplates.list_active().await.unwrap();
        let ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "template-1-modern",
                "template-2-classic",
                "template-3-minimal",
                "template-4-professional",
                "template-5-colorful",
            ]
        );
    }

    #[tokio::test]
    async fn minimal_template_has_no_terms_section() {
        let minimal = MockTemplates
            .find_by_id("template-3-minimal")
            .await
            .unwrap()
            .expect("template existe");
        assert_eq!(minimal.layout.sections, ["header", "items", "summary", "footer"]);
        assert_eq!(minimal.category, TemplateCategory::Minimal);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        assert!(MockTemplates.find_by_id("template-9").await.unwrap().is_none());
    }
}
