// src/handlers/templates.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{common::error::AppError, config::AppState, models::template::BudgetTemplate};

// GET /api/templates
#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "Templates",
    responses(
        (status = 200, description = "Templates ativos", body = [BudgetTemplate])
    )
)]
pub async fn list_templates(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let templates = app_state.template_service.list_active().await?;
    Ok(Json(templates))
}

// GET /api/templates/{id}
#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    tag = "Templates",
    params(
        ("id" = String, Path, description = "ID do template", example = "template-1-modern")
    ),
    responses(
        (status = 200, description = "Template para pré-visualização", body = BudgetTemplate),
        (status = 404, description = "Template não encontrado")
    )
)]
pub async fn get_template(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let template = app_state.template_service.get(&id).await?;
    Ok(Json(template))
}
