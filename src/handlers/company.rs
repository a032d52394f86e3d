// src/handlers/company.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    config::AppState,
    forms::company_info::{CompanyFormView, CompanyInfoFormPayload, parse_required},
    middleware::auth::AuthenticatedUser,
    models::company::{CompanyInfo, UpdateCompanyInfoData},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequiredFieldsQuery {
    /// Grupos exigidos, separados por vírgula
    /// (`logo,name,document,email,phone,address,socialMedia`).
    #[param(example = "name,email,phone,address")]
    pub required: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveLogoPayload {
    /// `data:image/<tipo>;base64,...`
    pub source: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoResponse {
    #[schema(example = "file:///var/cache/trampo/logos/company_logo_3f2b9c1e_1700000000000.jpg")]
    pub uri: String,
}

// GET /api/company-info
#[utoipa::path(
    get,
    path = "/api/company-info",
    tag = "Company",
    responses(
        (status = 200, description = "Informações da empresa", body = CompanyInfo),
        (status = 404, description = "Empresa ainda não cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company_info(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let info = app_state
        .company_service
        .get(user.uid)
        .await?
        .ok_or(AppError::CompanyInfoNotFound)?;

    Ok(Json(info))
}

// POST /api/company-info?required=...
#[utoipa::path(
    post,
    path = "/api/company-info",
    tag = "Company",
    params(RequiredFieldsQuery),
    request_body = CompanyInfoFormPayload,
    responses(
        (status = 201, description = "Informações salvas", body = CompanyInfo),
        (status = 400, description = "Campos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_company_info(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<RequiredFieldsQuery>,
    Json(payload): Json<CompanyInfoFormPayload>,
) -> Result<impl IntoResponse, AppError> {
    let required = parse_required(query.required.as_deref());
    let info = app_state
        .company_service
        .submit_form(user.uid, &payload, required)
        .await?;

    Ok((StatusCode::CREATED, Json(info)))
}

// GET /api/company-info/form?required=...
#[utoipa::path(
    get,
    path = "/api/company-info/form",
    tag = "Company",
    params(RequiredFieldsQuery),
    responses(
        (status = 200, description = "Formulário de edição preenchido e validado", body = CompanyFormView)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company_form(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<RequiredFieldsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let required = parse_required(query.required.as_deref());
    let view = app_state.company_service.edit_form(user.uid, required).await?;
    Ok(Json(view))
}

// PATCH /api/company-info
#[utoipa::path(
    patch,
    path = "/api/company-info",
    tag = "Company",
    request_body = UpdateCompanyInfoData,
    responses(
        (status = 200, description = "Informações atualizadas", body = CompanyInfo),
        (status = 400, description = "Campos inválidos"),
        (status = 404, description = "Empresa ainda não cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company_info(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateCompanyInfoData>,
) -> Result<impl IntoResponse, AppError> {
    let info = app_state.company_service.update(user.uid, payload).await?;
    Ok(Json(info))
}

// POST /api/company-info/logo
#[utoipa::path(
    post,
    path = "/api/company-info/logo",
    tag = "Company",
    request_body = SaveLogoPayload,
    responses(
        (status = 201, description = "Logo armazenada", body = LogoResponse),
        (status = 400, description = "Formato não suportado")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_logo(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SaveLogoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let uri = app_state
        .company_service
        .save_logo(user.uid, &payload.source)
        .await?;

    Ok((StatusCode::CREATED, Json(LogoResponse { uri })))
}

// GET /api/company-info/logo
#[utoipa::path(
    get,
    path = "/api/company-info/logo",
    tag = "Company",
    responses(
        (status = 200, description = "Logo em cache", body = LogoResponse),
        (status = 404, description = "Nenhuma logo em cache")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_logo(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let uri = app_state.company_service.get_logo(user.uid).await?;
    Ok(Json(LogoResponse { uri }))
}

// DELETE /api/company-info/cache
#[utoipa::path(
    delete,
    path = "/api/company-info/cache",
    tag = "Company",
    responses(
        (status = 204, description = "Cache local limpo")
    ),
    security(("api_jwt" = []))
)]
pub async fn clear_cache(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> impl IntoResponse {
    app_state.company_service.clear_cache(user.uid).await;
    StatusCode::NO_CONTENT
}
