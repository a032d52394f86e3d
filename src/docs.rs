// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::{forms, handlers, models};

#[derive(OpenApi)]
#[openapi(
    info(title = "Trampo Certo API", description = "Cadastro, empresa e templates de orçamento"),
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,
        handlers::auth::error_codes,

        // --- Users ---
        handlers::auth::get_me,

        // --- Company ---
        handlers::company::get_company_info,
        handlers::company::submit_company_info,
        handlers::company::update_company_info,
        handlers::company::get_company_form,
        handlers::company::save_logo,
        handlers::company::get_logo,
        handlers::company::clear_cache,

        // --- Templates ---
        handlers::templates::list_templates,
        handlers::templates::get_template,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,
            models::auth::AuthResponse,
            models::auth::MessageResponse,
            models::auth::AuthErrorInfo,
            models::user::UserProfile,

            // --- Company ---
            models::company::CompanyInfo,
            models::company::CompanyAddress,
            models::company::CompanySocialMedia,
            models::company::UpdateCompanyInfoData,
            models::company::CompanyInfoField,
            forms::company_info::CompanyInfoFormPayload,
            forms::company_info::CompanyFormView,
            handlers::company::SaveLogoPayload,
            handlers::company::LogoResponse,

            // --- Templates ---
            models::template::BudgetTemplate,
            models::template::TemplateCategory,
            models::template::TemplateLayout,
            models::template::TemplateColors,
            models::template::TemplateFonts,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro, login e recuperação de senha"),
        (name = "Users", description = "Perfil do usuário"),
        (name = "Company", description = "Informações da empresa, logo e cache local"),
        (name = "Templates", description = "Galeria de templates de orçamento")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
