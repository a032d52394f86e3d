// src/routes.rs

use axum::{
    Json, Router,
    extract::State,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

// GET /api/health
async fn health(State(app_state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "OK", "version": app_state.config.app_version }))
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password))
        .route("/error-codes", get(handlers::auth::error_codes));

    let session_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let company_routes = Router::new()
        .route(
            "/",
            get(handlers::company::get_company_info)
                .post(handlers::company::submit_company_info)
                .patch(handlers::company::update_company_info),
        )
        .route("/form", get(handlers::company::get_company_form))
        .route(
            "/logo",
            post(handlers::company::save_logo).get(handlers::company::get_logo),
        )
        .route("/cache", delete(handlers::company::clear_cache))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let template_routes = Router::new()
        .route("/", get(handlers::templates::list_templates))
        .route("/{id}", get(handlers::templates::get_template));

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_routes.merge(session_routes))
        .nest("/api/users", user_routes)
        .nest("/api/company-info", company_routes)
        .nest("/api/templates", template_routes)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
