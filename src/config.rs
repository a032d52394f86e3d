// src/config.rs

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use sqlx::PgPool;
use thiserror::Error;

use crate::{
    db::{CompanyRepository, MockTemplates, TemplateRepository, TemplateStore, UserRepository},
    services::{
        auth::{AuthService, AuthSettings},
        cache::LocalCache,
        company_service::CompanyService,
        template_service::TemplateService,
    },
};

// Variáveis sem as quais a aplicação não sobe
pub const REQUIRED_VARS: [&str; 3] = ["DATABASE_URL", "JWT_SECRET", "CACHE_DIR"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}", missing_vars_message(.0))]
    MissingVars(Vec<&'static str>),

    #[error("Valor inválido para {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

fn missing_vars_message(vars: &[&'static str]) -> String {
    let mut lines = vec!["Variáveis de ambiente obrigatórias ausentes:".to_string()];
    lines.extend(vars.iter().map(|var| format!("  • {var}")));
    lines.push(String::new());
    lines.push("Verifique o arquivo .env e garanta que todas as variáveis estão definidas.".to_string());
    lines.join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatesSource {
    Mock,
    Database,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub cache_dir: PathBuf,
    pub server_addr: String,
    pub app_version: String,
    pub debug: bool,
    pub environment: AppEnvironment,
    pub templates_source: TemplatesSource,
    pub jwt_ttl_days: i64,
    pub reset_token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Lê o `.env` (se existir) e as variáveis do processo.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Monta a configuração a partir de qualquer fonte de variáveis.
    ///
    /// Todas as obrigatórias ausentes são reportadas de uma vez.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut required: HashMap<&'static str, String> = HashMap::new();
        let mut missing = Vec::new();
        for name in REQUIRED_VARS {
            match get(name) {
                Some(value) => {
                    required.insert(name, value);
                }
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let environment = match get("APP_ENV").as_deref() {
            None | Some("development") => AppEnvironment::Development,
            Some("production") => AppEnvironment::Production,
            Some("test") => AppEnvironment::Test,
            Some(other) => return Err(invalid("APP_ENV", other)),
        };
        let templates_source = match get("TEMPLATES_SOURCE").as_deref() {
            None | Some("mock") => TemplatesSource::Mock,
            Some("database") => TemplatesSource::Database,
            Some(other) => return Err(invalid("TEMPLATES_SOURCE", other)),
        };
        let debug = get("APP_DEBUG").as_deref() == Some("true")
            || environment == AppEnvironment::Development;

        Ok(Self {
            database_url: required.remove("DATABASE_URL").unwrap_or_default(),
            jwt_secret: required.remove("JWT_SECRET").unwrap_or_default(),
            cache_dir: PathBuf::from(required.remove("CACHE_DIR").unwrap_or_default()),
            server_addr: get("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            app_version: get("APP_VERSION").unwrap_or_else(|| "1.0.0".to_string()),
            debug,
            environment,
            templates_source,
            jwt_ttl_days: parse_or(get("JWT_TTL_DAYS"), "JWT_TTL_DAYS", 7)?,
            reset_token_ttl_minutes: parse_or(
                get("RESET_TOKEN_TTL_MINUTES"),
                "RESET_TOKEN_TTL_MINUTES",
                60,
            )?,
            bcrypt_cost: parse_or(get("BCRYPT_COST"), "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: self.jwt_secret.clone(),
            token_ttl: chrono::Duration::days(self.jwt_ttl_days),
            reset_token_ttl: chrono::Duration::minutes(self.reset_token_ttl_minutes),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| invalid(name, &raw)),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub template_service: TemplateService,
}

impl AppState {
    // Monta o gráfico de dependências a partir da configuração explícita
    pub async fn new(config: AppConfig, db_pool: PgPool) -> anyhow::Result<Self> {
        let cache = LocalCache::open(&config.cache_dir)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao preparar o cache local: {}", e))?;

        let templates: Arc<dyn TemplateStore> = match config.templates_source {
            TemplatesSource::Mock => Arc::new(MockTemplates),
            TemplatesSource::Database => Arc::new(TemplateRepository::new(db_pool.clone())),
        };

        let auth_service = AuthService::new(
            Arc::new(UserRepository::new(db_pool.clone())),
            config.auth_settings(),
        );
        let company_service =
            CompanyService::new(Arc::new(CompanyRepository::new(db_pool)), cache);
        let template_service = TemplateService::new(templates);

        tracing::info!(
            "✅ Estado da aplicação montado (versão {}, templates: {:?})",
            config.app_version,
            config.templates_source
        );

        Ok(Self {
            config: Arc::new(config),
            auth_service,
            company_service,
            template_service,
        })
    }
}
