//src/main.rs

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod docs;
mod forms;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

use crate::config::{AppConfig, AppState};

#[tokio::main]
async fn main() {
    // A configuração vem primeiro: sem ela nem o nível de log é conhecido
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    tracing::info!(
        "⚙️ Trampo Certo v{} ({:?})",
        config.app_version,
        config.environment
    );

    // Se o banco não responder, a aplicação não deve iniciar.
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Falha ao conectar no banco de dados.");

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let server_addr = config.server_addr.clone();
    let app_state = AppState::new(config, db_pool)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    let app = routes::build_router(app_state);

    let listener = TcpListener::bind(&server_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", server_addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
