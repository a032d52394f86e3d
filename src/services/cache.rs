// src/services/cache.rs

//! Cache local das informações da empresa e da logo.
//!
//! O JSON do cadastro fica num armazenamento chave-valor; a logo é gravada
//! como arquivo e só o caminho (`file://...`) vai para o chave-valor.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::{common::error::AppError, models::company::CompanyInfo};

static DATA_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/\w+;base64,").expect("regex de data URI"));

const FILE_SCHEME: &str = "file://";

fn company_info_key(user_id: Uuid) -> String {
    format!("company_info:{user_id}")
}

fn logo_key(user_id: Uuid) -> String {
    format!("company_logo_uri:{user_id}")
}

/// Armazenamento chave-valor de strings.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn remove_item(&self, key: &str) -> Result<(), AppError>;
}

fn io_error(context: &str, err: std::io::Error) -> AppError {
    AppError::CacheError(format!("{context}: {err}"))
}

/// Um arquivo por chave dentro de `dir`.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.txt"))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("leitura do cache", e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        tokio::fs::write(self.path_for(key), value)
            .await
            .map_err(|e| io_error("escrita no cache", e))
    }

    async fn remove_item(&self, key: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remoção do cache", e)),
        }
    }
}

#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
    logo_dir: PathBuf,
}

impl LocalCache {
    /// Prepara `<cache_dir>/kv` e `<cache_dir>/logos`.
    pub async fn open(cache_dir: &Path) -> Result<Self, AppError> {
        let kv_dir = cache_dir.join("kv");
        let logo_dir = cache_dir.join("logos");
        for dir in [&kv_dir, &logo_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| io_error("criação do diretório de cache", e))?;
        }
        let logo_dir = tokio::fs::canonicalize(&logo_dir)
            .await
            .map_err(|e| io_error("diretório de logos", e))?;

        Ok(Self::with_store(Arc::new(FileKeyValueStore::new(kv_dir)), logo_dir))
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>, logo_dir: PathBuf) -> Self {
        Self { store, logo_dir }
    }

    // ---
    // Informações da empresa
    // ---

    pub async fn save_company_info(&self, info: &CompanyInfo) -> Result<(), AppError> {
        let json = serde_json::to_string(info)
            .map_err(|e| AppError::CacheError(format!("serialização: {e}")))?;

        self.store
            .set_item(&company_info_key(info.user_id), &json)
            .await
            .map_err(|e| {
                tracing::error!("Erro ao salvar informações no cache: {}", e);
                AppError::CacheError("Erro ao salvar informações no cache".to_string())
            })
    }

    /// Qualquer falha de leitura vira "sem cache".
    pub async fn get_company_info(&self, user_id: Uuid) -> Option<CompanyInfo> {
        let raw = match self.store.get_item(&company_info_key(user_id)).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Erro ao ler informações do cache: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("Cache de informações corrompido para {}: {}", user_id, e);
                None
            }
        }
    }

    /// Remove o cadastro e a logo do cache.
    pub async fn clear(&self, user_id: Uuid) {
        if let Err(e) = self.store.remove_item(&company_info_key(user_id)).await {
            tracing::warn!("Erro ao limpar cache: {}", e);
        }
        self.delete_logo(user_id).await;
    }

    // ---
    // Logo
    // ---

    fn logo_path(uri: &str) -> &Path {
        Path::new(uri.strip_prefix(FILE_SCHEME).unwrap_or(uri))
    }

    fn logo_file_prefix(user_id: Uuid) -> String {
        format!("company_logo_{}_", user_id.simple())
    }

    // Só vale um arquivo do próprio usuário dentro do diretório de logos
    fn is_stored_logo(&self, user_id: Uuid, source: &str) -> bool {
        let path = Self::logo_path(source);
        let owned = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&Self::logo_file_prefix(user_id)));
        owned && path.parent() == Some(self.logo_dir.as_path())
    }

    /// Grava a logo e devolve a URI do arquivo.
    ///
    /// Aceita `data:image/<tipo>;base64,...`; uma URI que já aponta para uma
    /// logo do próprio usuário é devolvida sem alteração.
    pub async fn save_logo(&self, user_id: Uuid, source: &str) -> Result<String, AppError> {
        let Some(prefix) = DATA_URI_RE.find(source) else {
            if self.is_stored_logo(user_id, source) {
                return Ok(source.to_string());
            }
            return Err(AppError::InvalidLogoSource);
        };

        let bytes = STANDARD
            .decode(&source[prefix.end()..])
            .map_err(|_| AppError::InvalidLogoSource)?;

        let filename = format!(
            "{}{}.jpg",
            Self::logo_file_prefix(user_id),
            Utc::now().timestamp_millis()
        );
        let path = self.logo_dir.join(filename);
        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            tracing::error!("Erro ao salvar logo no dispositivo: {}", e);
            AppError::CacheError("Erro ao salvar logo no dispositivo".to_string())
        })?;

        // A logo anterior deixa de ser referenciada
        self.delete_logo(user_id).await;

        let uri = format!("{FILE_SCHEME}{}", path.display());
        self.store.set_item(&logo_key(user_id), &uri).await?;

        tracing::info!("🖼️ Logo salva para {} ({} bytes)", user_id, bytes.len());
        Ok(uri)
    }

    /// URI da logo, se o arquivo ainda existir. Uma referência para arquivo
    /// apagado é removida.
    pub async fn get_logo(&self, user_id: Uuid) -> Option<String> {
        let key = logo_key(user_id);
        let uri = match self.store.get_item(&key).await {
            Ok(uri) => uri?,
            Err(e) => {
                tracing::warn!("Erro ao ler logo do cache: {}", e);
                return None;
            }
        };

        match tokio::fs::try_exists(Self::logo_path(&uri)).await {
            Ok(true) => Some(uri),
            _ => {
                if let Err(e) = self.store.remove_item(&key).await {
                    tracing::warn!("Erro ao limpar referência da logo: {}", e);
                }
                None
            }
        }
    }

    pub async fn delete_logo(&self, user_id: Uuid) {
        let key = logo_key(user_id);
        let uri = match self.store.get_item(&key).await {
            Ok(Some(uri)) => uri,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Erro ao apagar logo: {}", e);
                return;
            }
        };

        if let Err(e) = tokio::fs::remove_file(Self::logo_path(&uri)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Erro ao apagar logo: {}", e);
            }
        }
        if let Err(e) = self.store.remove_item(&key).await {
            tracing::warn!("Erro ao apagar logo: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::CreateCompanyInfoData;

    // "trampo" em base64
    const LOGO_DATA_URI: &str = "data:image/jpeg;base64,dHJhbXBv";

    async fn cache() -> (tempfile::TempDir, LocalCache) {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = LocalCache::open(dir.path()).await.expect("cache");
        (dir, cache)
    }

    fn company(user_id: Uuid) -> CompanyInfo {
        CreateCompanyInfoData {
            logo: None,
            name: "Marcenaria".into(),
            document: None,
            email: "m@m.com".into(),
            phone: "(11) 3333-4444".into(),
            address: None,
            social_media: None,
        }
        .into_company_info(user_id, Utc::now())
    }

    #[tokio::test]
    async fn company_info_round_trips_through_the_cache() {
        let (_dir, cache) = cache().await;
        let uid = Uuid::new_v4();
        let info = company(uid);

        assert!(cache.get_company_info(uid).await.is_none());
        cache.save_company_info(&info).await.unwrap();
        assert_eq!(cache.get_company_info(uid).await, Some(info));
    }

    #[tokio::test]
    async fn corrupted_entry_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileKeyValueStore::new(dir.path()));
        let uid = Uuid::new_v4();
        store.set_item(&company_info_key(uid), "{não é json").await.unwrap();

        let cache = LocalCache::with_store(store, dir.path().to_path_buf());
        assert!(cache.get_company_info(uid).await.is_none());
    }

    #[tokio::test]
    async fn data_uri_logo_is_written_to_disk() {
        let (_dir, cache) = cache().await;
        let uid = Uuid::new_v4();

        let uri = cache.save_logo(uid, LOGO_DATA_URI).await.unwrap();
        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with(".jpg"));

        let bytes = tokio::fs::read(LocalCache::logo_path(&uri)).await.unwrap();
        assert_eq!(bytes, b"trampo");
        assert_eq!(cache.get_logo(uid).await, Some(uri));
    }

    #[tokio::test]
    async fn stored_logo_uri_is_returned_unchanged() {
        let (_dir, cache) = cache().await;
        let uid = Uuid::new_v4();
        let uri = cache.save_logo(uid, LOGO_DATA_URI).await.unwrap();

        assert_eq!(cache.save_logo(uid, &uri).await.unwrap(), uri);
    }

    #[tokio::test]
    async fn another_users_logo_uri_is_rejected() {
        let (_dir, cache) = cache().await;
        let owner = Uuid::new_v4();
        let uri = cache.save_logo(owner, LOGO_DATA_URI).await.unwrap();

        let intruder = Uuid::new_v4();
        assert!(matches!(
            cache.save_logo(intruder, &uri).await,
            Err(AppError::InvalidLogoSource)
        ));
        assert_eq!(cache.get_logo(intruder).await, None);
        assert_eq!(cache.get_logo(owner).await, Some(uri));
    }

    #[tokio::test]
    async fn unsupported_sources_are_rejected() {
        let (_dir, cache) = cache().await;
        let uid = Uuid::new_v4();

        for source in ["file:///etc/passwd", "https://x.com/logo.png", "data:image/png;base64,@@@"] {
            assert!(matches!(
                cache.save_logo(uid, source).await,
                Err(AppError::InvalidLogoSource)
            ));
        }
    }

    #[tokio::test]
    async fn missing_logo_file_clears_the_stale_reference() {
        let (_dir, cache) = cache().await;
        let uid = Uuid::new_v4();
        let uri = cache.save_logo(uid, LOGO_DATA_URI).await.unwrap();

        tokio::fs::remove_file(LocalCache::logo_path(&uri)).await.unwrap();

        assert_eq!(cache.get_logo(uid).await, None);
        assert_eq!(cache.store.get_item(&logo_key(uid)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_removes_info_and_logo_file() {
        let (_dir, cache) = cache().await;
        let uid = Uuid::new_v4();
        cache.save_company_info(&company(uid)).await.unwrap();
        let uri = cache.save_logo(uid, LOGO_DATA_URI).await.unwrap();

        cache.clear(uid).await;

        assert!(cache.get_company_info(uid).await.is_none());
        assert!(cache.get_logo(uid).await.is_none());
        assert!(!LocalCache::logo_path(&uri).exists());
    }
}
