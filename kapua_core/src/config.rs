use std::path::{Path, PathBuf};

use iroh::SecretKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

static DATA_DIR_NAME: &str = "kapua";
static KAPUA_DB_NAME: &str = "kapua_db.sqlite";
static CONFIG_FILE_NAME: &str = "config.json";

// data_dir_path
// |- kapua
//    |- kapua_db.sqlite
//    |- config.json

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no data directory on this platform")]
    NoDataDir,
    #[error("config io error")]
    Io(#[from] std::io::Error),
    #[error("malformed config file")]
    Json(#[from] serde_json::Error),
}

fn default_secret_key() -> SecretKey {
    SecretKey::generate(&mut rand::rng())
}

fn default_log_filter() -> String {
    "kapua_core=info".to_owned()
}

#[derive(Serialize, Deserialize, Debug)]
pub struct KapuaConfig {
    /// Secret key for the local node/instance.
    #[serde(default = "default_secret_key")]
    pub(crate) secret_key: SecretKey,

    /// Secret key used by the local client (separate from node secret).
    #[serde(default = "default_secret_key")]
    pub(crate) client_secret_key: SecretKey,

    pub(crate) database_path: PathBuf,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// MoE reference code document imported on start.
    #[serde(default)]
    pub reference_codes: Option<PathBuf>,
}

impl KapuaConfig {
    /// Creates a new KapuaConfig with generated secret keys and the specified data directory
    fn new(data_dir: &Path) -> Self {
        KapuaConfig {
            secret_key: default_secret_key(),
            client_secret_key: default_secret_key(),
            database_path: data_dir.join(KAPUA_DB_NAME),
            log_filter: default_log_filter(),
            reference_codes: None,
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

/// Gets the existing config or initializes a new one if it doesn't exist
pub async fn get_or_init() -> Result<KapuaConfig, ConfigError> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
    load_or_init(&data_dir.join(DATA_DIR_NAME)).await
}

/// Same as [`get_or_init`] but rooted at `kapua_dir` instead of the platform data directory.
pub async fn load_or_init(kapua_dir: &Path) -> Result<KapuaConfig, ConfigError> {
    let config_path = kapua_dir.join(CONFIG_FILE_NAME);

    fs::create_dir_all(kapua_dir).await?;

    if fs::try_exists(&config_path).await? {
        let mut file = fs::File::open(&config_path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;

        let config: KapuaConfig = serde_json::from_str(&contents)?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    } else {
        let config = KapuaConfig::new(kapua_dir);

        let json = serde_json::to_string_pretty(&config)?;
        let mut file = fs::File::create(&config_path).await?;
        file.write_all(json.as_bytes()).await?;

        tracing::info!(path = %config_path.display(), "created new config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kapua-config-{name}-{}", uuid::Uuid::now_v7()))
    }

    #[tokio::test]
    async fn creates_then_reloads_same_config() {
        let dir = scratch_dir("reload");

        let created = load_or_init(&dir).await.unwrap();
        assert_eq!(created.database_path, dir.join(KAPUA_DB_NAME));
        assert_eq!(created.log_filter, "kapua_core=info");
        assert!(created.reference_codes.is_none());

        let loaded = load_or_init(&dir).await.unwrap();
        assert_eq!(loaded.database_path, created.database_path);
        assert_eq!(loaded.secret_key.public(), created.secret_key.public());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_fields_fall_back_to_defaults() {
        let dir = scratch_dir("defaults");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"{ "database_path": "/tmp/kapua.sqlite" }"#,
        )
        .await
        .unwrap();

        let config = load_or_init(&dir).await.unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/kapua.sqlite"));
        assert_eq!(config.log_filter, "kapua_core=info");

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_config_is_an_error() {
        let dir = scratch_dir("malformed");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "not json").await.unwrap();

        let result = load_or_init(&dir).await;
        assert!(matches!(result, Err(ConfigError::Json(_))));

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
