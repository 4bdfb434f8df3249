//! Object store configuration / 对象存储配置
//!
//! Credentials, region and bucket for the single remote bucket the store talks to.
//! The endpoint is fixed and never read from configuration / 端点固定，不可配置

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Fixed S3-compatible endpoint / 固定的S3兼容端点
pub const DEFAULT_ENDPOINT: &str = "https://s3.velta.dev";

pub const ENV_ACCESS_KEY_ID: &str = "STORAGE_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "STORAGE_SECRET_ACCESS_KEY";
pub const ENV_REGION: &str = "STORAGE_REGION";
pub const ENV_BUCKET: &str = "STORAGE_BUCKET";

/// Configuration loading errors / 配置加载错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),
}

/// Object store configuration / 对象存储配置
#[derive(Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    /// Access Key ID
    pub access_key_id: String,
    /// Secret Access Key
    pub secret_access_key: String,
    /// 区域
    #[serde(default = "default_region")]
    pub region: String,
    /// 存储桶名称
    pub bucket: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

// Secret stays out of logs / 日志中隐藏密钥
impl fmt::Debug for ObjectStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl ObjectStoreConfig {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            bucket: bucket.into(),
        }
    }

    /// Endpoint the client is bound to / 客户端绑定的端点
    pub fn endpoint(&self) -> &'static str {
        DEFAULT_ENDPOINT
    }

    /// Load configuration from a JSON file / 从JSON文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Loaded storage configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from process environment / 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup function / 通过查找函数加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingVar(name));

        Ok(Self {
            access_key_id: required(ENV_ACCESS_KEY_ID)?,
            secret_access_key: required(ENV_SECRET_ACCESS_KEY)?,
            region: lookup(ENV_REGION)
                .filter(|r| !r.is_empty())
                .unwrap_or_else(default_region),
            bucket: required(ENV_BUCKET)?,
        })
    }
}
