//! Object store façade / 对象存储门面
//!
//! One driver, one bucket, six pass-through operations. Nothing is cached,
//! retried or validated here; remote errors reach the caller unchanged.

use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use tokio::io::AsyncRead;

use super::ObjectDriver;
use crate::config::ObjectStoreConfig;
use crate::drivers::s3::S3Driver;

/// Default presigned URL lifetime (seconds) / 默认签名URL有效期
pub const DEFAULT_SIGNED_URL_TTL_SECS: u32 = 3600;

/// Content type of folder marker objects / 目录占位对象类型
pub const FOLDER_CONTENT_TYPE: &str = "application/x-directory";

/// Object store bound to a single bucket / 绑定单个存储桶的对象存储
#[derive(Clone)]
pub struct ObjectStore {
    driver: Arc<dyn ObjectDriver>,
}

impl ObjectStore {
    /// Build a store over the S3 endpoint / 创建S3对象存储
    pub fn new(config: ObjectStoreConfig) -> Result<Self> {
        let driver = S3Driver::new(&config)?;
        tracing::info!(
            "Object store initialized: bucket={}, endpoint={}",
            config.bucket,
            config.endpoint()
        );
        Ok(Self::with_driver(Arc::new(driver)))
    }

    /// Build a store over an explicit driver / 使用指定驱动创建
    pub fn with_driver(driver: Arc<dyn ObjectDriver>) -> Self {
        Self { driver }
    }

    pub fn bucket(&self) -> &str {
        self.driver.bucket()
    }

    /// Upload a stream to `key`, returns the key / 上传对象
    pub async fn upload<R>(&self, key: &str, data: R, content_type: &str) -> Result<String>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tracing::debug!("{} upload: key={}, content_type={}", self.driver.name(), key, content_type);
        self.driver.put_object(key, Box::new(data), content_type).await?;
        Ok(key.to_string())
    }

    /// Upload an in-memory buffer to `key` / 上传内存数据
    pub async fn upload_bytes(
        &self,
        key: &str,
        data: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<String> {
        let data = data.into();
        tracing::debug!("{} upload: key={}, size={}", self.driver.name(), key, data.len());
        self.driver.put_bytes(key, data, content_type).await?;
        Ok(key.to_string())
    }

    /// Presigned GET URL valid for one hour / 生成一小时有效的签名URL
    pub async fn signed_url(&self, key: &str) -> Result<String> {
        self.signed_url_with_ttl(key, DEFAULT_SIGNED_URL_TTL_SECS).await
    }

    /// Presigned GET URL valid for `ttl_secs` / 生成签名URL
    pub async fn signed_url_with_ttl(&self, key: &str, ttl_secs: u32) -> Result<String> {
        tracing::debug!("{} presign: key={}, ttl={}s", self.driver.name(), key, ttl_secs);
        self.driver.presign_get(key, ttl_secs).await
    }

    /// Delete `key`, returns the key / 删除对象
    ///
    /// Whether deleting a missing key errors is up to the backend.
    pub async fn delete(&self, key: &str) -> Result<String> {
        tracing::debug!("{} delete: key={}", self.driver.name(), key);
        self.driver.delete_object(key).await?;
        Ok(key.to_string())
    }

    /// Keys present in the bucket / 列出对象键
    pub async fn list(&self) -> Result<Vec<String>> {
        let keys = self.driver.list_keys().await?;
        tracing::debug!("{} list: {} keys", self.driver.name(), keys.len());
        Ok(keys)
    }

    /// Rename by copy then delete, returns the new key / 重命名（复制后删除）
    ///
    /// Not atomic. A failed delete leaves both keys in the bucket and the
    /// error is returned as if the whole rename failed.
    pub async fn rename(&self, old_key: &str, new_key: &str) -> Result<String> {
        tracing::debug!("{} rename: old_key={}, new_key={}", self.driver.name(), old_key, new_key);

        self.driver.copy_object(old_key, new_key).await?;

        if let Err(e) = self.driver.delete_object(old_key).await {
            tracing::warn!(
                "Rename partially applied, both {} and {} exist: {}",
                old_key,
                new_key,
                e
            );
            return Err(e);
        }

        Ok(new_key.to_string())
    }

    /// Rename that removes the copy again when the source delete fails / 失败时回滚的重命名
    ///
    /// Still not atomic: if the revert also fails both keys remain.
    pub async fn rename_or_revert(&self, old_key: &str, new_key: &str) -> Result<String> {
        tracing::debug!("{} rename_or_revert: old_key={}, new_key={}", self.driver.name(), old_key, new_key);

        self.driver.copy_object(old_key, new_key).await?;

        if let Err(e) = self.driver.delete_object(old_key).await {
            match self.driver.delete_object(new_key).await {
                Ok(()) => tracing::debug!("Rename reverted, removed copy {}", new_key),
                Err(revert_err) => tracing::warn!(
                    "Rename revert failed, both {} and {} exist: {}",
                    old_key,
                    new_key,
                    revert_err
                ),
            }
            return Err(e);
        }

        Ok(new_key.to_string())
    }

    /// Create a zero-byte `path/` marker, returns the marker key / 创建目录占位对象
    pub async fn create_folder(&self, path: &str) -> Result<String> {
        let folder_key = format!("{}/", path);
        tracing::debug!("{} create_folder: key={}", self.driver.name(), folder_key);
        self.driver
            .put_bytes(&folder_key, Bytes::new(), FOLDER_CONTENT_TYPE)
            .await?;
        Ok(folder_key)
    }
}
