//! S3驱动核心实现
//!
//! - 每个操作对应一次远程调用，不重试
//! - 错误原样返回（S3Error），不附加上下文
//! - 预签名URL在本地计算，无需网络
//! - CopyObject 可能以200返回错误体，复制后用HEAD确认目标存在

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::Region;

use crate::config::{ObjectStoreConfig, DEFAULT_ENDPOINT};
use crate::storage::{ByteStream, ObjectDriver};

/// Copy verification failures / 复制校验失败
#[derive(Debug, thiserror::Error)]
pub enum S3DriverError {
    #[error("CopyObject to {key} returned status {status}")]
    CopyStatus { key: String, status: u16 },
    #[error("CopyObject reported success but HEAD {key} returned status {status}")]
    CopyNotVerified { key: String, status: u16 },
}

/// S3驱动
pub struct S3Driver {
    bucket: Box<Bucket>,
}

impl S3Driver {
    /// 创建新的S3驱动实例
    pub fn new(config: &ObjectStoreConfig) -> Result<Self> {
        let bucket = Self::create_bucket(config, DEFAULT_ENDPOINT)?;
        Ok(Self { bucket })
    }

    /// Driver bound to a local test endpoint / 绑定测试端点
    #[cfg(test)]
    pub(crate) fn with_endpoint(config: &ObjectStoreConfig, endpoint: &str) -> Result<Self> {
        let bucket = Self::create_bucket(config, endpoint)?;
        Ok(Self { bucket })
    }

    /// 创建S3 Bucket客户端（路径风格）
    fn create_bucket(config: &ObjectStoreConfig, endpoint: &str) -> Result<Box<Bucket>> {
        let credentials = Credentials::new(
            Some(&config.access_key_id),
            Some(&config.secret_access_key),
            None,
            None,
            None,
        )?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: endpoint.to_string(),
        };

        let bucket = Bucket::new(&config.bucket, region, credentials)?.with_path_style();

        Ok(bucket)
    }
}

#[async_trait]
impl ObjectDriver for S3Driver {
    fn name(&self) -> &str {
        "S3"
    }

    fn bucket(&self) -> &str {
        &self.bucket.name
    }

    async fn put_object(&self, key: &str, data: ByteStream, content_type: &str) -> Result<()> {
        let mut reader = data;
        self.bucket
            .put_object_stream_with_content_type(&mut reader, key, content_type)
            .await?;
        Ok(())
    }

    async fn put_bytes(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        self.bucket
            .put_object_with_content_type(key, &data, content_type)
            .await?;
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_secs: u32) -> Result<String> {
        let url = self.bucket.presign_get(key, expires_secs, None).await?;
        Ok(url)
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.bucket.delete_object(key).await?;
        Ok(())
    }

    async fn copy_object(&self, src_key: &str, dst_key: &str) -> Result<()> {
        // x-amz-copy-source 按百分号编码传递源键
        let copy_source = urlencoding::encode(src_key);
        tracing::debug!("S3 copy {} -> {} (source header {})", src_key, dst_key, copy_source);

        let status = self
            .bucket
            .copy_object_internal(&*copy_source, dst_key)
            .await?;
        if !(200..300).contains(&status) {
            return Err(S3DriverError::CopyStatus {
                key: dst_key.to_string(),
                status,
            }
            .into());
        }

        // 200响应体里也可能是<Error>，确认目标对象确实存在
        // 目标键原本已存在时无法由此区分
        let (_, head_status) = self.bucket.head_object(dst_key).await?;
        if head_status != 200 {
            return Err(S3DriverError::CopyNotVerified {
                key: dst_key.to_string(),
                status: head_status,
            }
            .into());
        }

        tracing::debug!("S3 copy to {} confirmed", dst_key);
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        // 无分隔符，跟随分页返回全部对象
        let results = self.bucket.list(String::new(), None).await?;

        Ok(results
            .into_iter()
            .flat_map(|page| page.contents.into_iter().map(|obj| obj.key))
            .collect())
    }
}
