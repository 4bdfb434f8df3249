use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;

/// Readable body stream for uploads / 上传数据流
pub type ByteStream = Box<dyn AsyncRead + Unpin + Send>;

/// Object driver interface (primitive bucket operations only) / 对象驱动接口
///
/// Errors are the remote client's own errors, returned without added context.
#[async_trait]
pub trait ObjectDriver: Send + Sync {
    /// Driver name / 驱动名称
    fn name(&self) -> &str;

    /// Bound bucket name / 绑定的存储桶
    fn bucket(&self) -> &str;

    /// Create or overwrite an object from a stream / 上传对象
    async fn put_object(&self, key: &str, data: ByteStream, content_type: &str) -> Result<()>;

    /// Put complete object data - 上传完整数据
    /// 默认实现包装为流，驱动可重写
    async fn put_bytes(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        self.put_object(key, Box::new(std::io::Cursor::new(data)), content_type)
            .await
    }

    /// Presigned GET URL / 预签名下载URL
    async fn presign_get(&self, key: &str, expires_secs: u32) -> Result<String>;

    /// Delete object / 删除对象
    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Server-side copy within the bucket / 服务端复制
    async fn copy_object(&self, src_key: &str, dst_key: &str) -> Result<()>;

    /// All keys in the bucket, in service order / 列出全部对象键
    async fn list_keys(&self) -> Result<Vec<String>>;
}

pub mod store;

pub use store::{ObjectStore, DEFAULT_SIGNED_URL_TTL_SECS, FOLDER_CONTENT_TYPE};
