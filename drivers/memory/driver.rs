use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use tokio::io::AsyncReadExt;

use crate::storage::{ByteStream, ObjectDriver};

/// Longest presign expiry S3 accepts (7 days) / S3允许的最长签名有效期
const MAX_PRESIGN_EXPIRY_SECS: u32 = 604_800;

/// Driver operation kind / 驱动操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Put,
    Presign,
    Delete,
    Copy,
    List,
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("NoSuchKey: {0}")]
    NoSuchKey(String),
    #[error("Presign expiry {0}s out of range 1..=604800")]
    InvalidExpiry(u32),
    #[error("Injected {op:?} failure for {key}")]
    Injected { op: Operation, key: String },
}

struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// 内存驱动
pub struct MemoryDriver {
    bucket: String,
    objects: RwLock<BTreeMap<String, StoredObject>>,
    failures: Mutex<HashSet<(Operation, String)>>,
    calls: Mutex<Vec<(Operation, String)>>,
}

impl MemoryDriver {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(BTreeMap::new()),
            failures: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every `op` on `key` fail / 为指定操作注入失败
    ///
    /// Copy failures match the source key, list failures match `""`.
    pub fn fail_on(&self, op: Operation, key: &str) {
        self.failures.lock().insert((op, key.to_string()));
    }

    /// Operations seen so far, in call order / 已调用的操作
    pub fn calls(&self) -> Vec<(Operation, String)> {
        self.calls.lock().clone()
    }

    /// Stored content and content type / 读取对象内容与类型
    pub fn object(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects
            .read()
            .get(key)
            .map(|o| (o.data.clone(), o.content_type.clone()))
    }

    fn record(&self, op: Operation, key: &str) -> Result<()> {
        self.calls.lock().push((op, key.to_string()));
        if self.failures.lock().contains(&(op, key.to_string())) {
            return Err(MemoryError::Injected {
                op,
                key: key.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn insert(&self, key: &str, data: Bytes, content_type: &str) {
        self.objects.write().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
    }
}

#[async_trait]
impl ObjectDriver for MemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(&self, key: &str, mut data: ByteStream, content_type: &str) -> Result<()> {
        self.record(Operation::Put, key)?;
        let mut buf = Vec::new();
        data.read_to_end(&mut buf).await?;
        self.insert(key, Bytes::from(buf), content_type);
        Ok(())
    }

    async fn put_bytes(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        self.record(Operation::Put, key)?;
        self.insert(key, data, content_type);
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_secs: u32) -> Result<String> {
        self.record(Operation::Presign, key)?;
        if expires_secs == 0 || expires_secs > MAX_PRESIGN_EXPIRY_SECS {
            return Err(MemoryError::InvalidExpiry(expires_secs).into());
        }
        Ok(format!(
            "memory://{}/{}?X-Amz-Expires={}",
            self.bucket, key, expires_secs
        ))
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.record(Operation::Delete, key)?;
        // S3 treats deleting a missing key as success
        self.objects.write().remove(key);
        Ok(())
    }

    async fn copy_object(&self, src_key: &str, dst_key: &str) -> Result<()> {
        self.record(Operation::Copy, src_key)?;
        let mut objects = self.objects.write();
        let (data, content_type) = match objects.get(src_key) {
            Some(o) => (o.data.clone(), o.content_type.clone()),
            None => return Err(MemoryError::NoSuchKey(src_key.to_string()).into()),
        };
        objects.insert(dst_key.to_string(), StoredObject { data, content_type });
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        self.record(Operation::List, "")?;
        Ok(self.objects.read().keys().cloned().collect())
    }
}
