pub mod config;
pub mod logging;
pub mod storage;

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use config::{ConfigError, ObjectStoreConfig, DEFAULT_ENDPOINT};
pub use storage::{ObjectDriver, ObjectStore, DEFAULT_SIGNED_URL_TTL_SECS};
