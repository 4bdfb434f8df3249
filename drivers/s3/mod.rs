//! S3对象存储驱动
//!
//! 基于 rust-s3，固定端点，路径风格寻址

mod driver;
#[cfg(test)]
mod test_server;

pub use driver::{S3Driver, S3DriverError};
