//! In-memory driver / 内存驱动
//!
//! Keeps objects in a sorted map and mimics S3 semantics closely enough to
//! exercise the object store without a network: deleting a missing key
//! succeeds, copying a missing key fails, presign expiry is bounded.
//! Failures can be injected per operation and key.

mod driver;

pub use driver::{MemoryDriver, MemoryError, Operation};
