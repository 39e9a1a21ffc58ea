//! Task scheduling for channel scans.
//!
//! This module provides:
//! - [`WorkerPool`]: bounded fan-out of scan tasks over the available tuners

pub mod worker_pool;

pub use worker_pool::{WorkerPool, DEFAULT_BATCH_SIZE};
