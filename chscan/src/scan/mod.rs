//! Channel scan orchestration.
//!
//! # How It Works
//!
//! 1. Each enabled channel type is expanded into scan tasks
//! 2. The tasks are fanned out over the tuner pool
//! 3. Once every task of the channel type is done, its records are merged
//! 4. The merged lists are concatenated in request order
//!
//! Channel types are scanned one after another; merging never overlaps with
//! capturing.

pub mod merge;
pub mod tasks;

use std::future::Future;

use chscan_types::{ChannelRecord, ScanTask};
use log::info;

use crate::capture::capture_channels;
use crate::config::ScanConfig;
use crate::error::ConfigError;
use crate::scheduler::WorkerPool;

pub use merge::merge_channels;
pub use tasks::build_scan_tasks;

/// Drives a full scan for a [`ScanConfig`].
pub struct Orchestrator {
    config: ScanConfig,
    pool: WorkerPool,
}

impl Orchestrator {
    pub fn new(config: ScanConfig) -> Self {
        let pool = WorkerPool::new(config.tuners, config.batch_size);
        Self { config, pool }
    }

    /// Scan every enabled channel type with the recorder and epgdump.
    pub async fn run(&self) -> Result<Vec<ChannelRecord>, ConfigError> {
        self.run_with(capture_channels).await
    }

    /// Scan every enabled channel type using `capture` for each task.
    pub async fn run_with<F, Fut>(&self, capture: F) -> Result<Vec<ChannelRecord>, ConfigError>
    where
        F: Fn(ScanTask) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Vec<ChannelRecord>> + Send + 'static,
    {
        if self.config.channel_types.is_empty() {
            return Err(ConfigError::NoBandSelected);
        }

        let mut all_channels = Vec::new();
        for channel_type in &self.config.channel_types {
            let tasks = build_scan_tasks(
                channel_type,
                &self.config.recpt1,
                &self.config.epgdump,
                self.config.seconds,
            );
            info!(
                "[{}] Scanning {} channel(s) with {} tuner(s), {}s each",
                channel_type.name(),
                tasks.len(),
                self.pool.workers(),
                self.config.seconds
            );

            let captured = self.pool.run(tasks, capture.clone()).await;
            let captured_count = captured.len();
            let merged = merge_channels(channel_type.band, captured);

            info!(
                "[{}] {} record(s) captured, {} after merge",
                channel_type.name(),
                captured_count,
                merged.len()
            );
            all_channels.extend(merged);
        }

        info!("Scan finished: {} channel(s)", all_channels.len());
        Ok(all_channels)
    }
}
