//! chscan library - ISDB channel list generation
//!
//! This library scans broadcast bands by recording each channel for a few
//! seconds with `recpt1`, decoding the SI with `epgdump`, and merging the
//! services found into a deduplicated channel list.

pub mod capture;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod scan;
pub mod scheduler;

// Re-export commonly used types
pub use chscan_types::{Band, ChannelRecord, ChannelType, ScanTask};
pub use config::{ConfigFile, ScanConfig};
pub use error::{CaptureError, ConfigError, OutputError};
pub use scan::Orchestrator;
pub use scheduler::WorkerPool;
