//! Scan task and channel record types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::band::{Band, ChannelType};

/// One capture job: record a channel for a few seconds and dump its EPG.
///
/// Every field is resolved before dispatch so a task can be handed to any
/// worker as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    /// Band the channel belongs to.
    pub band: Band,
    /// Channel string passed to the recorder (`27`, `BS1_0`, `CS2`).
    pub recorder_channel: String,
    /// Mode flag passed to epgdump (`27`, `/BS`, `/CS`).
    pub epg_mode: String,
    /// Path to the recorder binary.
    pub recpt1: PathBuf,
    /// Path to the epgdump binary.
    pub epgdump: PathBuf,
    /// Capture duration in seconds.
    pub seconds: u32,
}

impl ScanTask {
    /// Build the task for one channel index of a channel type.
    pub fn new(
        channel_type: &ChannelType,
        ch: u32,
        recpt1: impl Into<PathBuf>,
        epgdump: impl Into<PathBuf>,
        seconds: u32,
    ) -> Self {
        let band = channel_type.band;
        Self {
            band,
            recorder_channel: band.recorder_channel(ch),
            epg_mode: band.epg_mode(ch),
            recpt1: recpt1.into(),
            epgdump: epgdump.into(),
            seconds,
        }
    }
}

/// A discovered broadcast service, as written to the channel list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    /// Band name (`GR`, `BS`, `CS`).
    #[serde(rename = "type")]
    pub band: Band,
    /// Service name. Some services are broadcast without one.
    pub name: Option<String>,
    /// On-air channel string (`27`, `BS15_0`, `CS4`).
    pub channel: String,
    /// Service ID.
    pub service_id: u16,
    /// Always false when scanned; reserved for hand curation.
    pub is_disabled: bool,
}

impl ChannelRecord {
    pub fn new(
        band: Band,
        name: Option<String>,
        channel: impl Into<String>,
        service_id: u16,
    ) -> Self {
        Self {
            band,
            name,
            channel: channel.into(),
            service_id,
            is_disabled: false,
        }
    }

    /// True if the service carries a name that is not blank.
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}
