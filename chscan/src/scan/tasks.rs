//! Expansion of a channel type into scan tasks.

use std::path::Path;

use chscan_types::{ChannelType, ScanTask};

/// One scan task per channel index of the channel type, in range order.
pub fn build_scan_tasks(
    channel_type: &ChannelType,
    recpt1: &Path,
    epgdump: &Path,
    seconds: u32,
) -> Vec<ScanTask> {
    channel_type
        .channels
        .iter()
        .map(|&ch| ScanTask::new(channel_type, ch, recpt1, epgdump, seconds))
        .collect()
}
