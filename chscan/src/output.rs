//! Channel list output.
//!
//! The list is written as a YAML sequence of mappings:
//!
//! ```yaml
//! - type: BS
//!   name: ＮＨＫ　ＢＳ
//!   channel: BS15_0
//!   serviceId: 101
//!   isDisabled: false
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chscan_types::ChannelRecord;

use crate::error::OutputError;

/// Serialize the channel list as YAML into `writer`.
pub fn write_channels<W: Write>(channels: &[ChannelRecord], mut writer: W) -> Result<(), OutputError> {
    serde_yml::to_writer(&mut writer, channels)?;
    writer.flush()?;
    Ok(())
}

/// Write the channel list to `path`, or to stdout when no path is given.
pub fn emit_channels(channels: &[ChannelRecord], path: Option<&Path>) -> Result<(), OutputError> {
    match path {
        Some(path) => write_channels(channels, BufWriter::new(File::create(path)?)),
        None => write_channels(channels, io::stdout().lock()),
    }
}
