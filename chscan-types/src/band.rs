//! Broadcast band catalog.
//!
//! The band set is closed: digital terrestrial (`GR`), BS satellite (`BS`)
//! and 110-degree CS satellite (`CS`). Each band knows how to turn a raw
//! channel index into the string the recorder expects and into the mode
//! flag handed to the EPG dumper.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Broadcast band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// Digital terrestrial television (地上波デジタル)
    #[serde(rename = "GR")]
    Terrestrial,
    /// BS satellite (BS衛星)
    #[serde(rename = "BS")]
    Bs,
    /// 110度CS satellite
    #[serde(rename = "CS")]
    Cs,
}

impl Band {
    /// All bands, in catalog order.
    pub const ALL: [Band; 3] = [Band::Terrestrial, Band::Bs, Band::Cs];

    /// Short name used in channel lists (`GR`, `BS`, `CS`).
    pub fn name(&self) -> &'static str {
        match self {
            Band::Terrestrial => "GR",
            Band::Bs => "BS",
            Band::Cs => "CS",
        }
    }

    /// Channel string passed to the recorder for a channel index.
    ///
    /// - GR: the plain channel number (`27`)
    /// - BS: `BS<ch>_0`, the first TS of the transponder
    /// - CS: `CS<ch>`
    pub fn recorder_channel(&self, ch: u32) -> String {
        match self {
            Band::Terrestrial => ch.to_string(),
            Band::Bs => format!("{}{}_0", self.name(), ch),
            Band::Cs => format!("{}{}", self.name(), ch),
        }
    }

    /// Fixed epgdump mode flag, if the band has one.
    pub fn fixed_epg_mode(&self) -> Option<&'static str> {
        match self {
            Band::Terrestrial => None,
            Band::Bs => Some("/BS"),
            Band::Cs => Some("/CS"),
        }
    }

    /// epgdump mode flag for a channel index.
    ///
    /// Terrestrial has no fixed flag, so the channel number itself is used.
    pub fn epg_mode(&self, ch: u32) -> String {
        match self.fixed_epg_mode() {
            Some(mode) => mode.to_string(),
            None => ch.to_string(),
        }
    }

    /// Channels scanned when no range is configured.
    ///
    /// One BS/CS transponder already carries the SI of the whole network.
    pub fn default_channels(&self) -> Vec<u32> {
        match self {
            Band::Terrestrial => (13..=52).collect(),
            Band::Bs => vec![1],
            Band::Cs => vec![2],
        }
    }

    /// Whether records of this band are collapsed by service ID.
    ///
    /// Terrestrial physical channels are unique already, so only sorting
    /// applies there.
    pub fn merges_by_service_id(&self) -> bool {
        !matches!(self, Band::Terrestrial)
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A band together with the channel indices to scan on it.
///
/// Built once at startup; immutable for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelType {
    pub band: Band,
    pub channels: Vec<u32>,
}

impl ChannelType {
    pub fn new(band: Band, channels: Vec<u32>) -> Self {
        Self { band, channels }
    }

    /// Channel type scanning the band's default channels.
    pub fn with_default_channels(band: Band) -> Self {
        Self::new(band, band.default_channels())
    }

    pub fn name(&self) -> &'static str {
        self.band.name()
    }
}
