//! Run configuration.
//!
//! Settings come from three places, in order of precedence: the command
//! line, an optional TOML file and the built-in defaults. They are resolved
//! once into a [`ScanConfig`] which is handed to the orchestrator.

use std::path::{Path, PathBuf};

use chscan_types::{parse_channel_range, Band, ChannelType};
use serde::Deserialize;

use crate::context::Cli;
use crate::error::ConfigError;
use crate::scheduler::DEFAULT_BATCH_SIZE;

pub const DEFAULT_RECPT1: &str = "/usr/local/bin/recpt1";
pub const DEFAULT_EPGDUMP: &str = "/usr/local/bin/epgdump";
pub const DEFAULT_SECONDS: u32 = 30;
pub const DEFAULT_TUNERS: usize = 4;
pub const DEFAULT_CONFIG_FILE: &str = "chscan.toml";
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

/// Configuration file format.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub tools: ToolsSection,
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub channels: ChannelsSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolsSection {
    pub recpt1: Option<PathBuf>,
    pub epgdump: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    pub seconds: Option<u32>,
    pub tuners: Option<usize>,
    pub batch_size: Option<usize>,
}

/// Channel ranges per band, e.g. `gr = "13-27,30"`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChannelsSection {
    pub gr: Option<String>,
    pub bs: Option<String>,
    pub cs: Option<String>,
}

impl ChannelsSection {
    fn range_for(&self, band: Band) -> Option<&str> {
        match band {
            Band::Terrestrial => self.gr.as_deref(),
            Band::Bs => self.bs.as_deref(),
            Band::Cs => self.cs.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub retention_days: Option<u64>,
}

impl ConfigFile {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit file if given, else `chscan.toml` in the working
    /// directory if it exists, else the empty configuration.
    ///
    /// Returns the path that was loaded along with the configuration.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = explicit.map(Path::to_path_buf).or_else(|| {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(default_path)
            } else {
                None
            }
        });

        match path {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Path to the recorder binary.
    pub recpt1: PathBuf,
    /// Path to the epgdump binary.
    pub epgdump: PathBuf,
    /// Capture duration per channel (seconds).
    pub seconds: u32,
    /// Number of tuners, i.e. concurrent captures.
    pub tuners: usize,
    /// Tasks queued ahead per tuner.
    pub batch_size: usize,
    /// Channel types to scan, in request order.
    pub channel_types: Vec<ChannelType>,
}

impl ScanConfig {
    /// Configuration with default tools and timings for the given channel
    /// types.
    pub fn new(channel_types: Vec<ChannelType>) -> Self {
        Self {
            recpt1: PathBuf::from(DEFAULT_RECPT1),
            epgdump: PathBuf::from(DEFAULT_EPGDUMP),
            seconds: DEFAULT_SECONDS,
            tuners: DEFAULT_TUNERS,
            batch_size: DEFAULT_BATCH_SIZE,
            channel_types,
        }
    }

    /// Merge command line and file settings (command line takes precedence).
    pub fn resolve(cli: &Cli, bands: &[Band], file: &ConfigFile) -> Result<Self, ConfigError> {
        if bands.is_empty() {
            return Err(ConfigError::NoBandSelected);
        }

        let channel_types = bands
            .iter()
            .map(|&band| {
                let range = cli.channel_range(band).or(file.channels.range_for(band));
                match range {
                    Some(range) => parse_channel_range(range)
                        .map(|channels| ChannelType::new(band, channels))
                        .map_err(|source| ConfigError::InvalidRange { band, source }),
                    None => Ok(ChannelType::with_default_channels(band)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tuners = cli.tuners.or(file.scan.tuners).unwrap_or(DEFAULT_TUNERS);
        if tuners == 0 {
            return Err(ConfigError::NoTuners);
        }

        let defaults = Self::new(channel_types);
        Ok(Self {
            recpt1: cli
                .recpt1
                .clone()
                .or_else(|| file.tools.recpt1.clone())
                .unwrap_or(defaults.recpt1),
            epgdump: cli
                .epgdump
                .clone()
                .or_else(|| file.tools.epgdump.clone())
                .unwrap_or(defaults.epgdump),
            seconds: cli.seconds.or(file.scan.seconds).unwrap_or(defaults.seconds),
            tuners,
            batch_size: file.scan.batch_size.unwrap_or(defaults.batch_size).max(1),
            channel_types: defaults.channel_types,
        })
    }
}
