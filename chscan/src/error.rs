//! Error types for chscan.

use std::io;
use std::path::PathBuf;

use chscan_types::{Band, RangeError};
use thiserror::Error;

/// Errors raised while running one recorder | epgdump pipeline.
///
/// These never leave the capture module: a failed capture is reported as
/// "no channels on this frequency".
#[derive(Error, Debug)]
pub enum CaptureError {
    /// A collaborator binary could not be started.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The child was started without the requested pipe.
    #[error("Missing {0} pipe")]
    MissingPipe(&'static str),

    /// I/O error while wiring, reading or waiting.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// epgdump produced XML that could not be parsed.
    #[error("Malformed EPG XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Startup configuration errors. All of them are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for our schema.
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No band was enabled for this run.
    #[error("No band selected")]
    NoBandSelected,

    /// The tuner count is zero.
    #[error("Tuner count must be at least 1")]
    NoTuners,

    /// A channel range for a band is invalid.
    #[error("Invalid channel range for {band}: {source}")]
    InvalidRange {
        band: Band,
        #[source]
        source: RangeError,
    },

    /// The logging system could not be set up.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Errors raised while writing the channel list.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write channel list: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize channel list: {0}")]
    Yaml(#[from] serde_yml::Error),
}
