use std::path::PathBuf;

use chscan_types::Band;
use clap::parser::ValueSource;
use clap::{ArgMatches, Parser};

#[derive(Debug, Parser)]
#[clap(name = "chscan")]
#[clap(about = "chscan records each channel for a few seconds, dumps its EPG and prints a deduplicated channel list as YAML.", long_about = None)]
#[clap(author = "maleicacid")]
#[clap(version)]
#[clap(args_override_self = true)]
pub struct Cli {
    /// Receive GR channels (13..52 unless --gr-channels is given).
    #[clap(short = 'g', long)]
    pub gr: bool,

    /// Receive BS channels (BS1 unless --bs-channels is given).
    #[clap(short = 'b', long)]
    pub bs: bool,

    /// Receive CS channels (CS2 unless --cs-channels is given).
    #[clap(short = 'c', long)]
    pub cs: bool,

    /// Seconds to record per channel [default: 30].
    #[clap(short, long, value_name = "SECONDS")]
    pub seconds: Option<u32>,

    /// Number of tuners for each band, i.e. concurrent recordings [default: 4].
    #[clap(short, long, value_name = "N")]
    pub tuners: Option<usize>,

    /// Path to recpt1 [default: /usr/local/bin/recpt1].
    #[clap(long, value_name = "PATH")]
    pub recpt1: Option<PathBuf>,

    /// Path to epgdump [default: /usr/local/bin/epgdump].
    #[clap(long, value_name = "PATH")]
    pub epgdump: Option<PathBuf>,

    /// GR channels to scan, e.g. "13-52" or "20,22,27-28".
    #[clap(long, value_name = "RANGE")]
    pub gr_channels: Option<String>,

    /// BS channels to scan, e.g. "1" or "1-23".
    #[clap(long, value_name = "RANGE")]
    pub bs_channels: Option<String>,

    /// CS channels to scan, e.g. "2" or "2,4".
    #[clap(long, value_name = "RANGE")]
    pub cs_channels: Option<String>,

    /// Write the channel list to a file instead of stdout.
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file path [default: ./chscan.toml if present].
    #[clap(short = 'f', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging.
    #[clap(short, long)]
    pub verbose: bool,

    /// Directory for rotated log files. Logs go to stderr only if unset.
    #[clap(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Channel range given on the command line for a band.
    pub fn channel_range(&self, band: Band) -> Option<&str> {
        match band {
            Band::Terrestrial => self.gr_channels.as_deref(),
            Band::Bs => self.bs_channels.as_deref(),
            Band::Cs => self.cs_channels.as_deref(),
        }
    }
}

/// Argument id of a band's selection flag.
fn band_flag(band: Band) -> &'static str {
    match band {
        Band::Terrestrial => "gr",
        Band::Bs => "bs",
        Band::Cs => "cs",
    }
}

/// Bands selected on the command line, in the order they were requested.
///
/// A flag given more than once is placed by its last occurrence, so
/// `-b -c -b` scans CS before BS.
pub fn requested_bands(matches: &ArgMatches) -> Vec<Band> {
    let mut bands: Vec<(usize, Band)> = Band::ALL
        .into_iter()
        .filter(|&band| matches.value_source(band_flag(band)) == Some(ValueSource::CommandLine))
        .map(|band| (matches.index_of(band_flag(band)).unwrap_or(usize::MAX), band))
        .collect();
    bands.sort_by_key(|(index, _)| *index);
    bands.into_iter().map(|(_, band)| band).collect()
}
