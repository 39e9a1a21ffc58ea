//! Channel, band and scan task definitions for chscan.
//!
//! This crate holds the plain data that flows through a channel scan:
//!
//! - [`Band`] / [`ChannelType`]: the closed catalog of broadcast bands and
//!   the physical channels to scan on each
//! - [`ScanTask`]: one fully resolved capture job
//! - [`ChannelRecord`]: one discovered service, in the shape written to the
//!   channel list
//! - [`natural`]: the natural-order comparator used to sort channel strings
//! - [`range`]: the channel range grammar (`"13-52"`, `"1,3,5-9"`)
//!
//! ```rust
//! use chscan_types::{Band, ChannelType};
//!
//! let bs = ChannelType::with_default_channels(Band::Bs);
//! assert_eq!(bs.channels, vec![1]);
//! assert_eq!(Band::Bs.recorder_channel(1), "BS1_0");
//! assert_eq!(Band::Terrestrial.epg_mode(27), "27");
//! ```

pub mod band;
pub mod error;
pub mod natural;
pub mod range;
pub mod types;

pub use band::{Band, ChannelType};
pub use error::{RangeError, RecordError};
pub use natural::{natural_cmp, NaturalKey};
pub use range::parse_channel_range;
pub use types::{ChannelRecord, ScanTask};
