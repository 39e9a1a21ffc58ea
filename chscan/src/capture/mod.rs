//! Channel capture: run the recorder and epgdump for one scan task and
//! turn the dumped EPG into channel records.
//!
//! - [`capture_channels`]: the recorder | epgdump pipeline
//! - [`epg_xml`]: the streaming XMLTV reader

pub mod epg_xml;
pub mod pipeline;

pub use epg_xml::EpgChannel;
pub use pipeline::capture_channels;
