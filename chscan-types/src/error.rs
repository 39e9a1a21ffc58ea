//! Error types for channel definitions.

use thiserror::Error;

/// Errors raised while parsing a channel range such as `"13-52"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The range string contained no channels.
    #[error("Empty channel range")]
    Empty,

    /// A part of the range is not a channel number.
    #[error("Invalid channel number: {0:?}")]
    InvalidNumber(String),

    /// A range whose end is smaller than its start.
    #[error("Reversed channel range: {start}-{end}")]
    Reversed { start: u32, end: u32 },
}

/// Errors raised while turning an EPG `<channel>` element into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The element has no `service_id` child (or it is empty).
    #[error("Missing service_id for channel {channel}")]
    MissingServiceId { channel: String },

    /// The `service_id` text is not a 16-bit integer.
    #[error("Invalid service_id {value:?} for channel {channel}")]
    InvalidServiceId { channel: String, value: String },
}
