//! Channel range grammar.
//!
//! A range is a comma separated list of channel numbers and inclusive
//! `start-end` spans: `"13-52"`, `"1"`, `"13-27,30,32-34"`.

use crate::error::RangeError;

/// Parse a channel range into the ordered list of channel indices.
pub fn parse_channel_range(range: &str) -> Result<Vec<u32>, RangeError> {
    let mut channels = Vec::new();

    for part in range.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_channel(start)?;
                let end = parse_channel(end)?;
                if end < start {
                    return Err(RangeError::Reversed { start, end });
                }
                channels.extend(start..=end);
            }
            None => channels.push(parse_channel(part)?),
        }
    }

    if channels.is_empty() {
        return Err(RangeError::Empty);
    }
    Ok(channels)
}

fn parse_channel(s: &str) -> Result<u32, RangeError> {
    let s = s.trim();
    s.parse()
        .map_err(|_| RangeError::InvalidNumber(s.to_string()))
}
