//! Deduplication of the records captured for one band.
//!
//! Satellite captures overlap: every BS transponder carries the SI of the
//! whole network, so the same service shows up once per capture. Those are
//! collapsed by service ID. Terrestrial physical channels do not overlap and
//! are only sorted.

use std::collections::BTreeMap;

use chscan_types::{natural_cmp, Band, ChannelRecord};

/// Deduplicate (satellite only) and sort the records of one band.
///
/// The result is sorted by channel in natural order. Input order does not
/// matter beyond the tie-breaks documented on [`dedup_by_service_id`].
pub fn merge_channels(band: Band, channels: Vec<ChannelRecord>) -> Vec<ChannelRecord> {
    let mut channels = if band.merges_by_service_id() {
        dedup_by_service_id(channels)
    } else {
        channels
    };
    sort_by_channel(&mut channels);
    channels
}

/// Keep exactly one record per service ID.
///
/// Within a group the first record with a non-empty name wins, otherwise the
/// first record. "First" is arrival order, which is completion order of the
/// captures; the choice between two named records is arbitrary.
pub fn dedup_by_service_id(channels: Vec<ChannelRecord>) -> Vec<ChannelRecord> {
    let mut groups: BTreeMap<u16, Vec<ChannelRecord>> = BTreeMap::new();
    for ch in channels {
        groups.entry(ch.service_id).or_default().push(ch);
    }

    groups
        .into_values()
        .map(|mut group| {
            let pick = group.iter().position(ChannelRecord::has_name).unwrap_or(0);
            group.swap_remove(pick)
        })
        .collect()
}

/// Stable natural-order sort on the channel string.
pub fn sort_by_channel(channels: &mut [ChannelRecord]) {
    channels.sort_by(|a, b| natural_cmp(&a.channel, &b.channel));
}
