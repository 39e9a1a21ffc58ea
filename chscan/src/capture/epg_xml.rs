//! Streaming reader for epgdump's XMLTV output.
//!
//! epgdump writes one `<channel>` element per service it saw in the SI:
//!
//! ```xml
//! <tv generator-info-name="tsEPG2xml">
//!   <channel id="3001.ontvjapan.com" tp="BS15_0">
//!     <display-name lang="ja_JP">ＮＨＫ　ＢＳ</display-name>
//!     <transport_stream_id>16625</transport_stream_id>
//!     <original_network_id>4</original_network_id>
//!     <service_id>101</service_id>
//!   </channel>
//!   <programme ...>...</programme>
//! </tv>
//! ```
//!
//! Only the direct children of `<channel>` are kept, as tag/text pairs.

use std::collections::BTreeMap;

use chscan_types::{ChannelRecord, RecordError, ScanTask};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tokio::io::AsyncBufRead;

use crate::error::CaptureError;

const CHANNEL_TAG: &[u8] = b"channel";
const TP_ATTR: &[u8] = b"tp";
const DISPLAY_NAME_TAG: &str = "display-name";
const SERVICE_ID_TAG: &str = "service_id";

/// A `<channel>` element as read from epgdump, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpgChannel {
    /// Transponder the service is carried on (`tp` attribute).
    pub tp: Option<String>,
    /// Child element text, keyed by tag name.
    pub fields: BTreeMap<String, String>,
}

impl EpgChannel {
    pub fn field(&self, tag: &str) -> Option<&str> {
        self.fields.get(tag).map(String::as_str)
    }

    /// Display name as written by epgdump; an empty element counts as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.field(DISPLAY_NAME_TAG).filter(|name| !name.is_empty())
    }

    /// Turn the element into a channel record for the task that captured it.
    ///
    /// The record's channel is the `tp` attribute, falling back to the
    /// recorder channel of the task.
    pub fn to_record(&self, task: &ScanTask) -> Result<ChannelRecord, RecordError> {
        let channel = self
            .tp
            .clone()
            .unwrap_or_else(|| task.recorder_channel.clone());

        let raw_sid = match self.field(SERVICE_ID_TAG).map(str::trim) {
            Some(sid) if !sid.is_empty() => sid,
            _ => return Err(RecordError::MissingServiceId { channel }),
        };
        let service_id = raw_sid
            .parse::<u16>()
            .map_err(|_| RecordError::InvalidServiceId {
                channel: channel.clone(),
                value: raw_sid.to_string(),
            })?;

        Ok(ChannelRecord::new(
            task.band,
            self.display_name().map(str::to_string),
            channel,
            service_id,
        ))
    }
}

/// Read every `<channel>` element from an XMLTV stream.
///
/// The stream is consumed to EOF. An empty stream yields no channels.
pub async fn read_channels<R>(input: R) -> Result<Vec<EpgChannel>, CaptureError>
where
    R: AsyncBufRead + Unpin,
{
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut channels = Vec::new();

    // Element depth; `channel_depth` is the depth of the open <channel>.
    let mut depth = 0usize;
    let mut channel_depth: Option<usize> = None;
    let mut current = EpgChannel::default();
    let mut child: Option<(String, String)> = None;

    loop {
        match reader.read_event_into_async(&mut buf).await? {
            Event::Start(e) => {
                depth += 1;
                match channel_depth {
                    None if e.local_name().as_ref() == CHANNEL_TAG => {
                        channel_depth = Some(depth);
                        current = EpgChannel {
                            tp: read_tp(&e)?,
                            ..EpgChannel::default()
                        };
                    }
                    Some(d) if depth == d + 1 => {
                        child = Some((tag_name(&e), String::new()));
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match channel_depth {
                None if e.local_name().as_ref() == CHANNEL_TAG => {
                    channels.push(EpgChannel {
                        tp: read_tp(&e)?,
                        ..EpgChannel::default()
                    });
                }
                Some(d) if depth == d => {
                    current.fields.insert(tag_name(&e), String::new());
                }
                _ => {}
            },
            Event::Text(t) => {
                if let (Some(d), Some((_, text))) = (channel_depth, child.as_mut()) {
                    if depth == d + 1 {
                        text.push_str(&t.unescape()?);
                    }
                }
            }
            Event::CData(t) => {
                if let (Some(d), Some((_, text))) = (channel_depth, child.as_mut()) {
                    if depth == d + 1 {
                        text.push_str(&String::from_utf8_lossy(&t));
                    }
                }
            }
            Event::End(_) => {
                match channel_depth {
                    Some(d) if depth == d + 1 => {
                        if let Some((tag, text)) = child.take() {
                            current.fields.insert(tag, text);
                        }
                    }
                    Some(d) if depth == d => {
                        channels.push(std::mem::take(&mut current));
                        channel_depth = None;
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(channels)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn read_tp(e: &BytesStart<'_>) -> Result<Option<String>, CaptureError> {
    let attr = e
        .try_get_attribute(TP_ATTR)
        .map_err(quick_xml::Error::from)?;
    match attr {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chscan_types::{Band, ChannelType};

    const BS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE tv SYSTEM "xmltv.dtd">
<tv generator-info-name="tsEPG2xml">
  <channel id="3101.ontvjapan.com" tp="BS15_0">
    <display-name lang="ja_JP">NHK BS</display-name>
    <transport_stream_id>16625</transport_stream_id>
    <original_network_id>4</original_network_id>
    <service_id>101</service_id>
  </channel>
  <channel id="3141.ontvjapan.com" tp="BS1_0">
    <display-name lang="ja_JP">BS日テレ</display-name>
    <service_id>141</service_id>
  </channel>
  <programme start="20240101000000 +0900" stop="20240101010000 +0900" channel="3101.ontvjapan.com">
    <title lang="ja_JP">ニュース</title>
  </programme>
</tv>
"#;

    fn bs_task() -> ScanTask {
        ScanTask::new(&ChannelType::new(Band::Bs, vec![1]), 1, "recpt1", "epgdump", 30)
    }

    #[tokio::test]
    async fn test_read_channels() {
        let channels = read_channels(BS_XML.as_bytes()).await.unwrap();
        assert_eq!(channels.len(), 2);

        assert_eq!(channels[0].tp.as_deref(), Some("BS15_0"));
        assert_eq!(channels[0].display_name(), Some("NHK BS"));
        assert_eq!(channels[0].field("service_id"), Some("101"));
        assert_eq!(channels[0].field("original_network_id"), Some("4"));

        assert_eq!(channels[1].tp.as_deref(), Some("BS1_0"));
        assert_eq!(channels[1].display_name(), Some("BS日テレ"));
    }

    #[tokio::test]
    async fn test_programme_children_are_ignored() {
        let channels = read_channels(BS_XML.as_bytes()).await.unwrap();
        assert!(channels.iter().all(|c| c.field("title").is_none()));
    }

    #[tokio::test]
    async fn test_empty_inputs() {
        assert!(read_channels(&b""[..]).await.unwrap().is_empty());
        let xml = r#"<?xml version="1.0"?><tv generator-info-name="x"></tv>"#;
        assert!(read_channels(xml.as_bytes()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_xml() {
        let xml = r#"<tv><channel tp="BS1_0"><service_id>101</display-name></channel></tv>"#;
        assert!(read_channels(xml.as_bytes()).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_elements() {
        let xml = r#"<tv><channel tp="27"><display-name/><service_id>1024</service_id></channel><channel tp="28"/></tv>"#;
        let channels = read_channels(xml.as_bytes()).await.unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].field("display-name"), Some(""));
        assert_eq!(channels[0].display_name(), None);
        assert_eq!(channels[1].tp.as_deref(), Some("28"));
        assert!(channels[1].fields.is_empty());
    }

    #[tokio::test]
    async fn test_escaped_text() {
        let xml = r#"<tv><channel tp="CS4"><display-name>A&amp;B</display-name><service_id>55</service_id></channel></tv>"#;
        let channels = read_channels(xml.as_bytes()).await.unwrap();
        assert_eq!(channels[0].display_name(), Some("A&B"));
    }

    #[test]
    fn test_to_record() {
        let mut ch = EpgChannel {
            tp: Some("BS15_0".to_string()),
            ..EpgChannel::default()
        };
        ch.fields.insert("display-name".into(), "NHK BS".into());
        ch.fields.insert("service_id".into(), "101".into());

        let record = ch.to_record(&bs_task()).unwrap();
        assert_eq!(record, ChannelRecord::new(Band::Bs, Some("NHK BS".into()), "BS15_0", 101));
    }

    #[test]
    fn test_to_record_keeps_name_whitespace() {
        let mut ch = EpgChannel::default();
        ch.fields.insert("display-name".into(), " NHK BS ".into());
        ch.fields.insert("service_id".into(), "101".into());
        assert_eq!(ch.to_record(&bs_task()).unwrap().name.as_deref(), Some(" NHK BS "));

        ch.fields.insert("display-name".into(), "  ".into());
        let record = ch.to_record(&bs_task()).unwrap();
        assert_eq!(record.name.as_deref(), Some("  "));
        assert!(!record.has_name());
    }

    #[test]
    fn test_to_record_falls_back_to_recorder_channel() {
        let mut ch = EpgChannel::default();
        ch.fields.insert("service_id".into(), "101".into());
        let record = ch.to_record(&bs_task()).unwrap();
        assert_eq!(record.channel, "BS1_0");
        assert_eq!(record.name, None);
    }

    #[test]
    fn test_to_record_missing_service_id() {
        let mut ch = EpgChannel {
            tp: Some("BS15_0".to_string()),
            ..EpgChannel::default()
        };
        ch.fields.insert("display-name".into(), "NHK BS".into());
        assert_eq!(
            ch.to_record(&bs_task()),
            Err(RecordError::MissingServiceId { channel: "BS15_0".into() })
        );

        ch.fields.insert("service_id".into(), "  ".into());
        assert!(matches!(
            ch.to_record(&bs_task()),
            Err(RecordError::MissingServiceId { .. })
        ));
    }

    #[test]
    fn test_to_record_invalid_service_id() {
        let mut ch = EpgChannel::default();
        ch.fields.insert("service_id".into(), "0x65".into());
        assert_eq!(
            ch.to_record(&bs_task()),
            Err(RecordError::InvalidServiceId {
                channel: "BS1_0".into(),
                value: "0x65".into(),
            })
        );
    }
}
