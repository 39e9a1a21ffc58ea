//! End-to-end scans against stub recpt1/epgdump scripts.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use chscan::{output, Band, ChannelRecord, ChannelType, Orchestrator, ScanConfig};

const DUPLICATE_SID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tv generator-info-name="tsEPG2xml">
  <channel id="3101.ontvjapan.com" tp="BS1_0">
    <display-name lang="ja_JP"></display-name>
    <service_id>101</service_id>
  </channel>
  <channel id="3101.ontvjapan.com" tp="BS1_0">
    <display-name lang="ja_JP">TestCh</display-name>
    <service_id>101</service_id>
  </channel>
</tv>"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write stub tools; the recorder logs each channel it was asked for.
fn stub_tools(dir: &Path, xml: &str) -> (PathBuf, PathBuf) {
    let log = dir.join("recorded.txt");
    let recpt1 = write_script(
        dir,
        "recpt1",
        &format!("echo \"$1\" >> '{}'\nprintf 'TS'\n", log.display()),
    );
    let epgdump = write_script(
        dir,
        "epgdump",
        &format!("cat >/dev/null\ncat <<'EOF'\n{}\nEOF\n", xml),
    );
    (recpt1, epgdump)
}

fn bs_config(recpt1: PathBuf, epgdump: PathBuf) -> ScanConfig {
    ScanConfig {
        recpt1,
        epgdump,
        seconds: 1,
        tuners: 2,
        ..ScanConfig::new(vec![ChannelType::new(Band::Bs, vec![1])])
    }
}

#[tokio::test]
async fn test_bs_scan_merges_duplicate_service() {
    let dir = tempfile::tempdir().unwrap();
    let (recpt1, epgdump) = stub_tools(dir.path(), DUPLICATE_SID_XML);

    let channels = Orchestrator::new(bs_config(recpt1, epgdump)).run().await.unwrap();

    assert_eq!(
        channels,
        vec![ChannelRecord::new(Band::Bs, Some("TestCh".into()), "BS1_0", 101)]
    );
    assert!(!channels[0].is_disabled);

    let recorded = std::fs::read_to_string(dir.path().join("recorded.txt")).unwrap();
    assert_eq!(recorded, "BS1_0\n");

    let mut yaml = Vec::new();
    output::write_channels(&channels, &mut yaml).unwrap();
    let yaml = String::from_utf8(yaml).unwrap();
    assert!(yaml.contains("type: BS"));
    assert!(yaml.contains("name: TestCh"));
    assert!(yaml.contains("channel: BS1_0"));
    assert!(yaml.contains("serviceId: 101"));
    assert!(yaml.contains("isDisabled: false"));
}

#[tokio::test]
async fn test_terrestrial_scan_records_every_channel() {
    let dir = tempfile::tempdir().unwrap();
    let xml = r#"<tv><channel tp="27"><display-name>NHK</display-name><service_id>1024</service_id></channel></tv>"#;
    let (recpt1, epgdump) = stub_tools(dir.path(), xml);

    let config = ScanConfig {
        recpt1,
        epgdump,
        seconds: 1,
        tuners: 2,
        ..ScanConfig::new(vec![ChannelType::new(Band::Terrestrial, vec![26, 27, 28])])
    };
    let channels = Orchestrator::new(config).run().await.unwrap();

    // Same service on every capture, but terrestrial records are never merged
    assert_eq!(channels.len(), 3);
    assert!(channels.iter().all(|c| c.service_id == 1024 && c.channel == "27"));

    let mut recorded: Vec<String> = std::fs::read_to_string(dir.path().join("recorded.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    recorded.sort();
    assert_eq!(recorded, vec!["26", "27", "28"]);
}

#[test]
fn test_binary_without_band_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_chscan"))
        .current_dir(dir.path())
        .args(["-s", "1"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Nothing to do"));
    assert!(stderr.contains("Usage"));
}

#[test]
fn test_binary_writes_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let (recpt1, epgdump) = stub_tools(dir.path(), DUPLICATE_SID_XML);

    let out = Command::new(env!("CARGO_BIN_EXE_chscan"))
        .current_dir(dir.path())
        .arg("-b")
        .args(["-s", "1", "-t", "1"])
        .arg("--recpt1")
        .arg(&recpt1)
        .arg("--epgdump")
        .arg(&epgdump)
        .output()
        .unwrap();

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let parsed: Vec<ChannelRecord> = serde_yml::from_str(&String::from_utf8_lossy(&out.stdout)).unwrap();
    assert_eq!(
        parsed,
        vec![ChannelRecord::new(Band::Bs, Some("TestCh".into()), "BS1_0", 101)]
    );
}
