//! `recpt1 <ch> <secs> - | epgdump <mode> - -` pipeline.
//!
//! The recorder's stdout is handed straight to epgdump as its stdin. We
//! never read the TS ourselves; our copy of the pipe is released as soon as
//! epgdump has been spawned, so EOF and SIGPIPE travel between the two
//! children as they would in a shell pipeline.

use std::process::{ExitStatus, Stdio};

use chscan_types::{ChannelRecord, ScanTask};
use log::{debug, info, warn};
use tokio::io::BufReader;
use tokio::process::{Child, Command};

use super::epg_xml::{self, EpgChannel};
use crate::error::CaptureError;

/// Capture one channel and return the services found in its EPG.
///
/// Failures are not errors here: an unavailable tuner, a crashed tool or
/// broken XML all mean "no channels on this frequency". Records without a
/// usable service ID are dropped with a warning.
pub async fn capture_channels(task: ScanTask) -> Vec<ChannelRecord> {
    debug!(
        "EXEC: {} {} {} - | {} {} - -",
        task.recpt1.display(),
        task.recorder_channel,
        task.seconds,
        task.epgdump.display(),
        task.epg_mode
    );

    let channels = match run_pipeline(&task).await {
        Ok(channels) => channels,
        Err(e) => {
            warn!("[{}] {}: capture failed: {}", task.band, task.recorder_channel, e);
            return Vec::new();
        }
    };

    channels
        .iter()
        .filter_map(|ch| match ch.to_record(&task) {
            Ok(record) => {
                info!(
                    "[{}] {}: {} (sid {})",
                    record.band,
                    record.channel,
                    record.name.as_deref().unwrap_or("(unnamed)"),
                    record.service_id
                );
                Some(record)
            }
            Err(e) => {
                warn!("[{}] {}: dropping channel: {}", task.band, task.recorder_channel, e);
                None
            }
        })
        .collect()
}

/// Run both children and parse epgdump's output.
async fn run_pipeline(task: &ScanTask) -> Result<Vec<EpgChannel>, CaptureError> {
    let mut recorder = Command::new(&task.recpt1)
        .arg(&task.recorder_channel)
        .arg(task.seconds.to_string())
        .arg("-")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CaptureError::Spawn {
            program: task.recpt1.display().to_string(),
            source,
        })?;

    let mut dumper = match spawn_dumper(task, &mut recorder) {
        Ok(dumper) => dumper,
        Err(e) => {
            stop(&mut recorder, "recorder").await;
            return Err(e);
        }
    };

    let stdout = match dumper.stdout.take() {
        Some(stdout) => stdout,
        None => {
            stop(&mut dumper, "epgdump").await;
            stop(&mut recorder, "recorder").await;
            return Err(CaptureError::MissingPipe("epgdump stdout"));
        }
    };

    let parsed = epg_xml::read_channels(BufReader::new(stdout)).await;
    if parsed.is_err() {
        // Nobody drains epgdump's stdout any more.
        let _ = dumper.start_kill();
    }

    let dump_status = dumper.wait().await?;
    log_exit(task, "epgdump", dump_status);
    let rec_status = recorder.wait().await?;
    log_exit(task, "recorder", rec_status);

    parsed
}

/// Spawn epgdump reading from the recorder's stdout.
///
/// The `Command` owns our end of the pipe and is dropped before returning,
/// leaving the two children as the only holders.
fn spawn_dumper(task: &ScanTask, recorder: &mut Child) -> Result<Child, CaptureError> {
    let ts: Stdio = recorder
        .stdout
        .take()
        .ok_or(CaptureError::MissingPipe("recorder stdout"))?
        .try_into()?;

    let mut command = Command::new(&task.epgdump);
    command
        .arg(&task.epg_mode)
        .args(["-", "-"])
        .stdin(ts)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    let spawned = command.spawn();
    drop(command);

    spawned.map_err(|source| CaptureError::Spawn {
        program: task.epgdump.display().to_string(),
        source,
    })
}

async fn stop(child: &mut Child, what: &str) {
    if let Err(e) = child.kill().await {
        debug!("failed to stop {}: {}", what, e);
    }
}

fn log_exit(task: &ScanTask, what: &str, status: ExitStatus) {
    if !status.success() {
        debug!(
            "[{}] {}: {} exited with {}",
            task.band, task.recorder_channel, what, status
        );
    }
}
