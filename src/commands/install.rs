//! Install command - the thin orchestrator in front of the pipeline.
//!
//! Confirms the two selections, spawns the pipeline on its worker thread,
//! and drains the event stream on this thread: status lines, a progress bar
//! for the download, and a closing line that tells the operator what state
//! the device was left in.

use anyhow::{anyhow, bail, Result};
use crossbeam_channel::unbounded;
use dialoguer::Confirm;
use indicatif::ProgressBar;

use crate::config::Config;
use crate::device;
use crate::error::ErrorInfo;
use crate::pipeline::{EventSink, InstallPipeline, InstallSession, Phase, PipelineEvent};
use crate::preflight;
use crate::variant::DesktopVariant;

/// Execute the install command.
pub fn cmd_install(
    config: &Config,
    desktop: DesktopVariant,
    device_id: &str,
    assume_yes: bool,
) -> Result<()> {
    let checks = preflight::run_checks();
    if !preflight::all_passed(&checks) {
        for check in checks.iter().filter(|c| !c.passed()) {
            eprintln!("  {}: {}", check.name, check.detail);
        }
        bail!("preflight failed; fix the issues above and re-run");
    }

    // Resolve the identifier against a fresh enumeration so a stale or
    // mistyped name never reaches the destructive steps.
    let records = device::list_devices()?;
    let Some(record) = records.into_iter().find(|r| r.identifier == device_id) else {
        bail!("'{device_id}' is not a listed device; run `gbmc devices` to see candidates");
    };

    println!("Desktop:  {desktop}");
    if record.description.is_empty() {
        println!("Device:   {} ({})", record.path().display(), record.size);
    } else {
        println!(
            "Device:   {} ({}, {})",
            record.path().display(),
            record.size,
            record.description
        );
    }
    println!("Image:    {}", desktop.url(config));

    if !assume_yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Erase {} and write the {desktop} image to it?",
                record.path().display()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    tracing::info!(desktop = %desktop, device = %record.identifier, "install confirmed");

    let session = InstallSession::new(Some(desktop), Some(record))?;
    let pipeline = InstallPipeline::new(config.clone());
    let (tx, rx) = unbounded();
    let worker = pipeline.start(session, EventSink::new(tx))?;

    let mut bar: Option<ProgressBar> = None;
    let mut failure: Option<ErrorInfo> = None;
    for event in rx {
        match event {
            PipelineEvent::Phase(phase) => {
                if phase != Phase::Downloading {
                    if let Some(bar) = bar.take() {
                        bar.finish_and_clear();
                    }
                }
            }
            PipelineEvent::Status(text) => println!("{text}"),
            PipelineEvent::Progress(fraction) => {
                let bar = bar.get_or_insert_with(|| ProgressBar::new(100));
                bar.set_position((fraction * 100.0).round() as u64);
            }
            PipelineEvent::Error(info) => failure = Some(info),
        }
    }

    let session = worker
        .join()
        .map_err(|_| anyhow!("install worker panicked"))?;
    tracing::info!(phase = %session.phase, "session finished");

    match failure {
        None => {
            println!("Installation complete!");
            Ok(())
        }
        Some(info) => {
            eprintln!("{info}");
            eprintln!("{}", device_state_note(info.phase));
            bail!("installation failed during {}", info.phase);
        }
    }
}

/// Tell the operator what state the failed run left the device in.
fn device_state_note(phase: Phase) -> &'static str {
    match phase {
        Phase::Unmounting => "The device was left untouched.",
        Phase::Wiping => "The device may be partially wiped and is no longer usable as-is.",
        Phase::Downloading => "The device was wiped but no image was written to it.",
        Phase::Writing => "The device was wiped and may be partially written.",
        _ => "",
    }
}
