//! Device enumeration across the three supported platform families.
//!
//! Each family shells out to its native disk lister and normalizes the text
//! output into `DeviceRecord`s. The parsers are pure functions over captured
//! output so they can be exercised from fixtures without real hardware.

mod darwin;
mod freebsd;
mod linux;

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{ErrorInfo, ErrorKind};
use crate::pipeline::Phase;
use crate::process;

/// Label used when a lister does not report a size or description.
pub const FALLBACK_LABEL: &str = "Unknown";

/// Normalized description of one candidate target device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    /// Platform-native device name ("sda", "ada0", "disk2").
    pub identifier: String,
    /// Human-readable capacity, "Unknown" when the lister does not report one.
    pub size: String,
    /// Free-form vendor/model text, empty when the lister does not report one.
    pub description: String,
}

impl DeviceRecord {
    /// Absolute device node path for this record.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!("/dev/{}", self.identifier))
    }
}

/// Enumerate candidate target devices on the host platform.
///
/// Read-only and idempotent; records come back in native tool order.
pub fn list_devices() -> Result<Vec<DeviceRecord>, ErrorInfo> {
    list_devices_for(std::env::consts::OS)
}

/// Enumerate devices for an explicit platform family.
///
/// Split from [`list_devices`] so the dispatch is testable; callers normally
/// want the host-platform variant.
pub fn list_devices_for(os: &str) -> Result<Vec<DeviceRecord>, ErrorInfo> {
    match os {
        "linux" => Ok(linux::parse(&capture(
            "lsblk",
            &["-nd", "-o", "NAME,SIZE,TYPE"],
        )?)),
        "freebsd" | "dragonfly" => Ok(freebsd::parse(&capture("geom", &["disk", "list"])?)),
        "macos" => Ok(darwin::parse(&capture("diskutil", &["list"])?)),
        other => Err(ErrorInfo::new(
            ErrorKind::UnsupportedPlatform,
            Phase::Idle,
            format!("no device listing support for '{other}'"),
        )),
    }
}

/// True when [`list_devices_for`] knows how to enumerate on `os`.
pub fn supported_platform(os: &str) -> bool {
    matches!(os, "linux" | "freebsd" | "dragonfly" | "macos")
}

/// Run a listing tool and return its stdout; non-zero exit or a missing
/// binary surfaces with the tool's stderr attached.
fn capture(tool: &str, args: &[&str]) -> Result<String, ErrorInfo> {
    let result = process::run(tool, args.iter().copied())
        .map_err(|e| ErrorInfo::new(ErrorKind::ToolExecution, Phase::Idle, format!("{e:#}")))?;
    Ok(result.stdout)
}
