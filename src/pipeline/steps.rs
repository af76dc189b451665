//! The destructive subprocess steps: unmount, wipe, write.

use anyhow::{bail, Result};
use std::path::Path;

use crate::process::Cmd;

/// Unmount the device.
///
/// stderr saying the device was never mounted counts as success; the
/// pipeline proceeds either way. Any other failure halts the run with the
/// device still untouched.
pub(super) fn unmount(device: &Path) -> Result<()> {
    let result = Cmd::new("umount").arg_path(device).allow_fail().run()?;
    if result.success() {
        return Ok(());
    }

    let stderr = result.stderr_trimmed().to_string();
    if already_unmounted(&stderr) {
        tracing::debug!(device = %device.display(), "not mounted, continuing");
        return Ok(());
    }

    if stderr.is_empty() {
        bail!("umount failed (exit code {})", result.code());
    }
    bail!("umount failed (exit code {}): {}", result.code(), stderr);
}

/// True when umount stderr indicates the device was already unmounted.
pub(super) fn already_unmounted(stderr: &str) -> bool {
    let lowered = stderr.to_lowercase();
    lowered.contains("not mounted") || lowered.contains("unknown filesystem")
}

/// Zero the first 1 MiB of the device, destroying any partition table or
/// filesystem signature. Data past that offset (including a GPT backup
/// header) is left in place.
pub(super) fn wipe(device: &Path) -> Result<()> {
    Cmd::new("dd")
        .arg("if=/dev/zero")
        .arg(format!("of={}", device.display()))
        .arg("bs=1M")
        .arg("count=1")
        .error_msg("wipe failed")
        .run()?;
    Ok(())
}

/// Stream the staged image onto the device in 4 MiB blocks.
pub(super) fn write_image(image: &Path, device: &Path) -> Result<()> {
    Cmd::new("dd")
        .arg(format!("if={}", image.display()))
        .arg(format!("of={}", device.display()))
        .arg("bs=4M")
        .error_msg("image write failed")
        .run()?;
    Ok(())
}
