//! Shared test utilities for gbmc tests.
//!
//! The destructive steps shell out to `umount` and `dd`, so the end-to-end
//! tests install fake tools in a tempdir placed first on PATH and point the
//! pipeline at a device identifier no real system has. Tests that build a
//! `TestEnv` must be `#[serial]` because PATH is process-global.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use tempfile::TempDir;

use gbmc::config::Config;
use gbmc::download::{Fetcher, ProgressFn};

/// Test environment: a staging directory and a bin directory of fake tools
/// placed first on PATH for the lifetime of the environment.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Directory holding the fake tools
    pub bin_dir: PathBuf,
    /// Staging directory the pipeline downloads into
    pub staging_dir: PathBuf,
    saved_path: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path();

        let bin_dir = base.join("bin");
        let staging_dir = base.join("staging");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");
        fs::create_dir_all(&staging_dir).expect("Failed to create staging dir");

        let saved_path = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH", format!("{}:{}", bin_dir.display(), saved_path));

        Self {
            _temp_dir: temp_dir,
            bin_dir,
            staging_dir,
            saved_path,
        }
    }

    /// Config pointing the pipeline at the temp staging dir. The URLs are
    /// never dereferenced; tests drive the download through a fetcher.
    pub fn config(&self) -> Config {
        Config {
            mate_url: "http://127.0.0.1:1/mate.iso".to_string(),
            xfce_url: "http://127.0.0.1:1/xfce.iso".to_string(),
            staging_dir: self.staging_dir.clone(),
            log_file: self.staging_dir.join("gbmc.log"),
        }
    }

    /// Install a fake tool script into the PATH-first bin dir.
    pub fn fake_tool(&self, name: &str, script: &str) {
        let path = self.bin_dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("Failed to write fake tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake tool");
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        std::env::set_var("PATH", &self.saved_path);
    }
}

/// Fetcher that fails a scripted number of times before succeeding, and
/// records every attempt.
pub struct ScriptedFetcher {
    /// Attempts that fail before one succeeds
    pub failures: u32,
    /// Content length reported to the progress callback
    pub total: Option<u64>,
    /// Bytes written to the staging file on success
    pub payload: Vec<u8>,
    /// Optional sleep at the start of every attempt
    pub delay: Option<Duration>,
    attempts: AtomicU32,
}

impl ScriptedFetcher {
    pub fn new(failures: u32, total: Option<u64>) -> Self {
        Self {
            failures,
            total,
            payload: b"ghostbsd image payload".to_vec(),
            delay: None,
            attempts: AtomicU32::new(0),
        }
    }

    /// Payload whose length matches a reported total.
    pub fn with_known_total(failures: u32) -> Self {
        let payload = b"ghostbsd image payload".to_vec();
        let total = Some(payload.len() as u64);
        let mut fetcher = Self::new(failures, total);
        fetcher.payload = payload;
        fetcher
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&self, _url: &str, dest: &Path, progress: ProgressFn) -> Result<()> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            bail!("connection reset by peer (attempt {attempt})");
        }

        fs::write(dest, &self.payload)?;
        let len = self.payload.len() as u64;
        progress(len / 2, self.total);
        progress(len, self.total);
        Ok(())
    }
}
