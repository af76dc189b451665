//! The install pipeline: unmount → wipe → download → write.
//!
//! Each invocation runs on one dedicated worker thread and reports back only
//! through the event stream. Every phase after `Idle` performs a real
//! destructive or network operation; transitions are strictly forward-only
//! and nothing is retried except the bounded download retry.

mod events;
mod steps;

pub use events::{EventSink, PipelineEvent};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::device::DeviceRecord;
use crate::download::{Fetcher, HttpFetcher};
use crate::error::{ErrorInfo, ErrorKind};
use crate::variant::DesktopVariant;

/// Total download attempts (one initial try plus two automatic retries).
pub const DOWNLOAD_ATTEMPTS: u32 = 3;

/// Fixed delay between download attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Named step of the install state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    Unmounting,
    Wiping,
    Downloading,
    Writing,
    Complete,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Unmounting => "unmounting",
            Phase::Wiping => "wiping",
            Phase::Downloading => "downloading",
            Phase::Writing => "writing",
            Phase::Complete => "complete",
            Phase::Failed => "failed",
        })
    }
}

/// State a single confirmed install advances through.
#[derive(Debug, Clone)]
pub struct InstallSession {
    pub variant: DesktopVariant,
    pub device: DeviceRecord,
    pub phase: Phase,
    pub last_error: Option<ErrorInfo>,
}

impl InstallSession {
    /// Build a session from the operator's selections.
    ///
    /// Both selections must be present before anything destructive may
    /// start; a missing one is a precondition violation and the state
    /// machine is never entered.
    pub fn new(
        variant: Option<DesktopVariant>,
        device: Option<DeviceRecord>,
    ) -> Result<Self, ErrorInfo> {
        match (variant, device) {
            (Some(variant), Some(device)) => Ok(Self {
                variant,
                device,
                phase: Phase::Idle,
                last_error: None,
            }),
            (None, _) => Err(ErrorInfo::new(
                ErrorKind::InvalidSelection,
                Phase::Idle,
                "no desktop variant selected",
            )),
            (_, None) => Err(ErrorInfo::new(
                ErrorKind::InvalidSelection,
                Phase::Idle,
                "no target device selected",
            )),
        }
    }
}

/// Drives install sessions; at most one may be in flight at a time.
pub struct InstallPipeline {
    config: Config,
    fetcher: Arc<dyn Fetcher>,
    active: Arc<AtomicBool>,
}

impl InstallPipeline {
    pub fn new(config: Config) -> Self {
        Self::with_fetcher(config, Arc::new(HttpFetcher))
    }

    /// Construct with an explicit fetcher. Used by tests to script the
    /// download phase.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the pipeline for `session` on a dedicated worker thread.
    ///
    /// Rejected while another session is in flight; the state machine is
    /// never entered for a rejected start. The returned handle yields the
    /// finished session with its terminal phase.
    pub fn start(
        &self,
        session: InstallSession,
        events: EventSink,
    ) -> Result<JoinHandle<InstallSession>, ErrorInfo> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(ErrorInfo::new(
                ErrorKind::InvalidSelection,
                Phase::Idle,
                "an installation is already in progress",
            ));
        }

        let config = self.config.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let active = Arc::clone(&self.active);
        let handle = thread::spawn(move || {
            let finished = run(session, &config, fetcher.as_ref(), &events);
            active.store(false, Ordering::SeqCst);
            finished
        });
        Ok(handle)
    }
}

/// Worker body. Advances the session phase by phase and returns it in a
/// terminal state.
fn run(
    mut session: InstallSession,
    config: &Config,
    fetcher: &dyn Fetcher,
    events: &EventSink,
) -> InstallSession {
    let device_path = session.device.path();
    let staging = session.variant.staging_path(config);

    session.phase = Phase::Unmounting;
    events.phase(Phase::Unmounting);
    events.status(format!("Unmounting {}...", device_path.display()));
    if let Err(e) = steps::unmount(&device_path) {
        return fail(session, events, ErrorKind::Unmount, &e);
    }
    tracing::info!(device = %device_path.display(), "unmounted");

    session.phase = Phase::Wiping;
    events.phase(Phase::Wiping);
    events.status(format!("Wiping {}...", device_path.display()));
    if let Err(e) = steps::wipe(&device_path) {
        return fail(session, events, ErrorKind::Wipe, &e);
    }
    tracing::info!(device = %device_path.display(), "wiped first 1 MiB");

    session.phase = Phase::Downloading;
    events.phase(Phase::Downloading);
    events.status(format!("Downloading {} image...", session.variant));
    let url = session.variant.url(config).to_string();
    if let Err(e) = download_with_retry(fetcher, &url, &staging, events) {
        return fail(session, events, ErrorKind::Download, &e);
    }
    tracing::info!(url = url.as_str(), staging = %staging.display(), "image downloaded");

    session.phase = Phase::Writing;
    events.phase(Phase::Writing);
    events.status(format!("Writing image to {}...", device_path.display()));
    if let Err(e) = steps::write_image(&staging, &device_path) {
        return fail(session, events, ErrorKind::Write, &e);
    }
    tracing::info!(device = %device_path.display(), "image written");

    session.phase = Phase::Complete;
    events.phase(Phase::Complete);
    events.status(format!(
        "GhostBSD {} has been installed on {}.",
        session.variant, session.device.identifier
    ));
    session
}

/// Record the failure, move to the terminal phase, and emit the final
/// events: the phase change first, then the error — nothing after it.
fn fail(
    mut session: InstallSession,
    events: &EventSink,
    kind: ErrorKind,
    error: &anyhow::Error,
) -> InstallSession {
    let info = ErrorInfo::new(kind, session.phase, format!("{error:#}"));
    tracing::error!(%info, "install failed");
    session.phase = Phase::Failed;
    session.last_error = Some(info.clone());
    events.phase(Phase::Failed);
    events.error(info);
    session
}

/// Fetch with the bounded retry policy: up to [`DOWNLOAD_ATTEMPTS`] tries
/// with a fixed delay in between. Progress fractions are emitted only while
/// the total size is known and are kept non-decreasing across attempts.
fn download_with_retry(
    fetcher: &dyn Fetcher,
    url: &str,
    staging: &std::path::Path,
    events: &EventSink,
) -> Result<()> {
    let mut high_water = 0.0f64;
    let mut last_error = None;

    for attempt in 1..=DOWNLOAD_ATTEMPTS {
        if attempt > 1 {
            events.status(format!(
                "Download failed, retrying (attempt {attempt} of {DOWNLOAD_ATTEMPTS})..."
            ));
            thread::sleep(RETRY_DELAY);
        }

        let mut on_progress = |received: u64, total: Option<u64>| {
            if let Some(total) = total.filter(|t| *t > 0) {
                let fraction = (received as f64 / total as f64).min(1.0);
                if fraction >= high_water {
                    high_water = fraction;
                    events.progress(fraction);
                }
            }
        };

        match fetcher.fetch(url, staging, &mut on_progress) {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::warn!(attempt, "download attempt failed: {e:#}");
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| anyhow::anyhow!("download failed after {DOWNLOAD_ATTEMPTS} attempts")))
}
