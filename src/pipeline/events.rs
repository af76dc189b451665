//! Ordered event stream from the pipeline worker to the presentation thread.

use crossbeam_channel::Sender;

use super::Phase;
use crate::error::ErrorInfo;

/// One callback delivery. Events arrive in emission order (FIFO); nothing
/// follows [`PipelineEvent::Error`] for a session.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The externally observed phase changed.
    Phase(Phase),
    /// Download fraction in [0, 1]; only emitted while the total size is
    /// known, and never decreasing within a session.
    Progress(f64),
    /// Human-readable narration, e.g. "Downloading image...".
    Status(String),
    /// Terminal failure; the session is over.
    Error(ErrorInfo),
}

/// Sender half handed to the worker.
///
/// Send failures are swallowed: an operator that stopped listening must not
/// wedge a destructive run mid-phase.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<PipelineEvent>,
}

impl EventSink {
    pub fn new(tx: Sender<PipelineEvent>) -> Self {
        Self { tx }
    }

    pub fn phase(&self, phase: Phase) {
        let _ = self.tx.send(PipelineEvent::Phase(phase));
    }

    pub fn progress(&self, fraction: f64) {
        let _ = self.tx.send(PipelineEvent::Progress(fraction));
    }

    pub fn status(&self, text: impl Into<String>) {
        let _ = self.tx.send(PipelineEvent::Status(text.into()));
    }

    pub fn error(&self, info: ErrorInfo) {
        let _ = self.tx.send(PipelineEvent::Error(info));
    }
}
