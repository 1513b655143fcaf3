//! The capture transaction.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Instant;

use playblast_common::error::{PlayblastError, PlayblastResult};
use playblast_host_core::{CaptureRequest, Host, ViewportCapture};
use playblast_job_model::JobConfiguration;

use crate::guard::RestoreGuard;
use crate::plan::ApplyPlan;

/// Where a transaction is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    /// A dialog is editing the job.
    Configuring,
    /// Render settings snapshotted, job being written.
    Applying,
    /// The host's capture command is running.
    Capturing,
    /// Putting the snapshot back.
    Restoring,
    /// Capture failed; restoration follows.
    Failed,
}

/// Behaviour switches for a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    /// Also put the scene's frame range back afterwards. Off by default: the
    /// job's range stays on the scene.
    pub restore_frame_range: bool,
}

/// Result of a completed capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Output path written into the render settings during the capture.
    pub output_path: PathBuf,

    /// Frames the host captured.
    pub frames: RangeInclusive<u32>,

    /// Files the host reported writing.
    pub output_files: Vec<PathBuf>,

    /// Start time (ISO 8601).
    pub started_at: String,

    /// Wall time spent in the transaction.
    pub elapsed_ms: u128,
}

/// Runs one job against a host with snapshot/restore bracketing.
#[derive(Debug)]
pub struct CaptureTransaction {
    options: TransactionOptions,
    state: TransactionState,
    history: Vec<TransactionState>,
}

impl CaptureTransaction {
    pub fn new(options: TransactionOptions) -> Self {
        Self {
            options,
            state: TransactionState::Idle,
            history: vec![TransactionState::Idle],
        }
    }

    /// Current state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Every state visited so far, in order.
    pub fn history(&self) -> &[TransactionState] {
        &self.history
    }

    pub(crate) fn enter(&mut self, next: TransactionState) {
        tracing::debug!(from = ?self.state, to = ?next, "Transaction state change");
        self.state = next;
        self.history.push(next);
    }

    /// Snapshot, apply `job`, capture, and restore.
    ///
    /// The render settings are restored on every exit path once the snapshot
    /// is taken. A job whose start frame is after its end frame is refused
    /// before anything is written.
    pub fn run<H>(
        &mut self,
        job: &JobConfiguration,
        host: &mut H,
    ) -> PlayblastResult<CaptureReport>
    where
        H: Host + ?Sized,
    {
        if !matches!(
            self.state,
            TransactionState::Idle | TransactionState::Configuring
        ) {
            return Err(PlayblastError::capture(format!(
                "Transaction cannot start from state {:?}",
                self.state
            )));
        }

        if !job.has_ordered_range() {
            if self.state != TransactionState::Idle {
                self.enter(TransactionState::Idle);
            }
            return Err(PlayblastError::InvalidFrameRange {
                start: job.start_frame(),
                end: job.end_frame(),
            });
        }

        let started = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();
        let project_dir = host.project_dir();
        let plan = ApplyPlan::build(job, project_dir.as_deref());

        self.enter(TransactionState::Applying);
        let mut guard = RestoreGuard::new(host, self.options.restore_frame_range);
        plan.apply(&mut *guard);

        self.enter(TransactionState::Capturing);
        tracing::info!(
            output = %plan.output_path.display(),
            start = plan.frame_start,
            end = plan.frame_end,
            "Starting viewport capture"
        );
        let result = ViewportCapture::capture(&mut *guard, &CaptureRequest::VIEWPORT_ANIMATION);

        if let Err(e) = &result {
            self.enter(TransactionState::Failed);
            tracing::warn!(error = %e, "Viewport capture failed, restoring render settings");
        }

        self.enter(TransactionState::Restoring);
        guard.restore();
        self.enter(TransactionState::Idle);

        let outcome = result?;
        tracing::info!(
            output = %plan.output_path.display(),
            frames = outcome.frames.clone().count(),
            elapsed_ms = started.elapsed().as_millis(),
            "Viewport capture complete"
        );

        Ok(CaptureReport {
            output_path: plan.output_path,
            frames: outcome.frames,
            output_files: outcome.output_files,
            started_at,
            elapsed_ms: started.elapsed().as_millis(),
        })
    }
}

impl Default for CaptureTransaction {
    fn default() -> Self {
        Self::new(TransactionOptions::default())
    }
}
