//! The playblast operator: configure a job, then run it.
//!
//! `invoke` is the two-phase entry point behind the panel button. It seeds a
//! fresh job from the scene, hands it to a [`Dialog`], and runs the
//! transaction only if the dialog was confirmed.

use std::path::Path;

use playblast_common::config::PlayblastDefaults;
use playblast_common::error::PlayblastResult;
use playblast_host_core::Host;
use playblast_job_model::JobConfiguration;

use crate::transaction::{CaptureReport, CaptureTransaction, TransactionOptions, TransactionState};

/// How a dialog was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed(JobConfiguration),
    Cancelled,
}

/// A front end that lets the user edit a job.
pub trait Dialog {
    /// Show `job` for editing and return once the user confirms or cancels.
    fn configure(
        &mut self,
        job: JobConfiguration,
        project_dir: Option<&Path>,
    ) -> PlayblastResult<DialogOutcome>;
}

impl<F> Dialog for F
where
    F: FnMut(JobConfiguration, Option<&Path>) -> PlayblastResult<DialogOutcome>,
{
    fn configure(
        &mut self,
        job: JobConfiguration,
        project_dir: Option<&Path>,
    ) -> PlayblastResult<DialogOutcome> {
        self(job, project_dir)
    }
}

/// What an invocation ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorResult {
    Finished(CaptureReport),
    Cancelled,
}

/// Entry point for running a playblast.
#[derive(Debug, Clone, Default)]
pub struct PlayblastOperator {
    defaults: PlayblastDefaults,
    options: TransactionOptions,
}

impl PlayblastOperator {
    pub fn new(defaults: PlayblastDefaults) -> Self {
        let options = TransactionOptions {
            restore_frame_range: defaults.restore_frame_range,
        };
        Self { defaults, options }
    }

    pub fn with_options(mut self, options: TransactionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> TransactionOptions {
        self.options
    }

    /// A job seeded from the scene's current state.
    pub fn seed_job<H: Host + ?Sized>(&self, host: &H) -> JobConfiguration {
        JobConfiguration::from_scene(host, &self.defaults)
    }

    /// Seed a job, let `dialog` edit it, and run it if confirmed.
    pub fn invoke<D, H>(&self, dialog: &mut D, host: &mut H) -> PlayblastResult<OperatorResult>
    where
        D: Dialog + ?Sized,
        H: Host + ?Sized,
    {
        let mut transaction = CaptureTransaction::new(self.options);
        transaction.enter(TransactionState::Configuring);

        let job = self.seed_job(&*host);
        let project_dir = host.project_dir();
        match dialog.configure(job, project_dir.as_deref())? {
            DialogOutcome::Cancelled => {
                transaction.enter(TransactionState::Idle);
                tracing::info!("Playblast cancelled");
                Ok(OperatorResult::Cancelled)
            }
            DialogOutcome::Confirmed(job) => {
                transaction.run(&job, host).map(OperatorResult::Finished)
            }
        }
    }

    /// Run an already confirmed job.
    pub fn execute<H>(
        &self,
        job: &JobConfiguration,
        host: &mut H,
    ) -> PlayblastResult<CaptureReport>
    where
        H: Host + ?Sized,
    {
        CaptureTransaction::new(self.options).run(job, host)
    }
}
