use std::path::PathBuf;

use playblast_capture_engine::{CaptureTransaction, TransactionOptions};
use playblast_common::config::PlayblastDefaults;
use playblast_common::error::PlayblastError;
use playblast_host_core::{
    CaptureOutcome, CaptureRequest, ContainerFormat, FileFormat, HostState, MemoryHost,
    StateBackedHost, VideoCodec, ViewportCapture,
};
use playblast_job_model::{ExportFormat, JobConfiguration};
use proptest::prelude::*;

/// Host whose capture command panics, as a crashing viewport would.
struct PanickingHost(HostState);

impl StateBackedHost for PanickingHost {
    fn state(&self) -> &HostState {
        &self.0
    }

    fn state_mut(&mut self) -> &mut HostState {
        &mut self.0
    }
}

impl ViewportCapture for PanickingHost {
    fn capture(&mut self, _request: &CaptureRequest) -> Result<CaptureOutcome, PlayblastError> {
        panic!("viewport context lost");
    }
}

fn starting_state() -> HostState {
    let mut state = HostState::for_project("/projects/seq01");
    state.render.filepath = PathBuf::from("//render/final_");
    state.render.resolution_x = 3840;
    state.render.resolution_y = 2160;
    state.render.resolution_percentage = 100;
    state.render.file_format = FileFormat::OpenExr;
    state.render.ffmpeg.codec = VideoCodec::Mpeg4;
    state.render.ffmpeg.container = ContainerFormat::Avi;
    state
}

fn export_format() -> impl Strategy<Value = ExportFormat> {
    prop_oneof![Just(ExportFormat::Video), Just(ExportFormat::ImageSequence)]
}

fn video_codec() -> impl Strategy<Value = VideoCodec> {
    prop::sample::select(VideoCodec::ALL.to_vec())
}

fn container() -> impl Strategy<Value = ContainerFormat> {
    prop::sample::select(ContainerFormat::ALL.to_vec())
}

prop_compose! {
    fn job_configuration()(
        name in "[a-z][a-z0-9_]{0,11}",
        format in export_format(),
        codec in video_codec(),
        container in container(),
        scale in -10i64..200,
        width in 1i64..8192,
        height in 1i64..8192,
        start in 1i64..500,
        length in 0i64..200,
    ) -> JobConfiguration {
        let defaults = PlayblastDefaults::default();
        let mut job = JobConfiguration::from_defaults(&defaults, start, start + length);
        job.set_output_directory("/tmp/out");
        job.set_file_name(name);
        job.set_file_format(format);
        job.set_video_codec(codec);
        job.set_container_format(container);
        job.set_resolution_scale(scale);
        job.set_resolution_x(width);
        job.set_resolution_y(height);
        job
    }
}

proptest! {
    #[test]
    fn render_settings_restored_after_success(job in job_configuration()) {
        let before = starting_state();
        let mut host = MemoryHost::new(before.clone());

        let report = CaptureTransaction::default().run(&job, &mut host).unwrap();

        prop_assert_eq!(&host.state().render, &before.render);
        prop_assert_eq!(report.frames, job.start_frame()..=job.end_frame());
        let record = &host.captures()[0];
        prop_assert!((1..=100).contains(&record.resolution_percentage));
        prop_assert_eq!(record.file_format, job.file_format().host_format());
    }

    #[test]
    fn render_settings_restored_after_failure(job in job_configuration()) {
        let before = starting_state();
        let mut host = MemoryHost::new(before.clone());
        host.fail_next_capture("permission denied");

        let result = CaptureTransaction::default().run(&job, &mut host);

        prop_assert!(result.is_err());
        prop_assert_eq!(&host.state().render, &before.render);
    }

    #[test]
    fn scene_untouched_when_range_restore_enabled(job in job_configuration()) {
        let before = starting_state();
        let mut host = MemoryHost::new(before.clone());
        let mut transaction = CaptureTransaction::new(TransactionOptions {
            restore_frame_range: true,
        });

        transaction.run(&job, &mut host).unwrap();

        prop_assert_eq!(host.state(), &before);
    }
}

#[test]
fn render_settings_restored_when_capture_panics() {
    let before = starting_state();
    let mut host = PanickingHost(before.clone());
    let job = JobConfiguration::from_defaults(&PlayblastDefaults::default(), 10, 20);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = CaptureTransaction::default().run(&job, &mut host);
    }));

    assert!(outcome.is_err());
    assert_eq!(host.0.render, before.render);
    assert_eq!(host.0.scene.frame_start, 10);
}
