//! Mapping a job onto host render settings.

use std::path::{Path, PathBuf};

use playblast_host_core::{ContainerFormat, FileFormat, RenderState, SceneState, VideoCodec};
use playblast_job_model::{ExportFormat, JobConfiguration};

/// Encoder settings written only for video jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSettings {
    pub codec: VideoCodec,
    pub container: ContainerFormat,
}

/// The host values a job writes, computed up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyPlan {
    pub output_path: PathBuf,
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub resolution_percentage: u32,
    pub file_format: FileFormat,
    /// `None` for image sequences; codec and container are left untouched.
    pub video: Option<VideoSettings>,
    pub frame_start: u32,
    pub frame_end: u32,
}

impl ApplyPlan {
    /// Compute the plan for `job`, resolving `//` paths against `project_dir`.
    pub fn build(job: &JobConfiguration, project_dir: Option<&Path>) -> Self {
        let video = match job.file_format() {
            ExportFormat::Video => Some(VideoSettings {
                codec: job.video_codec(),
                container: job.container_format(),
            }),
            ExportFormat::ImageSequence => None,
        };

        Self {
            output_path: job.output_path(project_dir),
            resolution_x: job.resolution_x(),
            resolution_y: job.resolution_y(),
            resolution_percentage: job.resolution_scale().get(),
            file_format: job.file_format().host_format(),
            video,
            frame_start: job.start_frame(),
            frame_end: job.end_frame(),
        }
    }

    /// Write the plan into the host.
    pub fn apply<H>(&self, host: &mut H)
    where
        H: RenderState + SceneState + ?Sized,
    {
        host.set_resolution_x(self.resolution_x);
        host.set_resolution_y(self.resolution_y);
        host.set_resolution_percentage(self.resolution_percentage);

        host.set_file_format(self.file_format);
        if let Some(video) = self.video {
            host.set_container_format(video.container);
            host.set_video_codec(video.codec);
        }

        host.set_output_path(self.output_path.clone());
        host.set_frame_range(self.frame_start, self.frame_end);

        tracing::info!(
            output = %self.output_path.display(),
            format = %self.file_format,
            width = self.resolution_x,
            height = self.resolution_y,
            percentage = self.resolution_percentage,
            start = self.frame_start,
            end = self.frame_end,
            "Applied playblast settings"
        );
    }
}
