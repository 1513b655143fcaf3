//! Playblast host contracts.
//!
//! The host application owns three things a playblast touches: a global
//! render-settings record, the active scene (frame range, project location)
//! and a viewport capture command. This crate describes them as traits so the
//! capture transaction can run against Blender or against an in-memory host.

pub mod formats;
pub mod memory;
pub mod state;

use std::ops::RangeInclusive;
use std::path::PathBuf;

use playblast_common::error::PlayblastResult;

pub use formats::{ContainerFormat, FileFormat, VideoCodec};
pub use memory::{CaptureRecord, MemoryHost};
pub use state::{FfmpegSettings, HostState, RenderSettings, SceneSettings, StateBackedHost};

/// The host's global render settings, read and written field by field.
pub trait RenderState {
    fn output_path(&self) -> PathBuf;
    fn set_output_path(&mut self, path: PathBuf);

    fn resolution_x(&self) -> u32;
    fn set_resolution_x(&mut self, value: u32);

    fn resolution_y(&self) -> u32;
    fn set_resolution_y(&mut self, value: u32);

    /// Scale applied to the base resolution, in percent.
    fn resolution_percentage(&self) -> u32;
    fn set_resolution_percentage(&mut self, value: u32);

    fn file_format(&self) -> FileFormat;
    fn set_file_format(&mut self, format: FileFormat);

    fn video_codec(&self) -> VideoCodec;
    fn set_video_codec(&mut self, codec: VideoCodec);

    fn container_format(&self) -> ContainerFormat;
    fn set_container_format(&mut self, container: ContainerFormat);
}

/// The active scene.
pub trait SceneState {
    fn frame_start(&self) -> u32;
    fn frame_end(&self) -> u32;

    /// Overwrite the scene's playback range.
    fn set_frame_range(&mut self, start: u32, end: u32);

    /// Directory of the saved project file, `None` while unsaved.
    fn project_dir(&self) -> Option<PathBuf>;

    /// Current playback range, inclusive.
    fn frame_range(&self) -> RangeInclusive<u32> {
        self.frame_start()..=self.frame_end()
    }
}

/// Parameters of the host's viewport render command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Render every frame of the scene range instead of the current frame.
    pub animation: bool,

    /// Composite the video sequencer strips into the output.
    pub sequencer: bool,
}

impl CaptureRequest {
    /// Whole-range viewport animation without sequencer compositing.
    pub const VIEWPORT_ANIMATION: CaptureRequest = CaptureRequest {
        animation: true,
        sequencer: false,
    };
}

/// What the host reported after a capture completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Frames the host iterated over.
    pub frames: RangeInclusive<u32>,

    /// Files the host reported writing, if it reports them.
    pub output_files: Vec<PathBuf>,
}

/// The host's viewport capture command.
pub trait ViewportCapture {
    /// Run the capture to completion, blocking the calling thread.
    fn capture(&mut self, request: &CaptureRequest) -> PlayblastResult<CaptureOutcome>;
}

/// Everything the capture transaction needs from a host.
pub trait Host: RenderState + SceneState + ViewportCapture {}

impl<T: RenderState + SceneState + ViewportCapture + ?Sized> Host for T {}
