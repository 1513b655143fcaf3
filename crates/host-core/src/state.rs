//! Plain-data host state.
//!
//! [`HostState`] mirrors the fields a playblast reads and writes. It backs
//! the in-memory host and the session file of the Blender host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::formats::{ContainerFormat, FileFormat, VideoCodec};
use crate::{RenderState, SceneState};

/// Render settings and scene range of one host session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostState {
    pub render: RenderSettings,
    pub scene: SceneSettings,
}

/// The host's global render settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Output path template.
    pub filepath: PathBuf,

    pub resolution_x: u32,
    pub resolution_y: u32,

    /// Percentage applied to the resolution.
    pub resolution_percentage: u32,

    /// Image/video output mode.
    pub file_format: FileFormat,

    /// Video encoder settings, used when `file_format` is FFMPEG.
    #[serde(default)]
    pub ffmpeg: FfmpegSettings,
}

/// Video encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FfmpegSettings {
    pub codec: VideoCodec,
    #[serde(rename = "format")]
    pub container: ContainerFormat,
}

/// Active scene data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSettings {
    pub frame_start: u32,
    pub frame_end: u32,

    /// Directory of the saved project file.
    #[serde(default)]
    pub project_dir: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            filepath: PathBuf::from("/tmp/"),
            resolution_x: 1920,
            resolution_y: 1080,
            resolution_percentage: 100,
            file_format: FileFormat::Png,
            ffmpeg: FfmpegSettings::default(),
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            frame_start: 1,
            frame_end: 250,
            project_dir: None,
        }
    }
}

impl HostState {
    /// Fresh state for a project saved in `project_dir`.
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            render: RenderSettings::default(),
            scene: SceneSettings {
                project_dir: Some(project_dir.into()),
                ..SceneSettings::default()
            },
        }
    }
}

/// A host whose render and scene fields live in a [`HostState`].
///
/// Implementing this gives [`RenderState`] and [`SceneState`] for free.
pub trait StateBackedHost {
    fn state(&self) -> &HostState;
    fn state_mut(&mut self) -> &mut HostState;
}

impl StateBackedHost for HostState {
    fn state(&self) -> &HostState {
        self
    }

    fn state_mut(&mut self) -> &mut HostState {
        self
    }
}

impl<T: StateBackedHost> RenderState for T {
    fn output_path(&self) -> PathBuf {
        self.state().render.filepath.clone()
    }

    fn set_output_path(&mut self, path: PathBuf) {
        self.state_mut().render.filepath = path;
    }

    fn resolution_x(&self) -> u32 {
        self.state().render.resolution_x
    }

    fn set_resolution_x(&mut self, value: u32) {
        self.state_mut().render.resolution_x = value;
    }

    fn resolution_y(&self) -> u32 {
        self.state().render.resolution_y
    }

    fn set_resolution_y(&mut self, value: u32) {
        self.state_mut().render.resolution_y = value;
    }

    fn resolution_percentage(&self) -> u32 {
        self.state().render.resolution_percentage
    }

    fn set_resolution_percentage(&mut self, value: u32) {
        self.state_mut().render.resolution_percentage = value;
    }

    fn file_format(&self) -> FileFormat {
        self.state().render.file_format
    }

    fn set_file_format(&mut self, format: FileFormat) {
        self.state_mut().render.file_format = format;
    }

    fn video_codec(&self) -> VideoCodec {
        self.state().render.ffmpeg.codec
    }

    fn set_video_codec(&mut self, codec: VideoCodec) {
        self.state_mut().render.ffmpeg.codec = codec;
    }

    fn container_format(&self) -> ContainerFormat {
        self.state().render.ffmpeg.container
    }

    fn set_container_format(&mut self, container: ContainerFormat) {
        self.state_mut().render.ffmpeg.container = container;
    }
}

impl<T: StateBackedHost> SceneState for T {
    fn frame_start(&self) -> u32 {
        self.state().scene.frame_start
    }

    fn frame_end(&self) -> u32 {
        self.state().scene.frame_end
    }

    fn set_frame_range(&mut self, start: u32, end: u32) {
        let scene = &mut self.state_mut().scene;
        scene.frame_start = start;
        scene.frame_end = end;
    }

    fn project_dir(&self) -> Option<PathBuf> {
        self.state().scene.project_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_matches_fresh_scene() {
        let state = HostState::default();
        assert_eq!(state.render.resolution_percentage, 100);
        assert_eq!(state.render.file_format, FileFormat::Png);
        assert_eq!(state.frame_range(), 1..=250);
        assert!(state.project_dir().is_none());
    }

    #[test]
    fn test_setters_write_through_to_fields() {
        let mut state = HostState::for_project("/projects/shot010");
        state.set_video_codec(VideoCodec::Mpeg4);
        state.set_container_format(ContainerFormat::Avi);
        state.set_frame_range(10, 20);

        assert_eq!(state.render.ffmpeg.codec, VideoCodec::Mpeg4);
        assert_eq!(state.render.ffmpeg.container, ContainerFormat::Avi);
        assert_eq!(state.scene.frame_start, 10);
        assert_eq!(state.scene.frame_end, 20);
        assert_eq!(
            state.project_dir(),
            Some(PathBuf::from("/projects/shot010"))
        );
    }

    #[test]
    fn test_session_json_without_ffmpeg_section_uses_defaults() {
        let json = r#"{
            "render": {
                "filepath": "/renders/",
                "resolution_x": 1280,
                "resolution_y": 720,
                "resolution_percentage": 50,
                "file_format": "JPEG"
            },
            "scene": { "frame_start": 1, "frame_end": 48 }
        }"#;
        let state: HostState = serde_json::from_str(json).unwrap();
        assert_eq!(state.render.file_format, FileFormat::Jpeg);
        assert_eq!(state.render.ffmpeg, FfmpegSettings::default());
        assert_eq!(state.scene.project_dir, None);
    }
}
