//! In-process host.
//!
//! `MemoryHost` keeps its state in a [`HostState`] and, instead of rendering,
//! records what a real capture would have seen. It can be armed to fail the
//! next capture, which is how failure paths are exercised without Blender.

use std::path::PathBuf;

use playblast_common::error::{PlayblastError, PlayblastResult};

use crate::formats::{ContainerFormat, FileFormat, VideoCodec};
use crate::state::{HostState, StateBackedHost};
use crate::{CaptureOutcome, CaptureRequest, ViewportCapture};

/// Host state observed at the moment a capture ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    pub request: CaptureRequest,
    pub output_path: PathBuf,
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub resolution_percentage: u32,
    pub file_format: FileFormat,
    pub video_codec: VideoCodec,
    pub container_format: ContainerFormat,
    pub frame_start: u32,
    pub frame_end: u32,
}

impl CaptureRecord {
    /// Frames the capture covered (empty when start > end).
    pub fn frames(&self) -> impl Iterator<Item = u32> {
        self.frame_start..=self.frame_end
    }
}

/// Host that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: HostState,
    captures: Vec<CaptureRecord>,
    fail_next: Option<String>,
}

impl MemoryHost {
    pub fn new(state: HostState) -> Self {
        Self {
            state,
            captures: Vec::new(),
            fail_next: None,
        }
    }

    /// Make the next capture return a capture error with `message`.
    pub fn fail_next_capture(&mut self, message: impl Into<String>) {
        self.fail_next = Some(message.into());
    }

    /// Captures that ran, oldest first.
    pub fn captures(&self) -> &[CaptureRecord] {
        &self.captures
    }

    pub fn into_state(self) -> HostState {
        self.state
    }
}

impl StateBackedHost for MemoryHost {
    fn state(&self) -> &HostState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut HostState {
        &mut self.state
    }
}

impl ViewportCapture for MemoryHost {
    fn capture(&mut self, request: &CaptureRequest) -> PlayblastResult<CaptureOutcome> {
        if let Some(message) = self.fail_next.take() {
            tracing::debug!(%message, "Memory host failing capture on request");
            return Err(PlayblastError::capture(message));
        }

        let render = &self.state.render;
        let scene = &self.state.scene;
        let record = CaptureRecord {
            request: *request,
            output_path: render.filepath.clone(),
            resolution_x: render.resolution_x,
            resolution_y: render.resolution_y,
            resolution_percentage: render.resolution_percentage,
            file_format: render.file_format,
            video_codec: render.ffmpeg.codec,
            container_format: render.ffmpeg.container,
            frame_start: scene.frame_start,
            frame_end: scene.frame_end,
        };
        tracing::debug!(
            output = %record.output_path.display(),
            start = record.frame_start,
            end = record.frame_end,
            "Memory host recorded capture"
        );

        let frames = if request.animation {
            scene.frame_start..=scene.frame_end
        } else {
            scene.frame_start..=scene.frame_start
        };
        self.captures.push(record);

        Ok(CaptureOutcome {
            frames,
            output_files: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderState, SceneState};

    #[test]
    fn test_capture_records_state_at_call_time() {
        let mut host = MemoryHost::new(HostState::default());
        host.set_output_path(PathBuf::from("/tmp/out/shot010.mp4"));
        host.set_frame_range(10, 20);

        let outcome = host.capture(&CaptureRequest::VIEWPORT_ANIMATION).unwrap();
        assert_eq!(outcome.frames, 10..=20);

        host.set_output_path(PathBuf::from("/tmp/other"));
        let record = &host.captures()[0];
        assert_eq!(record.output_path, PathBuf::from("/tmp/out/shot010.mp4"));
        assert_eq!(
            record.frames().collect::<Vec<_>>(),
            (10..=20).collect::<Vec<_>>()
        );
        assert!(!record.request.sequencer);
    }

    #[test]
    fn test_armed_failure_fires_once() {
        let mut host = MemoryHost::default();
        host.fail_next_capture("disk full");

        let err = host
            .capture(&CaptureRequest::VIEWPORT_ANIMATION)
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(host.captures().is_empty());

        host.capture(&CaptureRequest::VIEWPORT_ANIMATION).unwrap();
        assert_eq!(host.captures().len(), 1);
    }
}
