//! Blender as a playblast host.

use std::path::{Path, PathBuf};

use playblast_common::error::{PlayblastError, PlayblastResult};
use playblast_host_core::{
    CaptureOutcome, CaptureRequest, HostState, SceneState, StateBackedHost, ViewportCapture,
};

use crate::process::BlenderProcess;
use crate::script::capture_script;

/// A `.blend` file rendered through a Blender executable.
///
/// Render settings and the scene range are held in memory and only reach
/// Blender when a capture runs, so a capture always sees exactly the state
/// the transaction applied.
#[derive(Debug, Clone)]
pub struct BlenderHost {
    state: HostState,
    blend_file: PathBuf,
    process: BlenderProcess,
}

impl BlenderHost {
    /// Open `blend_file` with `state` as the current settings.
    ///
    /// The project directory of `state` is set to the directory holding the
    /// `.blend` file.
    pub fn new(
        blend_file: impl Into<PathBuf>,
        mut state: HostState,
        process: BlenderProcess,
    ) -> PlayblastResult<Self> {
        let blend_file = blend_file.into();
        if !blend_file.is_file() {
            return Err(PlayblastError::FileNotFound { path: blend_file });
        }
        let blend_file = blend_file.canonicalize()?;
        state.scene.project_dir = blend_file.parent().map(Path::to_path_buf);

        tracing::debug!(
            blend = %blend_file.display(),
            executable = %process.executable().display(),
            "Blender host opened"
        );

        Ok(Self {
            state,
            blend_file,
            process,
        })
    }

    pub fn blend_file(&self) -> &Path {
        &self.blend_file
    }

    pub fn process(&self) -> &BlenderProcess {
        &self.process
    }

    pub fn into_state(self) -> HostState {
        self.state
    }
}

impl StateBackedHost for BlenderHost {
    fn state(&self) -> &HostState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut HostState {
        &mut self.state
    }
}

impl ViewportCapture for BlenderHost {
    fn capture(&mut self, request: &CaptureRequest) -> PlayblastResult<CaptureOutcome> {
        let script = capture_script(&self.state, request);
        let frames = if request.animation {
            self.frame_range()
        } else {
            self.frame_start()..=self.frame_start()
        };

        tracing::info!(
            blend = %self.blend_file.display(),
            output = %self.state.render.filepath.display(),
            frame_start = frames.start(),
            frame_end = frames.end(),
            "Running Blender viewport capture"
        );

        let report = self.process.run_script(&self.blend_file, &script)?;

        if !report.errors.is_empty() {
            tracing::warn!(
                count = report.errors.len(),
                "Blender reported errors during capture"
            );
        }
        tracing::info!(
            saved = report.saved.len(),
            appended_frames = report.appended_frames,
            "Blender viewport capture finished"
        );

        Ok(CaptureOutcome {
            frames,
            output_files: report.saved,
        })
    }
}
