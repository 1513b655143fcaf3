//! Python expression run inside Blender for a capture.

use std::fmt::Write as _;
use std::path::Path;

use playblast_host_core::{CaptureRequest, HostState};

/// Quote `value` as a Python string literal.
///
/// A JSON string literal is also a valid Python string literal.
fn py_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn py_path(path: &Path) -> String {
    py_str(&path.to_string_lossy())
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Build the script that applies `state` and runs the viewport render.
pub fn capture_script(state: &HostState, request: &CaptureRequest) -> String {
    let render = &state.render;
    let scene = &state.scene;
    let mut script = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(script, "import bpy");
    let _ = writeln!(script, "scene = bpy.context.scene");
    let _ = writeln!(script, "render = scene.render");
    let _ = writeln!(script, "render.filepath = {}", py_path(&render.filepath));
    let _ = writeln!(script, "render.resolution_x = {}", render.resolution_x);
    let _ = writeln!(script, "render.resolution_y = {}", render.resolution_y);
    let _ = writeln!(
        script,
        "render.resolution_percentage = {}",
        render.resolution_percentage
    );
    let _ = writeln!(
        script,
        "render.image_settings.file_format = {}",
        py_str(render.file_format.as_str())
    );
    if render.file_format.is_movie() {
        let _ = writeln!(
            script,
            "render.ffmpeg.format = {}",
            py_str(render.ffmpeg.container.as_str())
        );
        let _ = writeln!(
            script,
            "render.ffmpeg.codec = {}",
            py_str(render.ffmpeg.codec.as_str())
        );
    }
    let _ = writeln!(script, "scene.frame_start = {}", scene.frame_start);
    let _ = writeln!(script, "scene.frame_end = {}", scene.frame_end);
    let _ = writeln!(
        script,
        "bpy.ops.render.opengl(animation={}, sequencer={})",
        py_bool(request.animation),
        py_bool(request.sequencer)
    );
    script
}
