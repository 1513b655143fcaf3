//! Output naming.
//!
//! A video job writes `{file_name}.mp4`. An image-sequence job writes
//! `{file_name}_#####.png`; the host substitutes the zero-padded frame number
//! for the run of `#` characters, producing one file per frame.

use std::path::{Path, PathBuf};

use crate::job::{ExportFormat, JobConfiguration};

/// Extension of video output. Fixed regardless of the chosen container.
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Extension of image-sequence frames.
pub const IMAGE_EXTENSION: &str = ".png";

/// Number of digits in an image-sequence frame number.
pub const FRAME_PADDING: usize = 5;

/// Prefix marking a path as relative to the project directory.
pub const PROJECT_RELATIVE_PREFIX: &str = "//";

/// Base name of the output for `file_name` in `format`.
pub fn output_basename(file_name: &str, format: ExportFormat) -> String {
    match format {
        ExportFormat::Video => format!("{file_name}{VIDEO_EXTENSION}"),
        ExportFormat::ImageSequence => {
            format!(
                "{file_name}_{}{IMAGE_EXTENSION}",
                "#".repeat(FRAME_PADDING)
            )
        }
    }
}

/// Join an output directory and a base name with platform path semantics.
pub fn output_path(directory: &Path, basename: &str) -> PathBuf {
    directory.join(basename)
}

/// Resolve a `//`-prefixed directory against the project directory.
///
/// Paths without the prefix are returned unchanged, and so are prefixed
/// paths when the project has not been saved; the host then decides how
/// to interpret them.
pub fn resolve_directory(directory: &Path, project_dir: Option<&Path>) -> PathBuf {
    let Some(raw) = directory.to_str() else {
        return directory.to_path_buf();
    };
    match (raw.strip_prefix(PROJECT_RELATIVE_PREFIX), project_dir) {
        (Some(rest), Some(project)) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() {
                project.to_path_buf()
            } else {
                project.join(rest)
            }
        }
        _ => directory.to_path_buf(),
    }
}

/// Whether `directory` still needs a project directory to be resolved.
pub fn is_project_relative(directory: &Path) -> bool {
    directory
        .to_str()
        .is_some_and(|raw| raw.starts_with(PROJECT_RELATIVE_PREFIX))
}

/// Replace the frame-number placeholder in `path` with `frame`.
///
/// Mirrors the host's substitution: the last run of `#` becomes the frame
/// number padded to the length of the run.
pub fn expand_frame_placeholder(path: &str, frame: u32) -> String {
    let Some(end) = path.rfind('#') else {
        return path.to_string();
    };
    let start = path[..end]
        .char_indices()
        .rev()
        .find(|&(_, c)| c != '#')
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let width = end + 1 - start;
    format!(
        "{}{:0width$}{}",
        &path[..start],
        frame,
        &path[end + 1..],
        width = width
    )
}

impl JobConfiguration {
    /// Base name of the output file for this job.
    pub fn output_basename(&self) -> String {
        output_basename(self.file_name(), self.file_format())
    }

    /// Full output path for this job, resolving `//` against `project_dir`.
    pub fn output_path(&self, project_dir: Option<&Path>) -> PathBuf {
        let directory = resolve_directory(self.output_directory(), project_dir);
        output_path(&directory, &self.output_basename())
    }
}
