//! Configuration dialog layout and advisory checks.
//!
//! The dialog itself belongs to whichever front end shows it. This module
//! decides what it contains: which rows appear in which section, and which
//! warnings to display. Nothing here blocks a job from running.

use std::fmt;
use std::path::Path;

use crate::job::{ExportFormat, JobConfiguration};
use crate::naming::{expand_frame_placeholder, is_project_relative};

/// Preferred dialog width in pixels.
pub const DIALOG_WIDTH: u32 = 500;

/// Label of the button that opens the dialog.
pub const PANEL_BUTTON_LABEL: &str = "Export Playblast";

/// Title of the panel that hosts the button.
pub const PANEL_TITLE: &str = "Playblast";

/// One labelled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRow {
    pub label: &'static str,
    pub value: String,
}

/// A titled group of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSection {
    pub title: &'static str,
    pub rows: Vec<DialogRow>,
}

/// Everything the dialog shows for a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLayout {
    pub sections: Vec<DialogSection>,
}

impl DialogLayout {
    /// Lay out `job`. Codec and container rows are only present for video.
    pub fn for_job(job: &JobConfiguration) -> Self {
        let row = |label, value: String| DialogRow { label, value };

        let output = DialogSection {
            title: "Output Settings",
            rows: vec![
                row("Directory", job.output_directory().display().to_string()),
                row("File Name", job.file_name().to_string()),
            ],
        };

        let mut format_rows = vec![row("Format", job.file_format().label().to_string())];
        if job.file_format() == ExportFormat::Video {
            format_rows.push(row("Video Codec", job.video_codec().label().to_string()));
            format_rows.push(row("Container", job.container_format().label().to_string()));
        }
        let format = DialogSection {
            title: "File Format Settings",
            rows: format_rows,
        };

        let (width, height) = job.effective_resolution();
        let resolution = DialogSection {
            title: "Resolution Settings",
            rows: vec![
                row("Resolution X", job.resolution_x().to_string()),
                row("Resolution Y", job.resolution_y().to_string()),
                row(
                    "Resolution Scale (%)",
                    job.resolution_scale().get().to_string(),
                ),
                row("Output Size", format!("{width}x{height}")),
            ],
        };

        let frames = DialogSection {
            title: "Frame Range",
            rows: vec![
                row("Start Frame", job.start_frame().to_string()),
                row("End Frame", job.end_frame().to_string()),
            ],
        };

        Self {
            sections: vec![output, format, resolution, frames],
        }
    }

    /// Find a row by label in any section.
    pub fn row(&self, label: &str) -> Option<&DialogRow> {
        self.sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .find(|row| row.label == label)
    }
}

impl fmt::Display for DialogLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .map(|row| row.label.len())
            .max()
            .unwrap_or(0);

        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", section.title)?;
            for row in &section.rows {
                writeln!(f, "  {:<label_width$}  {}", row.label, row.value)?;
            }
        }
        Ok(())
    }
}

/// A warning shown alongside the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// The start frame is after the end frame.
    InvertedFrameRange { start: u32, end: u32 },
    /// The file name is empty.
    EmptyFileName,
    /// The directory is project-relative but the project has not been saved.
    UnsavedProjectDirectory,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::InvertedFrameRange { start, end } => write!(
                f,
                "Start frame {start} is after end frame {end}; the capture will be refused"
            ),
            Advisory::EmptyFileName => f.write_str("File name is empty"),
            Advisory::UnsavedProjectDirectory => f.write_str(
                "Output directory is relative to the project, but the project is not saved",
            ),
        }
    }
}

/// Display-only checks for `job`.
pub fn advisories(job: &JobConfiguration, project_dir: Option<&Path>) -> Vec<Advisory> {
    let mut found = Vec::new();
    if !job.has_ordered_range() {
        found.push(Advisory::InvertedFrameRange {
            start: job.start_frame(),
            end: job.end_frame(),
        });
    }
    if job.file_name().trim().is_empty() {
        found.push(Advisory::EmptyFileName);
    }
    if project_dir.is_none() && is_project_relative(job.output_directory()) {
        found.push(Advisory::UnsavedProjectDirectory);
    }
    found
}

/// Path of the first file the job will write, for display.
pub fn first_output_preview(job: &JobConfiguration, project_dir: Option<&Path>) -> String {
    let path = job.output_path(project_dir).display().to_string();
    match job.file_format() {
        ExportFormat::Video => path,
        ExportFormat::ImageSequence => expand_frame_placeholder(&path, job.start_frame()),
    }
}
