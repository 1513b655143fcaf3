//! Configure and run a playblast of a .blend file.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use playblast_blender_host::{BlenderHost, BlenderProcess, SessionFile};
use playblast_capture_engine::{
    CaptureReport, Dialog, DialogOutcome, OperatorResult, PlayblastOperator, TransactionOptions,
};
use playblast_common::config::AppConfig;
use playblast_common::error::PlayblastResult;
use playblast_host_core::{ContainerFormat, HostState, MemoryHost, VideoCodec};
use playblast_job_model::{
    advisories, first_output_preview, DialogLayout, ExportFormat, JobConfiguration, DIALOG_WIDTH,
    PANEL_BUTTON_LABEL, PANEL_TITLE,
};

/// Approximate width of one terminal cell in dialog pixels.
const PIXELS_PER_COLUMN: u32 = 10;

/// Horizontal rule as wide as the dialog.
fn dialog_rule() -> String {
    "=".repeat((DIALOG_WIDTH / PIXELS_PER_COLUMN) as usize)
}

/// Command-line edits applied on top of the seeded job.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub name: Option<String>,
    pub format: Option<ExportFormat>,
    pub codec: Option<VideoCodec>,
    pub container: Option<ContainerFormat>,
    pub scale: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl Overrides {
    pub fn apply(&self, job: &mut JobConfiguration) {
        if let Some(dir) = &self.output_dir {
            job.set_output_directory(dir.clone());
        }
        if let Some(name) = &self.name {
            job.set_file_name(name.clone());
        }
        if let Some(format) = self.format {
            job.set_file_format(format);
        }
        if let Some(codec) = self.codec {
            job.set_video_codec(codec);
        }
        if let Some(container) = self.container {
            job.set_container_format(container);
        }
        if let Some(scale) = self.scale {
            job.set_resolution_scale(scale);
        }
        if let Some(width) = self.width {
            job.set_resolution_x(width);
        }
        if let Some(height) = self.height {
            job.set_resolution_y(height);
        }
        if let Some(start) = self.start {
            job.set_start_frame(start);
        }
        if let Some(end) = self.end {
            job.set_end_frame(end);
        }
    }
}

/// Terminal stand-in for the configuration dialog.
struct PromptDialog<R> {
    overrides: Overrides,
    assume_yes: bool,
    input: R,
}

impl<R: BufRead> Dialog for PromptDialog<R> {
    fn configure(
        &mut self,
        mut job: JobConfiguration,
        project_dir: Option<&Path>,
    ) -> PlayblastResult<DialogOutcome> {
        self.overrides.apply(&mut job);

        println!("{PANEL_TITLE}: {PANEL_BUTTON_LABEL}");
        println!("{}", dialog_rule());
        print!("{}", DialogLayout::for_job(&job));
        println!();
        for advisory in advisories(&job, project_dir) {
            println!("[WARN] {advisory}");
        }
        println!("  First output: {}", first_output_preview(&job, project_dir));

        if self.assume_yes || confirm(&mut self.input)? {
            Ok(DialogOutcome::Confirmed(job))
        } else {
            Ok(DialogOutcome::Cancelled)
        }
    }
}

/// Ask for confirmation. An empty answer confirms, end of input cancels.
fn confirm(input: &mut impl BufRead) -> PlayblastResult<bool> {
    print!("Run playblast? [Y/n] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "" | "y" | "yes"
    ))
}

/// Session file used when none is given: `<stem>.playblast.json` beside the .blend.
pub fn default_session_path(blend: &Path) -> PathBuf {
    let stem = blend
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    blend.with_file_name(format!("{stem}.playblast.json"))
}

pub fn run(
    config: &AppConfig,
    blend: PathBuf,
    session: Option<PathBuf>,
    overrides: Overrides,
    restore_frame_range: bool,
    yes: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let session_path = session.unwrap_or_else(|| default_session_path(&blend));
    let mut session = SessionFile::load_or(&session_path, HostState::default())
        .map_err(|e| anyhow::anyhow!("Failed to load session: {e}"))?;

    let mut operator = PlayblastOperator::new(config.playblast.clone());
    if restore_frame_range {
        operator = operator.with_options(TransactionOptions {
            restore_frame_range: true,
        });
    }

    let mut dialog = PromptDialog {
        overrides,
        assume_yes: yes,
        input: std::io::stdin().lock(),
    };

    if dry_run {
        let mut state = session.state.clone();
        state.scene.project_dir = blend
            .canonicalize()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        let mut host = MemoryHost::new(state);

        let result = operator.invoke(&mut dialog, &mut host)?;
        if let Some(record) = host.captures().first() {
            println!("Dry run, Blender was not started:");
            println!("  Output: {}", record.output_path.display());
            println!("  Format: {}", record.file_format);
            println!(
                "  Resolution: {}x{} at {}%",
                record.resolution_x, record.resolution_y, record.resolution_percentage
            );
            println!("  Frames: {}-{}", record.frame_start, record.frame_end);
        }
        let scene = host.into_state().scene;
        println!("  Scene range afterwards: {}-{}", scene.frame_start, scene.frame_end);
        print_result(&result);
        return Ok(());
    }

    let process = BlenderProcess::from_config(&config.blender);
    let mut host = BlenderHost::new(&blend, session.state.clone(), process)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", blend.display()))?;
    println!(
        "Blender: {} ({})",
        host.process().executable().display(),
        host.blend_file().display()
    );

    let outcome = operator.invoke(&mut dialog, &mut host);

    // The scene range may have changed even when the capture failed.
    session.state = host.into_state();
    session.save()?;

    match outcome {
        Ok(result) => {
            print_result(&result);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Playblast failed: {e}")),
    }
}

fn print_result(result: &OperatorResult) {
    match result {
        OperatorResult::Cancelled => println!("Playblast cancelled."),
        OperatorResult::Finished(report) => print_report(report),
    }
}

fn print_report(report: &CaptureReport) {
    println!("Playblast complete: {}", report.output_path.display());
    println!("  Frames: {}-{}", report.frames.start(), report.frames.end());
    if !report.output_files.is_empty() {
        println!("  Files written: {}", report.output_files.len());
    }
    println!("  Started: {}", report.started_at);
    println!("  Elapsed: {:.1}s", report.elapsed_ms as f64 / 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use playblast_common::config::PlayblastDefaults;
    use playblast_host_core::StateBackedHost;

    fn job() -> JobConfiguration {
        JobConfiguration::from_defaults(&PlayblastDefaults::default(), 1, 100)
    }

    #[test]
    fn test_overrides_are_clamped() {
        let mut job = job();
        Overrides {
            name: Some("shot010".to_string()),
            format: Some(ExportFormat::ImageSequence),
            scale: Some(250),
            width: Some(-5),
            start: Some(0),
            end: Some(48),
            ..Overrides::default()
        }
        .apply(&mut job);

        assert_eq!(job.file_name(), "shot010");
        assert_eq!(job.file_format(), ExportFormat::ImageSequence);
        assert_eq!(job.resolution_scale().get(), 100);
        assert_eq!(job.resolution_x(), 1);
        assert_eq!(job.resolution_y(), 1080);
        assert_eq!(job.start_frame(), 1);
        assert_eq!(job.end_frame(), 48);
    }

    #[test]
    fn test_confirm_answers() {
        assert!(confirm(&mut "\n".as_bytes()).unwrap());
        assert!(confirm(&mut "yes\n".as_bytes()).unwrap());
        assert!(!confirm(&mut "n\n".as_bytes()).unwrap());
        assert!(!confirm(&mut "".as_bytes()).unwrap());
    }

    #[test]
    fn test_prompt_dialog_cancel_leaves_host_untouched() {
        let mut host = MemoryHost::new(HostState::for_project("/projects/seq01"));
        let before = host.state().clone();
        let mut dialog = PromptDialog {
            overrides: Overrides::default(),
            assume_yes: false,
            input: "n\n".as_bytes(),
        };

        let result = PlayblastOperator::default()
            .invoke(&mut dialog, &mut host)
            .unwrap();

        assert_eq!(result, OperatorResult::Cancelled);
        assert_eq!(host.state(), &before);
    }

    #[test]
    fn test_prompt_dialog_confirmed_runs_capture() {
        let mut host = MemoryHost::new(HostState::for_project("/projects/seq01"));
        let mut dialog = PromptDialog {
            overrides: Overrides {
                name: Some("shot010".to_string()),
                ..Overrides::default()
            },
            assume_yes: true,
            input: "".as_bytes(),
        };

        let result = PlayblastOperator::default()
            .invoke(&mut dialog, &mut host)
            .unwrap();

        assert!(matches!(result, OperatorResult::Finished(_)));
        assert_eq!(
            host.captures()[0].output_path,
            PathBuf::from("/projects/seq01/shot010.mp4")
        );
    }

    #[test]
    fn test_dialog_rule_matches_dialog_width() {
        assert_eq!(dialog_rule().len(), 50);
    }

    #[test]
    fn test_default_session_path() {
        assert_eq!(
            default_session_path(Path::new("/projects/seq01/shot010.blend")),
            PathBuf::from("/projects/seq01/shot010.playblast.json")
        );
    }
}
