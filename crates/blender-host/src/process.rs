//! Launching Blender and reading its output.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use playblast_common::config::BlenderConfig;
use semver::Version;
use playblast_common::error::{PlayblastError, PlayblastResult};

/// Oldest Blender release whose viewport render accepts the capture script.
pub const MIN_VERSION: Version = Version::new(2, 80, 0);

/// A Blender executable plus the arguments every launch carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlenderProcess {
    executable: PathBuf,
    extra_args: Vec<String>,
}

/// What Blender printed while running a script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Files Blender reported saving.
    pub saved: Vec<PathBuf>,

    /// Frames appended to a movie.
    pub appended_frames: u32,

    /// Lines reporting errors.
    pub errors: Vec<String>,
}

/// Classification of one line of Blender output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine<'a> {
    /// `Fra:` render progress.
    Progress(&'a str),
    /// `Saved: '<path>'`.
    Saved(PathBuf),
    /// `Append frame N` while writing a movie.
    AppendFrame(u32),
    Warning(&'a str),
    Error(&'a str),
    Other(&'a str),
}

/// Classify one line of Blender's stdout.
pub fn classify_line(line: &str) -> OutputLine<'_> {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix("Saved:") {
        let path = rest.trim().trim_matches(|c: char| c == '\'' || c == '"');
        return OutputLine::Saved(PathBuf::from(path));
    }
    if let Some(rest) = trimmed.strip_prefix("Append frame") {
        if let Ok(frame) = rest.trim().parse() {
            return OutputLine::AppendFrame(frame);
        }
    }
    if trimmed.starts_with("Fra:") {
        return OutputLine::Progress(trimmed);
    }
    if trimmed.starts_with("Error") || trimmed.contains("Traceback") {
        return OutputLine::Error(trimmed);
    }
    if trimmed.starts_with("Warning") {
        return OutputLine::Warning(trimmed);
    }
    OutputLine::Other(trimmed)
}

impl BlenderProcess {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(config: &BlenderConfig) -> Self {
        Self {
            executable: config.executable_path(),
            extra_args: config.extra_args.clone(),
        }
    }

    pub fn with_extra_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.extra_args.extend(args);
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Whether the executable exists, either as a path or on `PATH`.
    pub fn is_available(&self) -> bool {
        if self.executable.components().count() > 1 {
            return self.executable.is_file();
        }
        Command::new("sh")
            .arg("-c")
            .arg(format!(
                "command -v {} >/dev/null 2>&1",
                self.executable.display()
            ))
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Version reported by `blender -v`.
    pub fn version(&self) -> PlayblastResult<Version> {
        let output = Command::new(&self.executable)
            .arg("-v")
            .output()
            .map_err(|e| {
                PlayblastError::host(format!(
                    "Failed to run {}: {e}",
                    self.executable.display()
                ))
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_version(&stdout).ok_or_else(|| {
            PlayblastError::host(format!(
                "Unrecognised version output from {}",
                self.executable.display()
            ))
        })
    }

    /// Arguments for running `script` against `blend_file` in background mode.
    pub fn script_args(&self, blend_file: &Path, script: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-b".into(), blend_file.into()];
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push("--python-exit-code".into());
        args.push("1".into());
        args.push("--python-expr".into());
        args.push(script.into());
        args
    }

    /// Run `script` inside `blend_file` and block until Blender exits.
    pub fn run_script(&self, blend_file: &Path, script: &str) -> PlayblastResult<ProcessReport> {
        let mut child = Command::new(&self.executable)
            .args(self.script_args(blend_file, script))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                PlayblastError::capture(format!(
                    "Failed to start {}: {e}",
                    self.executable.display()
                ))
            })?;

        tracing::info!(
            pid = child.id(),
            blend = %blend_file.display(),
            "Blender process started"
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PlayblastError::capture("Failed to capture Blender stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| PlayblastError::capture("Failed to capture Blender stderr"))?;

        // Blender can block on a full stderr pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read Blender stderr: {err}>"),
            }
        });

        let mut report = ProcessReport::default();
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        loop {
            line.clear();
            let bytes = reader.read_line(&mut line).map_err(|e| {
                PlayblastError::capture(format!("Failed reading Blender output: {e}"))
            })?;
            if bytes == 0 {
                break;
            }

            match classify_line(&line) {
                OutputLine::Progress(text) => tracing::debug!(output = text, "Blender progress"),
                OutputLine::Saved(path) => {
                    tracing::debug!(path = %path.display(), "Blender saved file");
                    report.saved.push(path);
                }
                OutputLine::AppendFrame(frame) => {
                    tracing::debug!(frame, "Blender appended frame");
                    report.appended_frames += 1;
                }
                OutputLine::Warning(text) => tracing::warn!(output = text, "Blender warning"),
                OutputLine::Error(text) => {
                    tracing::warn!(output = text, "Blender error");
                    report.errors.push(text.to_string());
                }
                OutputLine::Other(_) => {}
            }
        }

        let status = child
            .wait()
            .map_err(|e| PlayblastError::capture(format!("Failed to wait on Blender: {e}")))?;

        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            let detail = report
                .errors
                .last()
                .map(String::as_str)
                .unwrap_or_else(|| stderr_output.trim());
            return Err(PlayblastError::capture(format!(
                "Blender capture failed (status {status}): {detail}"
            )));
        }

        Ok(report)
    }
}

/// Parse the first line of `blender -v` output, `Blender 4.1.0` or `Blender 4.1`.
pub fn parse_version(output: &str) -> Option<Version> {
    let first = output.lines().next()?.trim();
    let raw = first.strip_prefix("Blender")?.split_whitespace().next()?;
    Version::parse(raw).ok().or_else(|| {
        // Older releases print only major.minor.
        let (major, minor) = raw.split_once('.')?;
        Some(Version::new(major.parse().ok()?, minor.parse().ok()?, 0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_saved_line() {
        assert_eq!(
            classify_line("Saved: '/tmp/out/shot010_00010.png'\n"),
            OutputLine::Saved(PathBuf::from("/tmp/out/shot010_00010.png"))
        );
    }

    #[test]
    fn test_classify_progress_and_frames() {
        assert!(matches!(
            classify_line("Fra:10 Mem:12.00M | Rendering 1 / 4 samples"),
            OutputLine::Progress(_)
        ));
        assert_eq!(classify_line("Append frame 12"), OutputLine::AppendFrame(12));
        assert!(matches!(
            classify_line("Error: Could not open file for writing"),
            OutputLine::Error(_)
        ));
        assert!(matches!(
            classify_line("Warning: unable to open audio device"),
            OutputLine::Warning(_)
        ));
        assert!(matches!(classify_line("Blender quit"), OutputLine::Other(_)));
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version("Blender 4.1.0\n\tbuild date: 2024-03-25\n"),
            Some(Version::new(4, 1, 0))
        );
        assert_eq!(
            parse_version("Blender 3.6.5 (hash 8a2c3)"),
            Some(Version::new(3, 6, 5))
        );
        assert_eq!(parse_version("Blender 2.93"), Some(Version::new(2, 93, 0)));
        assert_eq!(parse_version("Blender unknown"), None);
        assert_eq!(parse_version("command not found"), None);
        assert!(parse_version("Blender 2.79").unwrap() < MIN_VERSION);
        assert!(parse_version("Blender 4.1.0").unwrap() >= MIN_VERSION);
    }

    #[test]
    fn test_script_args_order() {
        let process = BlenderProcess::new("/opt/blender/blender")
            .with_extra_args(["--factory-startup".to_string()]);
        let args = process.script_args(Path::new("/projects/a.blend"), "import bpy");
        let args = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            args,
            vec![
                "-b",
                "/projects/a.blend",
                "--factory-startup",
                "--python-exit-code",
                "1",
                "--python-expr",
                "import bpy"
            ]
        );
    }

    #[test]
    fn test_missing_executable_is_unavailable() {
        let process = BlenderProcess::new("/nonexistent/playblast-test/blender");
        assert!(!process.is_available());
        assert!(process.run_script(Path::new("a.blend"), "").is_err());
    }

    #[test]
    fn test_from_config_defaults_to_path_lookup() {
        let process = BlenderProcess::from_config(&BlenderConfig::default());
        assert_eq!(process.executable(), Path::new("blender"));
    }
}
