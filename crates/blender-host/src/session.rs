//! Session file holding the host state between invocations.

use std::path::{Path, PathBuf};

use playblast_common::error::{PlayblastError, PlayblastResult};
use playblast_host_core::HostState;

/// A [`HostState`] stored as JSON on disk.
#[derive(Debug, Clone)]
pub struct SessionFile {
    /// Location of the session file.
    pub path: PathBuf,

    /// State read from or to be written to `path`.
    pub state: HostState,
}

impl SessionFile {
    /// Load a session file.
    pub fn load(path: impl AsRef<Path>) -> PlayblastResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(PlayblastError::FileNotFound { path });
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| PlayblastError::session(&path, format!("read failed: {e}")))?;
        let state = serde_json::from_str(&content)
            .map_err(|e| PlayblastError::session(&path, format!("parse failed: {e}")))?;
        Ok(Self { path, state })
    }

    /// Load `path` if it exists, otherwise start from `fallback`.
    pub fn load_or(path: impl AsRef<Path>, fallback: HostState) -> PlayblastResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "No session file, starting from defaults");
            Ok(Self {
                path: path.to_path_buf(),
                state: fallback,
            })
        }
    }

    /// Write the session to disk, creating parent directories.
    pub fn save(&self) -> PlayblastResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&self.path, json)
            .map_err(|e| PlayblastError::session(&self.path, format!("write failed: {e}")))?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }
}
