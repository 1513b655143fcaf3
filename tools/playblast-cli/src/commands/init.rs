//! Write a default session file.

use std::path::PathBuf;

use playblast_blender_host::SessionFile;
use playblast_common::config::{config_file_path, AppConfig};
use playblast_host_core::HostState;
use playblast_job_model::MIN_POSITIVE;

/// Scene range for a new session, with each frame clamped to at least 1.
fn scene_range(start: u32, end: u32) -> (u32, u32) {
    (start.max(MIN_POSITIVE), end.max(MIN_POSITIVE))
}

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    start: u32,
    end: u32,
    force: bool,
    write_config: bool,
) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists, use --force to overwrite",
            path.display()
        ));
    }

    let (start, end) = scene_range(start, end);
    if start > end {
        tracing::warn!(start, end, "Session frame range is inverted");
        println!("[WARN] Start frame {start} is after end frame {end}; exports will be refused");
    }

    let mut state = HostState::default();
    state.scene.frame_start = start;
    state.scene.frame_end = end;

    let session = SessionFile { path, state };
    session
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to write session: {e}"))?;

    println!("Session created: {}", session.path.display());
    println!("  Frames: {start}-{end}");
    println!(
        "  Render: {}x{} at {}%, {}",
        session.state.render.resolution_x,
        session.state.render.resolution_y,
        session.state.render.resolution_percentage,
        session.state.render.file_format
    );

    if write_config {
        config.save()?;
        println!("Config written: {}", config_file_path().display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_range_clamps_to_first_frame() {
        assert_eq!(scene_range(0, 0), (1, 1));
        assert_eq!(scene_range(0, 48), (1, 48));
        assert_eq!(scene_range(20, 10), (20, 10));
    }

    #[test]
    fn test_init_writes_clamped_session() {
        let dir = std::env::temp_dir().join("playblast_test_init");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("shot.playblast.json");

        run(&AppConfig::default(), path.clone(), 0, 24, false, false).unwrap();
        let session = SessionFile::load(&path).unwrap();
        assert_eq!(session.state.scene.frame_start, 1);
        assert_eq!(session.state.scene.frame_end, 24);

        assert!(run(&AppConfig::default(), path.clone(), 1, 24, false, false).is_err());
        run(&AppConfig::default(), path.clone(), 20, 10, true, false).unwrap();
        let session = SessionFile::load(&path).unwrap();
        assert_eq!(session.state.scene.frame_start, 20);

        std::fs::remove_dir_all(&dir).ok();
    }
}
