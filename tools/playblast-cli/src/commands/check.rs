//! Check that Blender can be launched.

use playblast_blender_host::process::MIN_VERSION;
use playblast_blender_host::BlenderProcess;
use playblast_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Playblast System Check");
    println!("{}", "=".repeat(50));

    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!(
            "[INFO] Config: {} (not found, using defaults)",
            config_path.display()
        );
    }

    let process = BlenderProcess::from_config(&config.blender);
    let executable = process.executable().display().to_string();
    if !process.is_available() {
        println!("[FAIL] Blender executable not found: {executable}");
        println!();
        println!("Install Blender or set blender.executable in the config file.");
        return Ok(());
    }

    match process.version() {
        Ok(version) if version < MIN_VERSION => println!(
            "[WARN] Blender {version} at {executable} predates {MIN_VERSION}; captures may fail"
        ),
        Ok(version) => println!("[OK] Blender {version}: {executable}"),
        Err(e) => println!("[WARN] Blender found at {executable}, version unknown: {e}"),
    }
    if !config.blender.extra_args.is_empty() {
        println!("     Extra arguments: {}", config.blender.extra_args.join(" "));
    }

    let defaults = &config.playblast;
    println!();
    println!("Defaults:");
    println!("  Directory: {}", defaults.output_directory);
    println!("  File name: {}", defaults.file_name);
    println!(
        "  Format: {} ({} in {})",
        defaults.file_format, defaults.video_codec, defaults.container_format
    );
    println!(
        "  Resolution: {}x{} at {}%",
        defaults.resolution_x, defaults.resolution_y, defaults.resolution_scale
    );
    println!("  Restore frame range: {}", defaults.restore_frame_range);

    println!();
    println!("Blender is available. Playblast is ready.");

    Ok(())
}
