//! Playblast CLI: configure and run viewport captures through Blender.
//!
//! Usage:
//!   playblast export <BLEND>   Configure and run a playblast of a .blend file
//!   playblast check            Check that Blender can be launched
//!   playblast init <FILE>      Write a default session file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use playblast_host_core::{ContainerFormat, VideoCodec};
use playblast_job_model::ExportFormat;

mod commands;

#[derive(Parser)]
#[command(
    name = "playblast",
    about = "Quick viewport previews of Blender animations",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure and run a playblast
    Export {
        /// Path to the .blend file
        blend: PathBuf,

        /// Session file holding render settings and frame range
        /// (default: <BLEND stem>.playblast.json next to the .blend file)
        #[arg(short, long)]
        session: Option<PathBuf>,

        /// Output directory; a leading // is relative to the .blend file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output file name without extension
        #[arg(short, long)]
        name: Option<String>,

        /// Output format: video|image-sequence
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Video codec: h264|mpeg4
        #[arg(long)]
        codec: Option<VideoCodec>,

        /// Video container: mpeg4|avi|quicktime
        #[arg(long)]
        container: Option<ContainerFormat>,

        /// Resolution scale in percent, clamped to 1-100
        #[arg(long, allow_negative_numbers = true)]
        scale: Option<i64>,

        /// Output width in pixels
        #[arg(long, allow_negative_numbers = true)]
        width: Option<i64>,

        /// Output height in pixels
        #[arg(long, allow_negative_numbers = true)]
        height: Option<i64>,

        /// First frame
        #[arg(long, allow_negative_numbers = true)]
        start: Option<i64>,

        /// Last frame
        #[arg(long, allow_negative_numbers = true)]
        end: Option<i64>,

        /// Put the scene frame range back after the capture
        #[arg(long)]
        restore_frame_range: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Run against an in-memory host instead of Blender
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that Blender can be launched
    Check,

    /// Write a default session file
    Init {
        /// Session file to create
        path: PathBuf,

        /// Scene start frame
        #[arg(long, default_value = "1")]
        start: u32,

        /// Scene end frame
        #[arg(long, default_value = "250")]
        end: u32,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,

        /// Also write the default application config
        #[arg(long)]
        config: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = playblast_common::config::AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    let _log_guard = playblast_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Export {
            blend,
            session,
            output_dir,
            name,
            format,
            codec,
            container,
            scale,
            width,
            height,
            start,
            end,
            restore_frame_range,
            yes,
            dry_run,
        } => {
            let overrides = commands::export::Overrides {
                output_dir,
                name,
                format,
                codec,
                container,
                scale,
                width,
                height,
                start,
                end,
            };
            commands::export::run(
                &config,
                blend,
                session,
                overrides,
                restore_frame_range,
                yes,
                dry_run,
            )
        }
        Commands::Check => commands::check::run(&config),
        Commands::Init {
            path,
            start,
            end,
            force,
            config: write_config,
        } => commands::init::run(&config, path, start, end, force, write_config),
    }
}
