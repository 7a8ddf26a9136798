//! Handsome CLI - play back and inspect tween timelines
//!
//! Timelines are described in TOML (see `handsome_animation::config`) and
//! driven at a fixed frame rate, printing every property per frame.

mod config;
mod playback;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Play back and inspect tween timelines
#[derive(Parser, Debug)]
#[command(name = "handsome")]
#[command(about = "Play back and inspect tween timelines")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a timeline file frame by frame
    Run {
        /// Timeline description (TOML)
        file: PathBuf,

        /// Frames per second used to drive the timeline
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// Print the schedule of a timeline file
    Inspect {
        /// Timeline description (TOML)
        file: PathBuf,
    },

    /// Play the level-up banner for a label
    LevelUp {
        /// Label to reveal
        text: String,

        /// Frames per second used to drive the banner
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Notification settings (TOML)
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { file, fps, json } => {
            tracing::info!("Playing {} at {} fps", file.display(), fps);
            let config = config::load_timeline(&file)?;
            playback::run(&config, fps, json)
        }
        Commands::Inspect { file } => {
            let config = config::load_timeline(&file)?;
            playback::inspect(&config)
        }
        Commands::LevelUp {
            text,
            fps,
            settings,
        } => {
            let settings = match settings {
                Some(path) => config::load_notification_settings(&path)?,
                None => Default::default(),
            };
            playback::level_up(&text, settings, fps)
        }
    }
}
