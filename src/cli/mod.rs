//! CLI module for ytsplit
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// YouTube Video Splitter
///
/// Downloads YouTube videos and cuts them into short clips at natural
/// split points, optionally burning in English captions.
#[derive(Parser, Debug)]
#[command(name = "ytsplit")]
#[command(about = "YouTube Video Splitter - cut videos into 30-60 second clips")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "YTSPLIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a YouTube video (or take a local file) and split it into clips
    Split(args::SplitArgs),
    /// Split every URL listed in a file
    Batch(args::BatchArgs),
    /// Show media information for a local file
    Inspect(args::InspectArgs),
    /// Run the web interface
    Serve(args::ServeArgs),
    /// Check that ffmpeg, ffprobe and yt-dlp are installed
    Check,
}
