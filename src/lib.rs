//! YouTube Video Splitter Library
//!
//! Downloads YouTube videos with yt-dlp and cuts them into short clips with
//! ffmpeg, choosing split points at scene changes or pauses in speech.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use adapters::toml_config::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{ClipInfo, MediaInfo, ProcessReport, SplitReport};
