// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for fetching videos from YouTube
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Fetch metadata without downloading media
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, DomainError>;

    /// Download the video (and English subtitles if requested) into `dest_dir`
    async fn download(
        &self,
        url: &str,
        quality: VideoQuality,
        with_subtitles: bool,
        dest_dir: &Path,
    ) -> Result<DownloadedVideo, DomainError>;
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe media file and return format and stream information
    async fn probe(&self, file_path: &Path) -> Result<MediaInfo, DomainError>;
}

/// Port for content analysis used to find natural split points
#[async_trait]
pub trait AnalyzePort: Send + Sync {
    /// Timestamps (seconds) where the scene score exceeds `threshold`
    async fn detect_scene_changes(
        &self,
        file_path: &Path,
        threshold: f64,
    ) -> Result<Vec<f64>, DomainError>;

    /// Silent intervals quieter than `noise_db` lasting at least `min_silence` seconds
    async fn detect_silences(
        &self,
        file_path: &Path,
        noise_db: f64,
        min_silence: f64,
    ) -> Result<Vec<(f64, f64)>, DomainError>;
}

/// Port for clip encoding
#[async_trait]
pub trait EncodePort: Send + Sync {
    /// Cut one clip, burning captions when the job carries a subtitle file
    async fn cut_clip(&self, job: &ClipJob) -> Result<(), DomainError>;
}

/// Port for checking the external toolchain
#[async_trait]
pub trait ToolPort: Send + Sync {
    async fn check_tools(&self) -> ToolStatus;
}

/// Version line of each external tool, `None` when it could not be run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolStatus {
    pub ffmpeg: Option<String>,
    pub ffprobe: Option<String>,
    pub ytdlp: Option<String>,
}

impl ToolStatus {
    /// ffmpeg and yt-dlp are mandatory; ffprobe ships with ffmpeg
    pub fn ready(&self) -> bool {
        self.ffmpeg.is_some() && self.ytdlp.is_some()
    }

    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ffmpeg.is_none() {
            missing.push("ffmpeg");
        }
        if self.ffprobe.is_none() {
            missing.push("ffprobe");
        }
        if self.ytdlp.is_none() {
            missing.push("yt-dlp");
        }
        missing
    }
}
