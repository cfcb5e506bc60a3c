// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Create a new TimeSpec from hours, minutes, seconds, milliseconds
    pub fn from_components(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        let total_seconds = hours as f64 * 3600.0
            + minutes as f64 * 60.0
            + seconds as f64
            + milliseconds as f64 / 1000.0;
        Self {
            seconds: total_seconds,
        }
    }

    /// Convert to Duration
    pub fn to_duration(&self) -> Duration {
        Duration::from_secs_f64(self.seconds.max(0.0))
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        // Try parsing as seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if seconds < 0.0 || !seconds.is_finite() {
                return Err(DomainError::BadArgs(
                    "Time cannot be negative".to_string(),
                ));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds_part) = match parts.as_slice() {
            [m, s] => (0, parse_minutes(m)?, parse_seconds(s)?),
            [h, m, s] => (parse_unit(h, "hours")?, parse_minutes(m)?, parse_seconds(s)?),
            _ => {
                return Err(DomainError::BadArgs(format!(
                    "Invalid time format '{}'. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)",
                    trimmed
                )))
            }
        };

        Ok(Self::from_seconds(
            hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds_part,
        ))
    }

    /// Format as HH:MM:SS.mmm, or MM:SS.mmm below one hour
    pub fn format_hms(&self) -> String {
        let total_ms = (self.seconds * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let seconds = (total_ms % 60_000) / 1000;
        let milliseconds = total_ms % 1000;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

fn parse_unit(part: &str, name: &str) -> Result<u32, DomainError> {
    part.parse::<u32>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} format: '{}'", name, part)))
}

fn parse_minutes(part: &str) -> Result<u32, DomainError> {
    let minutes = parse_unit(part, "minutes")?;
    if minutes >= 60 {
        return Err(DomainError::BadArgs(
            "Minutes must be less than 60".to_string(),
        ));
    }
    Ok(minutes)
}

fn parse_seconds(part: &str) -> Result<f64, DomainError> {
    let seconds = part
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid seconds format: '{}'", part)))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs(
            "Seconds must be less than 60".to_string(),
        ));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Half-open time range `[start, end)` inside a source video
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRange {
    pub start: TimeSpec,
    pub end: TimeSpec,
}

impl ClipRange {
    /// Create a new range; start must be non-negative and before end
    pub fn new(start: TimeSpec, end: TimeSpec) -> Result<Self, DomainError> {
        if start.seconds < 0.0 {
            return Err(DomainError::BadArgs(
                "Start time cannot be negative".to_string(),
            ));
        }
        if start.seconds >= end.seconds {
            return Err(DomainError::BadArgs(format!(
                "Start time ({}) must be before end time ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn from_seconds(start: f64, end: f64) -> Result<Self, DomainError> {
        Self::new(TimeSpec::from_seconds(start), TimeSpec::from_seconds(end))
    }

    pub fn duration(&self) -> TimeSpec {
        TimeSpec::from_seconds(self.end.seconds - self.start.seconds)
    }
}

/// Allowed clip length window in seconds
/// Shortest clip length a window may ask for
pub const MIN_CLIP_SECONDS: f64 = 1.0;
/// Longest clip length a window may ask for
pub const MAX_CLIP_SECONDS: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationWindow {
    pub min: f64,
    pub max: f64,
}

impl DurationWindow {
    pub fn new(min: f64, max: f64) -> Result<Self, DomainError> {
        for (name, value) in [("Minimum", min), ("Maximum", max)] {
            if !(MIN_CLIP_SECONDS..=MAX_CLIP_SECONDS).contains(&value) {
                return Err(DomainError::BadArgs(format!(
                    "{} clip duration must be between {} and {} seconds, got {}",
                    name, MIN_CLIP_SECONDS, MAX_CLIP_SECONDS, value
                )));
            }
        }
        if min > max {
            return Err(DomainError::BadArgs(format!(
                "Minimum clip duration ({}s) exceeds maximum ({}s)",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, length: f64) -> bool {
        length >= self.min && length <= self.max
    }
}

impl Default for DurationWindow {
    fn default() -> Self {
        Self {
            min: 30.0,
            max: 60.0,
        }
    }
}

/// Download quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VideoQuality {
    #[default]
    Best,
    P1080,
    P720,
    P480,
    P360,
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 5] = [
        VideoQuality::Best,
        VideoQuality::P1080,
        VideoQuality::P720,
        VideoQuality::P480,
        VideoQuality::P360,
    ];

    /// Parse quality from string
    pub fn parse(quality_str: &str) -> Result<Self, DomainError> {
        match quality_str.trim().to_lowercase().as_str() {
            "best" => Ok(VideoQuality::Best),
            "1080p" | "1080" => Ok(VideoQuality::P1080),
            "720p" | "720" => Ok(VideoQuality::P720),
            "480p" | "480" => Ok(VideoQuality::P480),
            "360p" | "360" => Ok(VideoQuality::P360),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid quality: {}. Valid qualities: best, 1080p, 720p, 480p, 360p",
                quality_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::Best => "best",
            VideoQuality::P1080 => "1080p",
            VideoQuality::P720 => "720p",
            VideoQuality::P480 => "480p",
            VideoQuality::P360 => "360p",
        }
    }

    /// Maximum frame height, `None` for unrestricted
    pub fn max_height(&self) -> Option<u32> {
        match self {
            VideoQuality::Best => None,
            VideoQuality::P1080 => Some(1080),
            VideoQuality::P720 => Some(720),
            VideoQuality::P480 => Some(480),
            VideoQuality::P360 => Some(360),
        }
    }

    /// yt-dlp `--format` selector for this quality
    pub fn format_selector(&self) -> String {
        match self.max_height() {
            None => "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string(),
            Some(h) => format!(
                "bestvideo[height<={h}][ext=mp4]+bestaudio[ext=m4a]/best[height<={h}]"
            ),
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for VideoQuality {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoQuality> for String {
    fn from(value: VideoQuality) -> Self {
        value.as_str().to_string()
    }
}

/// Burned-in caption look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    #[default]
    Standard,
    Minimal,
    Bold,
    Outline,
}

impl CaptionStyle {
    pub const ALL: [CaptionStyle; 4] = [
        CaptionStyle::Standard,
        CaptionStyle::Minimal,
        CaptionStyle::Bold,
        CaptionStyle::Outline,
    ];

    /// Parse caption style from string
    pub fn parse(style_str: &str) -> Result<Self, DomainError> {
        match style_str.trim().to_lowercase().as_str() {
            "standard" => Ok(CaptionStyle::Standard),
            "minimal" => Ok(CaptionStyle::Minimal),
            "bold" => Ok(CaptionStyle::Bold),
            "outline" => Ok(CaptionStyle::Outline),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid caption style: {}. Valid styles: standard, minimal, bold, outline",
                style_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionStyle::Standard => "standard",
            CaptionStyle::Minimal => "minimal",
            CaptionStyle::Bold => "bold",
            CaptionStyle::Outline => "outline",
        }
    }

    pub fn font_size(&self) -> u32 {
        match self {
            CaptionStyle::Standard => 28,
            CaptionStyle::Minimal => 24,
            CaptionStyle::Bold => 32,
            CaptionStyle::Outline => 30,
        }
    }

    pub fn font(&self) -> &'static str {
        match self {
            CaptionStyle::Minimal => "Helvetica",
            CaptionStyle::Standard | CaptionStyle::Bold | CaptionStyle::Outline => "Arial",
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, CaptionStyle::Bold)
    }

    /// Text colour as ASS `&HBBGGRR` (white or light gray)
    pub fn primary_colour(&self) -> &'static str {
        match self {
            CaptionStyle::Minimal => "&H00D3D3D3",
            _ => "&H00FFFFFF",
        }
    }

    /// Outline width in pixels; zero disables the stroke
    pub fn outline_width(&self) -> u32 {
        match self {
            CaptionStyle::Standard => 1,
            CaptionStyle::Minimal => 0,
            CaptionStyle::Bold => 2,
            CaptionStyle::Outline => 3,
        }
    }

    /// `force_style` argument for FFmpeg's subtitles filter
    pub fn force_style(&self) -> String {
        let mut style = format!(
            "FontName={},FontSize={},PrimaryColour={},Bold={},Outline={},Alignment=2,MarginV=20",
            self.font(),
            self.font_size(),
            self.primary_colour(),
            if self.is_bold() { 1 } else { 0 },
            self.outline_width(),
        );
        if self.outline_width() > 0 {
            style.push_str(",OutlineColour=&H00000000,BorderStyle=1");
        }
        style
    }
}

impl fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How split points are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Scene changes, then silence gaps, then equal cuts
    #[default]
    Auto,
    Scene,
    Silence,
    Equal,
}

impl SplitStrategy {
    /// Parse strategy from string
    pub fn parse(strategy_str: &str) -> Result<Self, DomainError> {
        match strategy_str.trim().to_lowercase().as_str() {
            "auto" => Ok(SplitStrategy::Auto),
            "scene" => Ok(SplitStrategy::Scene),
            "silence" => Ok(SplitStrategy::Silence),
            "equal" => Ok(SplitStrategy::Equal),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid split strategy: {}. Valid strategies: auto, scene, silence, equal",
                strategy_str
            ))),
        }
    }

    pub fn uses_scenes(&self) -> bool {
        matches!(self, SplitStrategy::Auto | SplitStrategy::Scene)
    }

    pub fn uses_silence(&self) -> bool {
        matches!(self, SplitStrategy::Auto | SplitStrategy::Silence)
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitStrategy::Auto => "auto",
            SplitStrategy::Scene => "scene",
            SplitStrategy::Silence => "silence",
            SplitStrategy::Equal => "equal",
        };
        f.write_str(name)
    }
}

/// Metadata reported by the downloader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub duration: f64,
    pub uploader: String,
    pub view_count: u64,
    pub like_count: u64,
    pub description: String,
}

impl VideoInfo {
    pub const DESCRIPTION_LIMIT: usize = 200;

    /// Cut the description down to the first 200 characters
    pub fn truncate_description(description: &str) -> String {
        description.chars().take(Self::DESCRIPTION_LIMIT).collect()
    }
}

/// Result of a download: the merged video plus optional English subtitles
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedVideo {
    pub info: VideoInfo,
    pub video_path: PathBuf,
    pub subtitle_path: Option<PathBuf>,
}

/// Media file information reported by ffprobe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub path: String,
    pub duration: f64,
    pub size: u64,
    pub format: String,
    pub bit_rate: Option<u64>,
    pub video: Option<VideoStreamInfo>,
    pub audio: Option<AudioStreamInfo>,
}

impl MediaInfo {
    /// `WxH` of the first video stream, if any
    pub fn resolution(&self) -> Option<String> {
        self.video
            .as_ref()
            .map(|v| format!("{}x{}", v.width, v.height))
    }
}

/// First video stream of a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// First audio stream of a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub codec: String,
    pub channels: u32,
    pub sample_rate: u32,
}

/// Encoder settings shared by every clip of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub crf: u8,
    pub threads: usize,
    pub audio_bitrate: String,
}

impl EncodeSettings {
    pub const MAX_CRF: u8 = 51;

    /// 75% of the logical cores, clamped to 1..=16
    pub fn optimal_threads() -> usize {
        let cpu_count = num_cpus::get();
        let optimal_threads = (cpu_count as f64 * 0.75).ceil() as usize;
        optimal_threads.clamp(1, 16)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.crf > Self::MAX_CRF {
            return Err(DomainError::BadArgs(format!(
                "CRF value {} exceeds {}",
                self.crf,
                Self::MAX_CRF
            )));
        }
        if self.threads == 0 {
            return Err(DomainError::BadArgs(
                "Thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            threads: Self::optimal_threads(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// One FFmpeg invocation that cuts (and optionally captions) a clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub range: ClipRange,
    pub subtitles: Option<PathBuf>,
    pub caption_style: CaptionStyle,
    pub settings: EncodeSettings,
}

/// A finished clip on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub name: String,
    pub path: String,
    pub duration: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub size_mb: f64,
    pub resolution: Option<String>,
}

impl ClipInfo {
    pub fn new(
        output: &std::path::Path,
        range: &ClipRange,
        size_bytes: u64,
        resolution: Option<String>,
    ) -> Self {
        Self {
            name: output
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            path: output.to_string_lossy().to_string(),
            duration: round2(range.duration().seconds),
            start_time: round2(range.start.seconds),
            end_time: round2(range.end.seconds),
            size_mb: round2(size_bytes as f64 / (1024.0 * 1024.0)),
            resolution,
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Output of splitting one local video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    pub source: String,
    pub source_duration: f64,
    pub strategy_used: SplitStrategy,
    pub clips: Vec<ClipInfo>,
    pub failed_clips: usize,
    pub output_directory: String,
}

impl SplitReport {
    pub fn total_clips(&self) -> usize {
        self.clips.len()
    }
}

/// Output of the full download + split pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub original_video: VideoInfo,
    pub clips: Vec<ClipInfo>,
    pub total_clips: usize,
    pub output_directory: String,
}
