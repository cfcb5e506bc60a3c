// TOML config adapter - Configuration loading from TOML/YAML files and the environment

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Files searched when no explicit `--config` is given
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["ytsplit.toml", "config.yaml"];

/// Prefix of the environment overrides
pub const ENV_PREFIX: &str = "YTSPLIT_";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tools: ToolsConfig,
    pub split: SplitConfig,
    pub encode: EncodeSettings,
    pub download: DownloadConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Paths of the external binaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    #[serde(rename = "yt-dlp", alias = "ytdlp")]
    pub ytdlp: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            ytdlp: "yt-dlp".to_string(),
        }
    }
}

/// Clip length window and split point analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub min_duration: f64,
    pub max_duration: f64,
    pub strategy: SplitStrategy,
    pub scene_threshold: f64,
    pub silence_noise_db: f64,
    pub silence_min_duration: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            min_duration: 30.0,
            max_duration: 60.0,
            strategy: SplitStrategy::Auto,
            scene_threshold: 0.3,
            silence_noise_db: -40.0,
            silence_min_duration: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub quality: VideoQuality,
    pub captions: bool,
    pub caption_style: CaptionStyle,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            quality: VideoQuality::Best,
            captions: true,
            caption_style: CaptionStyle::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub timestamped: bool,
    pub keep_source: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output_clips"),
            timestamped: false,
            keep_source: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the first default file found, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        match Self::locate(path)? {
            Some(found) => Self::from_file(&found),
            None => Ok(Self::default()),
        }
    }

    /// The file `load` would read; `None` means built-in defaults
    pub fn locate(path: Option<&Path>) -> Result<Option<PathBuf>, DomainError> {
        match path {
            Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
            Some(path) => Err(DomainError::Config(format!(
                "Config file does not exist: {}",
                path.display()
            ))),
            None => Ok(DEFAULT_CONFIG_FILES
                .iter()
                .map(PathBuf::from)
                .find(|p| p.is_file())),
        }
    }

    /// Parse a TOML or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse YAML config: {}", e)))
    }

    /// Apply `YTSPLIT_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<usize, DomainError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `YTSPLIT_*` overrides using `lookup`; returns how many were applied
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<usize, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        let mut var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            let value = lookup(&key);
            if value.is_some() {
                applied += 1;
            }
            value.map(|v| (key, v))
        };

        if let Some((_, v)) = var("FFMPEG") {
            self.tools.ffmpeg = v;
        }
        if let Some((_, v)) = var("FFPROBE") {
            self.tools.ffprobe = v;
        }
        if let Some((_, v)) = var("YTDLP") {
            self.tools.ytdlp = v;
        }
        if let Some((k, v)) = var("MIN_DURATION") {
            self.split.min_duration = parse_env(&k, &v)?;
        }
        if let Some((k, v)) = var("MAX_DURATION") {
            self.split.max_duration = parse_env(&k, &v)?;
        }
        if let Some((_, v)) = var("STRATEGY") {
            self.split.strategy = SplitStrategy::parse(&v)?;
        }
        if let Some((_, v)) = var("QUALITY") {
            self.download.quality = VideoQuality::parse(&v)?;
        }
        if let Some((k, v)) = var("CAPTIONS") {
            self.download.captions = parse_env(&k, &v)?;
        }
        if let Some((_, v)) = var("CAPTION_STYLE") {
            self.download.caption_style = CaptionStyle::parse(&v)?;
        }
        if let Some((k, v)) = var("CRF") {
            self.encode.crf = parse_env(&k, &v)?;
        }
        if let Some((_, v)) = var("PRESET") {
            self.encode.preset = v;
        }
        if let Some((k, v)) = var("THREADS") {
            self.encode.threads = parse_env(&k, &v)?;
        }
        if let Some((_, v)) = var("OUTPUT_DIR") {
            self.output.directory = PathBuf::from(v);
        }
        if let Some((_, v)) = var("ADDR") {
            self.server.addr = v;
        }
        if let Some((_, v)) = var("LOG_LEVEL") {
            self.logging.level = v;
        }

        Ok(applied)
    }

    /// Reject inconsistent values
    pub fn validate(&self) -> Result<(), DomainError> {
        DurationWindow::new(self.split.min_duration, self.split.max_duration)?;
        self.encode.validate()?;
        if !(0.0..=1.0).contains(&self.split.scene_threshold) {
            return Err(DomainError::BadArgs(format!(
                "Scene threshold must be between 0 and 1, got {}",
                self.split.scene_threshold
            )));
        }
        if self.split.silence_min_duration <= 0.0 {
            return Err(DomainError::BadArgs(
                "Silence duration must be positive".to_string(),
            ));
        }
        crate::adapters::tracing_log::LogLevel::parse(&self.logging.level)?;
        Ok(())
    }

    /// Clip length window from the split section
    pub fn window(&self) -> Result<DurationWindow, DomainError> {
        DurationWindow::new(self.split.min_duration, self.split.max_duration)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::Config(format!("Invalid value for {}: {}", key, value)))
}
