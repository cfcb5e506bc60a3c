//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe -print_format json` and keeps the first video and audio
//! stream of the container.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::adapters::command::ToolCommand;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const TOOL: &str = "ffprobe";

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    binary: String,
}

impl FFprobeAdapter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    format_name: String,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: String,
    #[serde(default)]
    codec_name: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    r_frame_rate: Option<String>,
    #[serde(default)]
    channels: Option<u32>,
    #[serde(default)]
    sample_rate: Option<String>,
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, file_path: &Path) -> Result<MediaInfo, DomainError> {
        if !file_path.is_file() {
            return Err(DomainError::FileNotFound(file_path.display().to_string()));
        }

        let output = ToolCommand::new(TOOL, &self.binary)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(file_path)
            .run()
            .await?;

        let mut info = parse_probe_output(file_path, &String::from_utf8_lossy(&output.stdout))?;
        if info.size == 0 {
            info.size = tokio::fs::metadata(file_path).await?.len();
        }
        Ok(info)
    }
}

/// Build a `MediaInfo` from ffprobe's JSON report
pub fn parse_probe_output(path: &Path, json: &str) -> Result<MediaInfo, DomainError> {
    let raw: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| DomainError::ParseError(format!("ffprobe output: {}", e)))?;
    let format = raw
        .format
        .ok_or_else(|| DomainError::ParseError("ffprobe reported no format section".to_string()))?;

    let video = raw
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .map(|s| VideoStreamInfo {
            codec: s.codec_name.clone(),
            width: s.width.unwrap_or(0),
            height: s.height.unwrap_or(0),
            fps: s.r_frame_rate.as_deref().map(parse_frame_rate).unwrap_or(0.0),
        });
    let audio = raw
        .streams
        .iter()
        .find(|s| s.codec_type == "audio")
        .map(|s| AudioStreamInfo {
            codec: s.codec_name.clone(),
            channels: s.channels.unwrap_or(0),
            sample_rate: s
                .sample_rate
                .as_deref()
                .and_then(|r| r.parse().ok())
                .unwrap_or(0),
        });

    Ok(MediaInfo {
        path: path.to_string_lossy().to_string(),
        duration: format
            .duration
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or(0.0),
        size: format.size.as_deref().and_then(|s| s.parse().ok()).unwrap_or(0),
        format: format.format_name,
        bit_rate: format.bit_rate.as_deref().and_then(|b| b.parse().ok()),
        video,
        audio,
    })
}

/// `30000/1001` style rational to frames per second
pub fn parse_frame_rate(rate: &str) -> f64 {
    match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().unwrap_or(0.0);
            let den: f64 = den.trim().parse().unwrap_or(0.0);
            if den == 0.0 {
                0.0
            } else {
                round2(num / den)
            }
        }
        None => rate.trim().parse().unwrap_or(0.0),
    }
}
