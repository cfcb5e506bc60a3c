//! FFmpeg execution adapter
//!
//! Content analysis (scene and silence detection) and clip encoding, both
//! driven through the `ffmpeg` binary.

use std::path::Path;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::adapters::command::ToolCommand;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const TOOL: &str = "ffmpeg";

static PTS_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"pts_time:\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("static regex"));
static SILENCE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"silence_start:\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("static regex"));
static SILENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"silence_end:\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("static regex"));

/// FFmpeg-based analysis and encoding adapter
pub struct FFmpegAdapter {
    binary: String,
}

impl FFmpegAdapter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(TOOL, &self.binary).args(["-hide_banner", "-nostdin"])
    }
}

#[async_trait]
impl AnalyzePort for FFmpegAdapter {
    async fn detect_scene_changes(
        &self,
        file_path: &Path,
        threshold: f64,
    ) -> Result<Vec<f64>, DomainError> {
        let filter = format!("select='gt(scene,{})',showinfo", threshold);
        let output = self
            .command()
            .arg("-i")
            .arg(file_path)
            .args(["-an", "-vf", &filter, "-f", "null", "-"])
            .run()
            .await?;

        let cuts = parse_scene_times(&String::from_utf8_lossy(&output.stderr));
        debug!(count = cuts.len(), threshold, "Scene detection finished");
        Ok(cuts)
    }

    async fn detect_silences(
        &self,
        file_path: &Path,
        noise_db: f64,
        min_silence: f64,
    ) -> Result<Vec<(f64, f64)>, DomainError> {
        let filter = format!("silencedetect=noise={}dB:d={}", noise_db, min_silence);
        let output = self
            .command()
            .arg("-i")
            .arg(file_path)
            .args(["-vn", "-af", &filter, "-f", "null", "-"])
            .run()
            .await?;

        let silences = parse_silences(&String::from_utf8_lossy(&output.stderr));
        debug!(count = silences.len(), noise_db, min_silence, "Silence detection finished");
        Ok(silences)
    }
}

#[async_trait]
impl EncodePort for FFmpegAdapter {
    async fn cut_clip(&self, job: &ClipJob) -> Result<(), DomainError> {
        job.settings.validate()?;
        info!(
            output = %job.output.display(),
            start = %job.range.start,
            end = %job.range.end,
            captions = job.subtitles.is_some(),
            "Encoding clip"
        );
        ToolCommand::new(TOOL, &self.binary)
            .args(build_clip_args(job))
            .run()
            .await?;
        Ok(())
    }
}

/// Full argument list for cutting one clip
pub fn build_clip_args(job: &ClipJob) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".into(),
        "-nostdin".into(),
        "-y".into(),
        "-ss".into(),
        format!("{:.3}", job.range.start.seconds),
        "-i".into(),
        job.input.to_string_lossy().to_string(),
        "-t".into(),
        format!("{:.3}", job.range.duration().seconds),
    ];

    if let Some(subtitles) = &job.subtitles {
        args.push("-vf".into());
        args.push(subtitles_filter(subtitles, job.caption_style));
    }

    let settings = &job.settings;
    args.extend([
        "-c:v".to_string(),
        settings.video_codec.clone(),
        "-preset".to_string(),
        settings.preset.clone(),
        "-crf".to_string(),
        settings.crf.to_string(),
        "-c:a".to_string(),
        settings.audio_codec.clone(),
        "-b:a".to_string(),
        settings.audio_bitrate.clone(),
        "-threads".to_string(),
        settings.threads.to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        job.output.to_string_lossy().to_string(),
    ]);
    args
}

/// `subtitles` filter burning `path` with the given style
pub fn subtitles_filter(path: &Path, style: CaptionStyle) -> String {
    format!(
        "subtitles=filename='{}':force_style='{}'",
        escape_filter_path(path),
        style.force_style()
    )
}

/// Escape a path for use inside a quoted filtergraph option
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "'\\''")
}

/// Timestamps reported by `showinfo` after a scene `select`
pub fn parse_scene_times(stderr: &str) -> Vec<f64> {
    stderr
        .lines()
        .filter(|line| line.contains("showinfo"))
        .filter_map(|line| PTS_TIME.captures(line))
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .filter(|t| *t > 0.0)
        .collect()
}

/// Intervals reported by `silencedetect`; an unterminated silence runs to the end
pub fn parse_silences(stderr: &str) -> Vec<(f64, f64)> {
    let mut silences = Vec::new();
    let mut open: Option<f64> = None;
    for line in stderr.lines() {
        if let Some(caps) = SILENCE_START.captures(line) {
            open = caps[1].parse::<f64>().ok().map(|t| t.max(0.0));
        } else if let Some(caps) = SILENCE_END.captures(line) {
            if let (Some(start), Ok(end)) = (open.take(), caps[1].parse::<f64>()) {
                silences.push((start, end));
            }
        }
    }
    if let Some(start) = open {
        silences.push((start, f64::INFINITY));
    }
    silences
}
