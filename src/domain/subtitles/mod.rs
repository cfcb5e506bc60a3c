//! SubRip (.srt) parsing and per-clip cue windows

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A single timed caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Parse an SRT document, skipping blocks that do not have a timing line
pub fn parse_srt(content: &str) -> Vec<SubtitleCue> {
    let normalized = content.replace("\r\n", "\n");
    normalized
        .trim()
        .split("\n\n")
        .filter_map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Option<SubtitleCue> {
    let lines: Vec<&str> = block.trim().lines().collect();
    if lines.len() < 3 {
        return None;
    }

    let (start, end) = lines[1].split_once(" --> ")?;
    let text = lines[2..]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Some(SubtitleCue {
        start: parse_srt_timestamp(start),
        end: parse_srt_timestamp(end),
        text,
    })
}

/// Convert `HH:MM:SS,mmm` to seconds; anything unparseable becomes 0.0
pub fn parse_srt_timestamp(stamp: &str) -> f64 {
    fn inner(stamp: &str) -> Option<f64> {
        let mut parts = stamp.trim().splitn(3, ':');
        let hours: u64 = parts.next()?.parse().ok()?;
        let minutes: u64 = parts.next()?.parse().ok()?;
        let (secs, millis) = parts.next()?.split_once([',', '.'])?;
        let secs: u64 = secs.parse().ok()?;
        let millis: u64 = millis.parse().ok()?;
        Some((hours * 3600 + minutes * 60 + secs) as f64 + millis as f64 / 1000.0)
    }
    inner(stamp).unwrap_or(0.0)
}

/// Format seconds as `HH:MM:SS,mmm`
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        total_ms / 3_600_000,
        (total_ms % 3_600_000) / 60_000,
        (total_ms % 60_000) / 1000,
        total_ms % 1000
    )
}

/// Cues overlapping `[clip_start, clip_start + clip_duration)`, shifted to clip time
pub fn cues_for_clip(cues: &[SubtitleCue], clip_start: f64, clip_duration: f64) -> Vec<SubtitleCue> {
    let clip_end = clip_start + clip_duration;
    cues.iter()
        .filter(|cue| cue.end > clip_start && cue.start < clip_end)
        .map(|cue| SubtitleCue {
            start: (cue.start - clip_start).max(0.0),
            end: (cue.end - clip_start).min(clip_duration),
            text: cue.text.clone(),
        })
        .filter(|cue| cue.end > cue.start)
        .collect()
}

/// Render cues back to SRT with fresh 1-based indices
pub fn render_srt(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_timestamp(cue.start),
            format_srt_timestamp(cue.end),
            cue.text
        );
    }
    out
}
