//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgGroup, Args};
use clap_num::number_range;

use crate::adapters::toml_config::AppConfig;
use crate::domain::errors::DomainError;
use crate::domain::model::*;

fn crf_range(s: &str) -> Result<u8, String> {
    number_range(s, 0, 51)
}

/// Clip length as seconds or `MM:SS`, within the allowed window bounds
fn clip_length(s: &str) -> Result<f64, String> {
    let seconds = TimeSpec::parse(s).map_err(|e| e.to_string())?.as_seconds();
    if !(MIN_CLIP_SECONDS..=MAX_CLIP_SECONDS).contains(&seconds) {
        return Err(format!(
            "must be between {} and {} seconds",
            MIN_CLIP_SECONDS, MAX_CLIP_SECONDS
        ));
    }
    Ok(seconds)
}

fn jobs_range(s: &str) -> Result<usize, String> {
    number_range(s, 1, 16)
}

/// Options shared by `split` and `batch`
#[derive(Args, Debug, Default)]
pub struct SplitFlags {
    /// Minimum clip duration (seconds or MM:SS)
    #[arg(long, value_parser = clip_length)]
    pub min: Option<f64>,

    /// Maximum clip duration (seconds or MM:SS)
    #[arg(long, value_parser = clip_length)]
    pub max: Option<f64>,

    /// Download quality (best, 1080p, 720p, 480p, 360p)
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Do not burn in captions
    #[arg(long)]
    pub no_captions: bool,

    /// Caption style (standard, minimal, bold, outline)
    #[arg(long)]
    pub caption_style: Option<String>,

    /// Split point strategy (auto, scene, silence, equal)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Output directory for clips
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write clips into a timestamped sub-directory
    #[arg(long)]
    pub timestamped: bool,

    /// Keep the downloaded source video next to the clips
    #[arg(long)]
    pub keep_source: bool,

    /// Constant Rate Factor (0-51)
    #[arg(long, value_parser = crf_range)]
    pub crf: Option<u8>,

    /// Encoding preset
    #[arg(long)]
    pub preset: Option<String>,

    /// Encoder threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl SplitFlags {
    /// Layer the flags that were given over `config`
    pub fn apply(&self, config: &mut AppConfig) -> Result<(), DomainError> {
        if let Some(min) = self.min {
            config.split.min_duration = min;
        }
        if let Some(max) = self.max {
            config.split.max_duration = max;
        }
        if let Some(quality) = &self.quality {
            config.download.quality = VideoQuality::parse(quality)?;
        }
        if self.no_captions {
            config.download.captions = false;
        }
        if let Some(style) = &self.caption_style {
            config.download.caption_style = CaptionStyle::parse(style)?;
        }
        if let Some(strategy) = &self.strategy {
            config.split.strategy = SplitStrategy::parse(strategy)?;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.timestamped {
            config.output.timestamped = true;
        }
        if self.keep_source {
            config.output.keep_source = true;
        }
        if let Some(crf) = self.crf {
            config.encode.crf = crf;
        }
        if let Some(preset) = &self.preset {
            config.encode.preset = preset.clone();
        }
        if let Some(threads) = self.threads {
            config.encode.threads = threads;
        }
        Ok(())
    }
}

/// Arguments for the split command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "input"])))]
pub struct SplitArgs {
    /// YouTube video URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Local video file instead of a download
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// SRT file to caption a local input with
    #[arg(long, requires = "input")]
    pub subtitles: Option<PathBuf>,

    #[command(flatten)]
    pub flags: SplitFlags,
}

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File with one URL per line
    #[arg(short, long)]
    pub file: PathBuf,

    /// Videos processed concurrently
    #[arg(short, long, default_value = "1", value_parser = jobs_range)]
    pub jobs: usize,

    #[command(flatten)]
    pub flags: SplitFlags,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (HOST:PORT)
    #[arg(long)]
    pub addr: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_split_requires_a_source() {
        assert!(Cli::try_parse_from(["ytsplit", "split"]).is_err());
        assert!(Cli::try_parse_from([
            "ytsplit", "split", "--url", "https://youtu.be/dQw4w9WgXcQ", "--input", "a.mp4"
        ])
        .is_err());
    }

    #[test]
    fn test_split_flags_parse_and_apply() {
        let cli = Cli::try_parse_from([
            "ytsplit",
            "--log-level",
            "debug",
            "split",
            "--url",
            "https://youtu.be/dQw4w9WgXcQ",
            "--min",
            "20",
            "--max",
            "40",
            "--quality",
            "720p",
            "--no-captions",
            "--crf",
            "28",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));

        let Commands::Split(args) = cli.command else {
            panic!("expected split");
        };
        let mut config = AppConfig::default();
        args.flags.apply(&mut config).unwrap();
        assert_eq!(config.split.min_duration, 20.0);
        assert_eq!(config.split.max_duration, 40.0);
        assert_eq!(config.download.quality, VideoQuality::P720);
        assert!(!config.download.captions);
        assert_eq!(config.encode.crf, 28);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(Cli::try_parse_from([
            "ytsplit", "split", "--input", "a.mp4", "--crf", "52"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "ytsplit", "split", "--input", "a.mp4", "--min", "0"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["ytsplit", "batch", "--file", "u.txt", "--jobs", "0"]).is_err());
        assert!(Cli::try_parse_from([
            "ytsplit", "split", "--input", "a.mp4", "--max", "75:30"
        ])
        .is_err());
    }

    #[test]
    fn test_clip_length_accepts_minutes_and_seconds() {
        assert_eq!(clip_length("45").unwrap(), 45.0);
        assert_eq!(clip_length("1:30").unwrap(), 90.0);
        assert_eq!(clip_length("0.5").unwrap_err(), "must be between 1 and 3600 seconds");
        assert!(clip_length("1:00:01").is_err());
    }

    #[test]
    fn test_unknown_style_fails_on_apply() {
        let flags = SplitFlags {
            caption_style: Some("neon".to_string()),
            ..SplitFlags::default()
        };
        assert!(flags.apply(&mut AppConfig::default()).is_err());
    }
}
