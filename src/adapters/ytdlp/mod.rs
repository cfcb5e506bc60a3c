//! yt-dlp download adapter
//!
//! Metadata comes from `yt-dlp -J`; the download itself is streamed so that
//! progress lines can be surfaced through tracing.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::adapters::command::{spawn_error, ToolCommand};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const TOOL: &str = "yt-dlp";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Subtitle languages requested, in lookup order
pub const SUBTITLE_LANGS: [&str; 3] = ["en", "en-US", "en-GB"];

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "webm", "mov", "flv"];

/// yt-dlp backed downloader
pub struct YtDlpAdapter {
    binary: String,
    ffmpeg_location: Option<String>,
}

/// Subset of the `yt-dlp -J` payload we care about
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    view_count: Option<u64>,
    #[serde(default)]
    like_count: Option<u64>,
    #[serde(default)]
    description: Option<String>,
}

impl From<YtDlpInfo> for VideoInfo {
    fn from(raw: YtDlpInfo) -> Self {
        VideoInfo {
            id: raw.id,
            title: raw.title.unwrap_or_else(|| "YouTube video".to_string()),
            duration: raw.duration.unwrap_or(0.0),
            uploader: raw.uploader.unwrap_or_default(),
            view_count: raw.view_count.unwrap_or(0),
            like_count: raw.like_count.unwrap_or(0),
            description: VideoInfo::truncate_description(
                raw.description.as_deref().unwrap_or_default(),
            ),
        }
    }
}

impl YtDlpAdapter {
    /// `ffmpeg_location` is passed through when ffmpeg is not the PATH default
    pub fn new(binary: impl Into<String>, ffmpeg_binary: &str) -> Self {
        let ffmpeg_location = if ffmpeg_binary == "ffmpeg" {
            None
        } else {
            Some(ffmpeg_binary.to_string())
        };
        Self {
            binary: binary.into(),
            ffmpeg_location,
        }
    }

    /// Arguments for the download invocation
    pub fn download_args(
        &self,
        url: &str,
        quality: VideoQuality,
        with_subtitles: bool,
        dest_dir: &Path,
    ) -> Vec<String> {
        let template = dest_dir.join("%(title).100B.%(ext)s");
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--newline".to_string(),
            // --print implies --quiet, which would hide the progress lines
            "--progress".to_string(),
            "--restrict-filenames".to_string(),
            "--format".to_string(),
            quality.format_selector(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "--remux-video".to_string(),
            "mp4".to_string(),
            "--user-agent".to_string(),
            USER_AGENT.to_string(),
            "--output".to_string(),
            template.to_string_lossy().to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--no-simulate".to_string(),
        ];
        if with_subtitles {
            args.extend(
                [
                    "--write-subs",
                    "--write-auto-subs",
                    "--sub-langs",
                    &SUBTITLE_LANGS.join(","),
                    "--convert-subs",
                    "srt",
                ]
                .iter()
                .map(|s| s.to_string()),
            );
        }
        if let Some(location) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(location.clone());
        }
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl DownloadPort for YtDlpAdapter {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, DomainError> {
        let output = ToolCommand::new(TOOL, &self.binary)
            .args(["-J", "--skip-download", "--no-playlist", "--no-warnings", url])
            .run()
            .await?;
        parse_info(&output.stdout)
    }

    async fn download(
        &self,
        url: &str,
        quality: VideoQuality,
        with_subtitles: bool,
        dest_dir: &Path,
    ) -> Result<DownloadedVideo, DomainError> {
        let info = self.fetch_info(url).await?;
        info!(title = %info.title, duration = info.duration, %quality, "Downloading video");

        let args = self.download_args(url, quality, with_subtitles, dest_dir);
        let (tool, mut command) = ToolCommand::new(TOOL, &self.binary).args(args).into_inner();
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        let mut child = command.spawn().map_err(|e| spawn_error(&tool, e))?;

        let mut stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(stderr) = stderr.as_mut() {
                let _ = stderr.read_to_string(&mut buf).await;
            }
            buf
        });

        let mut printed_path: Option<PathBuf> = None;
        let mut last_reported = -10.0;
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                if let Some(percent) = parse_progress_line(&line) {
                    if percent - last_reported >= 10.0 || percent >= 100.0 {
                        info!("Downloading: {:.1}%", percent);
                        last_reported = percent;
                    }
                } else if !line.starts_with('[') && Path::new(line.trim()).is_file() {
                    printed_path = Some(PathBuf::from(line.trim()));
                } else {
                    debug!(target: "ytdlp", "{}", line);
                }
            }
        }

        let status = child.wait().await?;
        let stderr = stderr_task.await.unwrap_or_default();
        if !status.success() {
            return Err(DomainError::tool_failed(TOOL, &stderr));
        }

        let video_path = match printed_path {
            Some(path) => path,
            None => find_video_file(dest_dir).ok_or_else(|| {
                DomainError::FileNotFound(format!(
                    "downloaded video in {}",
                    dest_dir.display()
                ))
            })?,
        };
        let subtitle_path = if with_subtitles {
            find_subtitle_file(&video_path)
        } else {
            None
        };
        if with_subtitles && subtitle_path.is_none() {
            info!("No English subtitles available for this video");
        }

        Ok(DownloadedVideo {
            info,
            video_path,
            subtitle_path,
        })
    }
}

fn parse_info(stdout: &[u8]) -> Result<VideoInfo, DomainError> {
    let raw: YtDlpInfo = serde_json::from_slice(stdout)
        .map_err(|e| DomainError::ParseError(format!("yt-dlp metadata: {}", e)))?;
    Ok(raw.into())
}

/// Percentage from a `[download]  42.5% of ...` line
pub fn parse_progress_line(line: &str) -> Option<f64> {
    let rest = line.trim_start().strip_prefix("[download]")?;
    let token = rest.split_whitespace().next()?;
    token.strip_suffix('%')?.parse().ok()
}

/// Largest video file under `dir`
pub fn find_video_file(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .max_by_key(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .map(|e| e.into_path())
}

/// `<stem>.en.srt`, then `.en-US.srt`, then `.en-GB.srt` beside the video
pub fn find_subtitle_file(video_path: &Path) -> Option<PathBuf> {
    let stem = video_path.with_extension("");
    SUBTITLE_LANGS
        .iter()
        .map(|lang| PathBuf::from(format!("{}.{}.srt", stem.display(), lang)))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info_truncates_description() {
        let payload = format!(
            r#"{{"id":"dQw4w9WgXcQ","title":"Song","duration":212.0,"uploader":"Rick","view_count":10,"description":"{}"}}"#,
            "d".repeat(300)
        );
        let info = parse_info(payload.as_bytes()).unwrap();
        assert_eq!(info.id, "dQw4w9WgXcQ");
        assert_eq!(info.duration, 212.0);
        assert_eq!(info.like_count, 0);
        assert_eq!(info.description.len(), 200);
    }

    #[test]
    fn test_parse_info_rejects_garbage() {
        assert!(matches!(
            parse_info(b"not json"),
            Err(DomainError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_progress_line() {
        assert_eq!(
            parse_progress_line("[download]  42.5% of ~ 10.00MiB at 1.00MiB/s ETA 00:05"),
            Some(42.5)
        );
        assert_eq!(parse_progress_line("[download] Destination: a.mp4"), None);
        assert_eq!(parse_progress_line("[youtube] abc: Downloading"), None);
    }

    #[test]
    fn test_download_args_include_subtitles_and_selector() {
        let adapter = YtDlpAdapter::new("yt-dlp", "/opt/ffmpeg/bin/ffmpeg");
        let args = adapter.download_args(
            "https://youtu.be/dQw4w9WgXcQ",
            VideoQuality::P720,
            true,
            Path::new("/tmp/work"),
        );
        assert!(args.contains(&VideoQuality::P720.format_selector()));
        assert!(args.contains(&"en,en-US,en-GB".to_string()));
        assert!(args.contains(&"--ffmpeg-location".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/dQw4w9WgXcQ");

        let plain = YtDlpAdapter::new("yt-dlp", "ffmpeg");
        let args = plain.download_args("u", VideoQuality::Best, false, Path::new("/tmp"));
        assert!(!args.contains(&"--write-subs".to_string()));
        assert!(!args.contains(&"--ffmpeg-location".to_string()));
    }

    #[test]
    fn test_download_args_keep_progress_with_print() {
        let adapter = YtDlpAdapter::new("yt-dlp", "ffmpeg");
        let args = adapter.download_args("u", VideoQuality::Best, false, Path::new("/tmp"));
        assert!(args.contains(&"--print".to_string()));
        assert!(args.contains(&"--progress".to_string()));
        assert!(args.contains(&"--newline".to_string()));
    }

    #[test]
    fn test_find_video_and_subtitle_files() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("My_Video.mp4");
        std::fs::write(&video, vec![0u8; 64]).unwrap();
        std::fs::write(dir.path().join("thumb.jpg"), vec![0u8; 128]).unwrap();
        std::fs::write(dir.path().join("My_Video.en-US.srt"), "1\n").unwrap();

        assert_eq!(find_video_file(dir.path()), Some(video.clone()));
        assert_eq!(
            find_subtitle_file(&video),
            Some(dir.path().join("My_Video.en-US.srt"))
        );

        std::fs::write(dir.path().join("My_Video.en.srt"), "1\n").unwrap();
        assert_eq!(
            find_subtitle_file(&video),
            Some(dir.path().join("My_Video.en.srt"))
        );
    }
}
