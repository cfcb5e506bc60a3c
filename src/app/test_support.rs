// Mock ports shared by the interactor tests

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Create an empty file named `name` in `dir`
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"video").unwrap();
    path
}

pub struct MockProbe {
    duration: f64,
}

impl MockProbe {
    pub fn with_duration(duration: f64) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl ProbePort for MockProbe {
    async fn probe(&self, file_path: &Path) -> Result<MediaInfo, DomainError> {
        Ok(MediaInfo {
            path: file_path.to_string_lossy().to_string(),
            duration: self.duration,
            size: 5,
            format: "mov,mp4".to_string(),
            bit_rate: None,
            video: Some(VideoStreamInfo {
                codec: "h264".to_string(),
                width: 1920,
                height: 1080,
                fps: 30.0,
            }),
            audio: None,
        })
    }
}

pub struct MockAnalyzer {
    scene_cuts: Option<Vec<f64>>,
    silences: Option<Vec<(f64, f64)>>,
    scene_calls: AtomicUsize,
    silence_calls: AtomicUsize,
}

impl MockAnalyzer {
    pub fn new(scene_cuts: Vec<f64>, silences: Vec<(f64, f64)>) -> Self {
        Self {
            scene_cuts: Some(scene_cuts),
            silences: Some(silences),
            scene_calls: AtomicUsize::new(0),
            silence_calls: AtomicUsize::new(0),
        }
    }

    /// Both detectors return errors
    pub fn failing() -> Self {
        Self {
            scene_cuts: None,
            silences: None,
            scene_calls: AtomicUsize::new(0),
            silence_calls: AtomicUsize::new(0),
        }
    }

    pub fn scene_calls(&self) -> usize {
        self.scene_calls.load(Ordering::SeqCst)
    }

    pub fn silence_calls(&self) -> usize {
        self.silence_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyzePort for MockAnalyzer {
    async fn detect_scene_changes(&self, _: &Path, _: f64) -> Result<Vec<f64>, DomainError> {
        self.scene_calls.fetch_add(1, Ordering::SeqCst);
        self.scene_cuts
            .clone()
            .ok_or_else(|| DomainError::tool_failed("ffmpeg", "scene filter failed"))
    }

    async fn detect_silences(
        &self,
        _: &Path,
        _: f64,
        _: f64,
    ) -> Result<Vec<(f64, f64)>, DomainError> {
        self.silence_calls.fetch_add(1, Ordering::SeqCst);
        self.silences
            .clone()
            .ok_or_else(|| DomainError::tool_failed("ffmpeg", "silencedetect failed"))
    }
}

/// Writes a small output file per clip and records the burned captions
#[derive(Default)]
pub struct MockEncoder {
    fail_on: Vec<usize>,
    calls: AtomicUsize,
    captions: Mutex<Vec<Option<String>>>,
}

impl MockEncoder {
    /// Fail the listed 1-based clip numbers
    pub fn failing_on(clips: &[usize]) -> Self {
        Self {
            fail_on: clips.to_vec(),
            ..Self::default()
        }
    }

    pub fn captions(&self) -> Vec<Option<String>> {
        self.captions.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncodePort for MockEncoder {
    async fn cut_clip(&self, job: &ClipJob) -> Result<(), DomainError> {
        let number = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let caption = job
            .subtitles
            .as_ref()
            .map(|p| std::fs::read_to_string(p).unwrap());
        self.captions.lock().unwrap().push(caption);

        if self.fail_on.contains(&number) {
            return Err(DomainError::tool_failed("ffmpeg", "Conversion failed!"));
        }
        std::fs::write(&job.output, vec![0u8; 1024]).unwrap();
        Ok(())
    }
}

/// Downloads by writing a fake video (and optional subtitles) into the destination
pub struct MockDownloader {
    pub with_subtitles: bool,
    pub fail_for: Vec<String>,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self {
            with_subtitles: false,
            fail_for: Vec::new(),
        }
    }

    fn info(url: &str) -> VideoInfo {
        VideoInfo {
            id: crate::domain::url::video_id(url).unwrap_or_default(),
            title: "Sample".to_string(),
            duration: 120.0,
            uploader: "Tester".to_string(),
            ..VideoInfo::default()
        }
    }
}

#[async_trait]
impl DownloadPort for MockDownloader {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, DomainError> {
        Ok(Self::info(url))
    }

    async fn download(
        &self,
        url: &str,
        _quality: VideoQuality,
        with_subtitles: bool,
        dest_dir: &Path,
    ) -> Result<DownloadedVideo, DomainError> {
        if self.fail_for.iter().any(|u| u == url) {
            return Err(DomainError::tool_failed("yt-dlp", "ERROR: Video unavailable"));
        }
        let video_path = touch(dest_dir, "Sample.mp4");
        let subtitle_path = (with_subtitles && self.with_subtitles).then(|| {
            let path = dest_dir.join("Sample.en.srt");
            std::fs::write(&path, "1\n00:00:01,000 --> 00:00:02,000\nHi\n").unwrap();
            path
        });
        Ok(DownloadedVideo {
            info: Self::info(url),
            video_path,
            subtitle_path,
        })
    }
}
