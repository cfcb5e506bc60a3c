// Split interactor - Orchestrates cutting one local video into clips

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::SplitOptions;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{plan_boundaries, SplitAnalysis};
use crate::domain::subtitles::{cues_for_clip, parse_srt, render_srt, SubtitleCue};
use crate::ports::*;

/// Request to split a video that is already on disk
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// SRT file for the whole video; ignored unless captions are enabled
    pub subtitles: Option<PathBuf>,
    pub options: SplitOptions,
}

/// Interactor for the split use case
pub struct SplitInteractor {
    probe_port: Arc<dyn ProbePort>,
    analyze_port: Arc<dyn AnalyzePort>,
    encode_port: Arc<dyn EncodePort>,
}

impl SplitInteractor {
    /// Create new split interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        analyze_port: Arc<dyn AnalyzePort>,
        encode_port: Arc<dyn EncodePort>,
    ) -> Self {
        Self {
            probe_port,
            analyze_port,
            encode_port,
        }
    }

    /// Probe, plan and cut; failing clips are skipped
    pub async fn split(&self, request: SplitRequest) -> Result<SplitReport, DomainError> {
        if !request.input.is_file() {
            return Err(DomainError::FileNotFound(request.input.display().to_string()));
        }
        request.options.settings.validate()?;

        let media = self.probe_port.probe(&request.input).await?;
        if media.duration <= 0.0 {
            return Err(DomainError::ParseError(format!(
                "Could not determine duration of {}",
                request.input.display()
            )));
        }
        info!(
            input = %request.input.display(),
            duration = media.duration,
            strategy = %request.options.strategy,
            "Splitting video"
        );

        let analysis = self.analyze(&request.input, &request.options).await;
        let plan = plan_boundaries(
            request.options.strategy,
            &analysis,
            media.duration,
            &request.options.window,
        );
        info!(
            clips = plan.ranges.len(),
            strategy = %plan.strategy,
            "Planned clip boundaries"
        );

        tokio::fs::create_dir_all(&request.output_dir).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create output directory {}: {}",
                request.output_dir.display(),
                e
            ))
        })?;

        let cues = self.load_cues(&request).await;
        let caption_dir = match &cues {
            Some(_) => Some(tempfile::Builder::new().prefix("ytsplit_captions_").tempdir()?),
            None => None,
        };

        let stem = request
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());

        let mut clips = Vec::with_capacity(plan.ranges.len());
        let mut failed_clips = 0;
        let total = plan.ranges.len();
        for (index, range) in plan.ranges.iter().enumerate() {
            let number = index + 1;
            let output = request.output_dir.join(clip_file_name(&stem, number));

            let subtitles = match (&cues, &caption_dir) {
                (Some(cues), Some(dir)) => {
                    write_clip_subtitles(cues, range, dir.path(), number).await
                }
                _ => None,
            };

            let job = ClipJob {
                input: request.input.clone(),
                output: output.clone(),
                range: *range,
                subtitles,
                caption_style: request.options.caption_style,
                settings: request.options.settings.clone(),
            };

            info!("Creating clip {}/{}", number, total);
            match self.cut(&job, media.resolution()).await {
                Ok(clip) => clips.push(clip),
                Err(e) => {
                    warn!(clip = number, error = %e, "Error creating clip, skipping");
                    failed_clips += 1;
                }
            }
        }

        if clips.is_empty() {
            return Err(DomainError::NoClips(request.input.display().to_string()));
        }

        Ok(SplitReport {
            source: request.input.to_string_lossy().to_string(),
            source_duration: media.duration,
            strategy_used: plan.strategy,
            clips,
            failed_clips,
            output_directory: request.output_dir.to_string_lossy().to_string(),
        })
    }

    /// Run the detectors the strategy asks for; detector failures yield no cuts
    async fn analyze(&self, input: &Path, options: &SplitOptions) -> SplitAnalysis {
        let mut analysis = SplitAnalysis::default();

        if options.strategy.uses_scenes() {
            match self
                .analyze_port
                .detect_scene_changes(input, options.analysis.scene_threshold)
                .await
            {
                Ok(cuts) => analysis.scene_cuts = cuts,
                Err(e) => warn!(error = %e, "Scene detection failed"),
            }
        }

        // Auto only needs silences when no scene cut was found
        let need_silence = match options.strategy {
            SplitStrategy::Silence => true,
            SplitStrategy::Auto => analysis.scene_cuts.is_empty(),
            _ => false,
        };
        if need_silence {
            match self
                .analyze_port
                .detect_silences(
                    input,
                    options.analysis.silence_noise_db,
                    options.analysis.silence_min_duration,
                )
                .await
            {
                Ok(silences) => analysis.silences = silences,
                Err(e) => warn!(error = %e, "Silence detection failed"),
            }
        }

        debug!(
            scene_cuts = analysis.scene_cuts.len(),
            silences = analysis.silences.len(),
            "Analysis finished"
        );
        analysis
    }

    async fn load_cues(&self, request: &SplitRequest) -> Option<Vec<SubtitleCue>> {
        if !request.options.captions {
            return None;
        }
        let path = request.subtitles.as_ref()?;
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let cues = parse_srt(&content);
                if cues.is_empty() {
                    warn!(path = %path.display(), "Subtitle file has no cues, captions disabled");
                    None
                } else {
                    Some(cues)
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read subtitles, captions disabled");
                None
            }
        }
    }

    async fn cut(&self, job: &ClipJob, resolution: Option<String>) -> Result<ClipInfo, DomainError> {
        self.encode_port.cut_clip(job).await?;
        let size = tokio::fs::metadata(&job.output).await?.len();
        Ok(ClipInfo::new(&job.output, &job.range, size, resolution))
    }
}

/// `<stem>_clip_<NNN>.mp4`, numbered from 1
pub fn clip_file_name(stem: &str, number: usize) -> String {
    format!("{}_clip_{:03}.mp4", stem, number)
}

/// Write the cues that fall inside `range` as a clip-local SRT; `None` if there are none
async fn write_clip_subtitles(
    cues: &[SubtitleCue],
    range: &ClipRange,
    dir: &Path,
    number: usize,
) -> Option<PathBuf> {
    let clip_cues = cues_for_clip(cues, range.start.seconds, range.duration().seconds);
    if clip_cues.is_empty() {
        return None;
    }
    let path = dir.join(format!("clip_{:03}.srt", number));
    match tokio::fs::write(&path, render_srt(&clip_cues)).await {
        Ok(()) => Some(path),
        Err(e) => {
            warn!(clip = number, error = %e, "Failed to write clip subtitles");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::*;

    fn request(input: PathBuf, output_dir: PathBuf, strategy: SplitStrategy) -> SplitRequest {
        SplitRequest {
            input,
            output_dir,
            subtitles: None,
            options: SplitOptions {
                strategy,
                ..SplitOptions::default()
            },
        }
    }

    #[test]
    fn test_clip_file_name() {
        assert_eq!(clip_file_name("talk", 7), "talk_clip_007.mp4");
        assert_eq!(clip_file_name("talk", 120), "talk_clip_120.mp4");
    }

    #[tokio::test]
    async fn test_split_with_scene_cuts() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "talk.mp4");
        let encoder = Arc::new(MockEncoder::default());
        let interactor = SplitInteractor::new(
            Arc::new(MockProbe::with_duration(180.0)),
            Arc::new(MockAnalyzer::new(vec![25.0, 50.0, 95.0, 140.0], vec![])),
            encoder.clone(),
        );

        let report = interactor
            .split(request(input, dir.path().join("out"), SplitStrategy::Auto))
            .await
            .unwrap();

        assert_eq!(report.strategy_used, SplitStrategy::Scene);
        assert_eq!(report.total_clips(), 4);
        assert_eq!(report.clips[0].name, "talk_clip_001.mp4");
        assert_eq!(report.clips[1].start_time, 50.0);
        assert_eq!(report.clips[3].end_time, 180.0);
        assert_eq!(report.clips[0].resolution.as_deref(), Some("1920x1080"));
        assert_eq!(report.failed_clips, 0);
        assert!(dir.path().join("out/talk_clip_004.mp4").is_file());
    }

    #[tokio::test]
    async fn test_auto_falls_back_to_silence_then_equal() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "talk.mp4");

        let analyzer = Arc::new(MockAnalyzer::new(vec![], vec![(40.0, 42.0), (85.0, 86.0)]));
        let interactor = SplitInteractor::new(
            Arc::new(MockProbe::with_duration(120.0)),
            analyzer.clone(),
            Arc::new(MockEncoder::default()),
        );
        let report = interactor
            .split(request(input.clone(), dir.path().join("a"), SplitStrategy::Auto))
            .await
            .unwrap();
        assert_eq!(report.strategy_used, SplitStrategy::Silence);
        assert_eq!(analyzer.silence_calls(), 1);

        let interactor = SplitInteractor::new(
            Arc::new(MockProbe::with_duration(120.0)),
            Arc::new(MockAnalyzer::failing()),
            Arc::new(MockEncoder::default()),
        );
        let report = interactor
            .split(request(input, dir.path().join("b"), SplitStrategy::Auto))
            .await
            .unwrap();
        assert_eq!(report.strategy_used, SplitStrategy::Equal);
        assert_eq!(report.total_clips(), 2);
    }

    #[tokio::test]
    async fn test_equal_strategy_skips_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "talk.mp4");
        let analyzer = Arc::new(MockAnalyzer::new(vec![10.0], vec![(1.0, 2.0)]));
        let interactor = SplitInteractor::new(
            Arc::new(MockProbe::with_duration(150.0)),
            analyzer.clone(),
            Arc::new(MockEncoder::default()),
        );

        let report = interactor
            .split(request(input, dir.path().join("out"), SplitStrategy::Equal))
            .await
            .unwrap();
        assert_eq!(report.strategy_used, SplitStrategy::Equal);
        assert_eq!(analyzer.scene_calls(), 0);
        assert_eq!(analyzer.silence_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_clip_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "talk.mp4");
        let interactor = SplitInteractor::new(
            Arc::new(MockProbe::with_duration(180.0)),
            Arc::new(MockAnalyzer::new(vec![], vec![])),
            Arc::new(MockEncoder::failing_on(&[2])),
        );

        let report = interactor
            .split(request(input, dir.path().join("out"), SplitStrategy::Equal))
            .await
            .unwrap();
        assert_eq!(report.total_clips(), 2);
        assert_eq!(report.failed_clips, 1);
        assert_eq!(report.clips[1].name, "talk_clip_003.mp4");
    }

    #[tokio::test]
    async fn test_all_clips_failing_is_no_clips() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "talk.mp4");
        let interactor = SplitInteractor::new(
            Arc::new(MockProbe::with_duration(90.0)),
            Arc::new(MockAnalyzer::new(vec![], vec![])),
            Arc::new(MockEncoder::failing_on(&[1, 2])),
        );

        let err = interactor
            .split(request(input, dir.path().join("out"), SplitStrategy::Equal))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NoClips(_)));
    }

    #[tokio::test]
    async fn test_missing_input_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let interactor = SplitInteractor::new(
            Arc::new(MockProbe::with_duration(90.0)),
            Arc::new(MockAnalyzer::new(vec![], vec![])),
            Arc::new(MockEncoder::default()),
        );
        let err = interactor
            .split(request(
                dir.path().join("missing.mp4"),
                dir.path().join("out"),
                SplitStrategy::Auto,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_captions_are_written_per_clip() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "talk.mp4");
        let srt = dir.path().join("talk.en.srt");
        std::fs::write(
            &srt,
            "1\n00:00:05,000 --> 00:00:07,000\nIntro\n\n2\n00:01:10,000 --> 00:01:12,500\nLater\n",
        )
        .unwrap();

        let encoder = Arc::new(MockEncoder::default());
        let interactor = SplitInteractor::new(
            Arc::new(MockProbe::with_duration(180.0)),
            Arc::new(MockAnalyzer::new(vec![], vec![])),
            encoder.clone(),
        );
        let mut req = request(input, dir.path().join("out"), SplitStrategy::Equal);
        req.subtitles = Some(srt);
        interactor.split(req).await.unwrap();

        let captions = encoder.captions();
        assert_eq!(captions.len(), 3);
        assert_eq!(
            captions[0].as_deref(),
            Some("1\n00:00:05,000 --> 00:00:07,000\nIntro\n\n")
        );
        assert_eq!(
            captions[1].as_deref(),
            Some("1\n00:00:10,000 --> 00:00:12,500\nLater\n\n")
        );
        assert_eq!(captions[2], None);
    }
}
