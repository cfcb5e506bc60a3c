// Batch interactor - Run the pipeline for many URLs with bounded concurrency

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{error, info};

use super::process_interactor::{ProcessInteractor, ProcessRequest};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::url::video_id;

/// URLs plus the request every URL is processed with
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub urls: Vec<String>,
    /// Maximum number of pipelines running at once
    pub jobs: usize,
    /// `url` is replaced per item; `output_dir` is the batch root
    pub template: ProcessRequest,
}

/// Outcome of one URL
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub url: String,
    pub output_directory: String,
    pub report: Option<ProcessReport>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct BatchInteractor {
    process_interactor: Arc<ProcessInteractor>,
}

impl BatchInteractor {
    pub fn new(process_interactor: Arc<ProcessInteractor>) -> Self {
        Self { process_interactor }
    }

    /// Process every URL; one failure never aborts the others
    pub async fn run(&self, request: BatchRequest) -> Result<BatchReport, DomainError> {
        if request.urls.is_empty() {
            return Err(DomainError::BadArgs("No URLs to process".to_string()));
        }
        let jobs = request.jobs.max(1);
        let semaphore = Arc::new(Semaphore::new(jobs));
        let total = request.urls.len();
        info!(total, jobs, "Starting batch");

        let output_dirs = assign_output_dirs(&request.template.output_dir, &request.urls);
        let mut handles = Vec::with_capacity(total);
        let mut targets = Vec::with_capacity(total);
        for (index, (url, output_dir)) in request.urls.iter().zip(output_dirs).enumerate() {
            let url = url.trim().to_string();
            let item_request = ProcessRequest {
                url: url.clone(),
                output_dir: output_dir.clone(),
                ..request.template.clone()
            };
            targets.push((url.clone(), output_dir.clone()));
            let interactor = Arc::clone(&self.process_interactor);
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                info!("Processing video {}/{}: {}", index + 1, total, url);
                interactor.process(item_request).await
            }));
        }

        let mut items = Vec::with_capacity(total);
        for (handle, (url, output_dir)) in handles.into_iter().zip(targets) {
            let result = handle.await.unwrap_or_else(|e| {
                Err(DomainError::ToolFailed {
                    tool: "batch".to_string(),
                    message: format!("task aborted: {}", e),
                })
            });
            let output_directory = output_dir.to_string_lossy().to_string();
            match result {
                Ok(report) => items.push(BatchItem {
                    url,
                    output_directory,
                    report: Some(report),
                    error: None,
                }),
                Err(e) => {
                    error!(%url, error = %e, "Failed to process video");
                    items.push(BatchItem {
                        url,
                        output_directory,
                        report: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let succeeded = items.iter().filter(|i| i.report.is_some()).count();
        let failed = items.len() - succeeded;
        info!(succeeded, failed, "Batch finished");
        Ok(BatchReport {
            items,
            succeeded,
            failed,
        })
    }
}

/// `<root>/<video id>`, or `<root>/video_NNN` when no id can be extracted
pub fn item_output_dir(root: &Path, url: &str, number: usize) -> PathBuf {
    match video_id(url.trim()) {
        Some(id) => root.join(id),
        None => root.join(format!("video_{:03}", number)),
    }
}

/// One distinct directory per URL; repeats of a video get `_2`, `_3`, ...
pub fn assign_output_dirs(root: &Path, urls: &[String]) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    urls.iter()
        .enumerate()
        .map(|(index, url)| {
            let base = item_output_dir(root, url, index + 1);
            let mut dir = base.clone();
            let mut copy = 2;
            while !taken.insert(dir.clone()) {
                dir = PathBuf::from(format!("{}_{}", base.display(), copy));
                copy += 1;
            }
            dir
        })
        .collect()
}

/// One URL per line; blank lines and `#` comments are ignored
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::split_interactor::SplitInteractor;
    use crate::app::test_support::*;
    use crate::app::SplitOptions;

    const GOOD: &str = "https://youtu.be/dQw4w9WgXcQ";
    const BROKEN: &str = "https://www.youtube.com/watch?v=aaaaaaaaaaa";

    fn batch(downloader: MockDownloader) -> BatchInteractor {
        let split = Arc::new(SplitInteractor::new(
            Arc::new(MockProbe::with_duration(60.0)),
            Arc::new(MockAnalyzer::new(vec![], vec![])),
            Arc::new(MockEncoder::default()),
        ));
        BatchInteractor::new(Arc::new(ProcessInteractor::new(Arc::new(downloader), split)))
    }

    fn request(root: &Path, urls: &[&str], jobs: usize) -> BatchRequest {
        BatchRequest {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            jobs,
            template: ProcessRequest {
                url: String::new(),
                quality: VideoQuality::Best,
                output_dir: root.to_path_buf(),
                timestamped: false,
                keep_source: false,
                options: SplitOptions::default(),
            },
        }
    }

    #[tokio::test]
    async fn test_batch_records_failures_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        let mut downloader = MockDownloader::new();
        downloader.fail_for.push(BROKEN.to_string());

        let report = batch(downloader)
            .run(request(dir.path(), &[BROKEN, GOOD, "not a url"], 2))
            .await
            .unwrap();

        assert_eq!(report.items.len(), 3);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.items[0].url, BROKEN);
        assert!(report.items[0].error.as_deref().unwrap().contains("Video unavailable"));
        assert_eq!(report.items[1].report.as_ref().unwrap().total_clips, 1);
        assert!(dir.path().join("dQw4w9WgXcQ/Sample_clip_001.mp4").is_file());
        assert!(report.items[2].error.as_deref().unwrap().contains("Invalid YouTube URL"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = batch(MockDownloader::new())
            .run(request(dir.path(), &[], 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BadArgs(_)));
    }

    #[test]
    fn test_parse_url_list() {
        let text = "# my list\nhttps://youtu.be/dQw4w9WgXcQ\n\n   \n  https://www.youtube.com/watch?v=aaaaaaaaaaa  \n";
        assert_eq!(
            parse_url_list(text),
            vec![
                "https://youtu.be/dQw4w9WgXcQ".to_string(),
                "https://www.youtube.com/watch?v=aaaaaaaaaaa".to_string()
            ]
        );
    }

    #[test]
    fn test_item_output_dir() {
        let root = Path::new("clips");
        assert_eq!(item_output_dir(root, GOOD, 1), PathBuf::from("clips/dQw4w9WgXcQ"));
        assert_eq!(item_output_dir(root, "garbage", 4), PathBuf::from("clips/video_004"));
    }

    #[test]
    fn test_repeated_video_gets_its_own_directory() {
        let urls: Vec<String> = [GOOD, "https://www.youtube.com/watch?v=dQw4w9WgXcQ", GOOD]
            .iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            assign_output_dirs(Path::new("clips"), &urls),
            vec![
                PathBuf::from("clips/dQw4w9WgXcQ"),
                PathBuf::from("clips/dQw4w9WgXcQ_2"),
                PathBuf::from("clips/dQw4w9WgXcQ_3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_urls_do_not_share_output() {
        let dir = tempfile::tempdir().unwrap();
        let report = batch(MockDownloader::new())
            .run(request(dir.path(), &[GOOD, GOOD], 2))
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_ne!(report.items[0].output_directory, report.items[1].output_directory);
        assert!(dir.path().join("dQw4w9WgXcQ/Sample_clip_001.mp4").is_file());
        assert!(dir.path().join("dQw4w9WgXcQ_2/Sample_clip_001.mp4").is_file());
    }
}
