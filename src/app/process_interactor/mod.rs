// Process interactor - Download a YouTube video and split it into clips

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use super::split_interactor::{SplitInteractor, SplitRequest};
use super::SplitOptions;
use crate::adapters::workspace::Workspace;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::url::validate_url;
use crate::ports::*;

/// Request to run the full pipeline for one URL
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub url: String,
    pub quality: VideoQuality,
    pub output_dir: PathBuf,
    /// Write into a fresh `clips_<timestamp>` sub-directory
    pub timestamped: bool,
    /// Copy the downloaded source next to the clips
    pub keep_source: bool,
    pub options: SplitOptions,
}

/// Interactor for the download-and-split use case
pub struct ProcessInteractor {
    download_port: Arc<dyn DownloadPort>,
    split_interactor: Arc<SplitInteractor>,
}

impl ProcessInteractor {
    pub fn new(download_port: Arc<dyn DownloadPort>, split_interactor: Arc<SplitInteractor>) -> Self {
        Self {
            download_port,
            split_interactor,
        }
    }

    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessReport, DomainError> {
        let url = request.url.trim();
        if !validate_url(url) {
            return Err(DomainError::InvalidUrl(url.to_string()));
        }

        let output_dir = resolve_output_dir(&request.output_dir, request.timestamped);
        let workspace = Workspace::create()?;
        info!(url, output = %output_dir.display(), "Processing video");

        let result = self.run(url, &request, &output_dir, workspace.path()).await;
        workspace.cleanup();
        result
    }

    async fn run(
        &self,
        url: &str,
        request: &ProcessRequest,
        output_dir: &Path,
        workdir: &Path,
    ) -> Result<ProcessReport, DomainError> {
        let downloaded = self
            .download_port
            .download(url, request.quality, request.options.captions, workdir)
            .await?;
        info!(
            title = %downloaded.info.title,
            path = %downloaded.video_path.display(),
            subtitles = downloaded.subtitle_path.is_some(),
            "Download complete"
        );

        let report = self
            .split_interactor
            .split(SplitRequest {
                input: downloaded.video_path.clone(),
                output_dir: output_dir.to_path_buf(),
                subtitles: downloaded.subtitle_path.clone(),
                options: request.options.clone(),
            })
            .await?;

        if request.keep_source {
            if let Some(name) = downloaded.video_path.file_name() {
                let target = output_dir.join(name);
                if let Err(e) = tokio::fs::copy(&downloaded.video_path, &target).await {
                    warn!(error = %e, "Failed to keep source video");
                }
            }
        }

        info!(clips = report.total_clips(), "Processing complete");
        Ok(ProcessReport {
            original_video: downloaded.info,
            total_clips: report.total_clips(),
            clips: report.clips,
            output_directory: report.output_directory,
        })
    }
}

/// `base`, or `base/clips_YYYYMMDD_HHMMSS` when timestamped
pub fn resolve_output_dir(base: &Path, timestamped: bool) -> PathBuf {
    if timestamped {
        base.join(format!("clips_{}", Local::now().format("%Y%m%d_%H%M%S")))
    } else {
        base.to_path_buf()
    }
}
