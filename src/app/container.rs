use std::sync::Arc;

use crate::adapters::{AppConfig, FFmpegAdapter, FFprobeAdapter, ToolchainAdapter, YtDlpAdapter};
use crate::app::{
    batch_interactor::BatchInteractor, inspect_interactor::InspectInteractor,
    process_interactor::ProcessInteractor, split_interactor::SplitInteractor,
};
use crate::ports::{AnalyzePort, DownloadPort, EncodePort, ProbePort, ToolPort};

pub trait AppContainer: Send + Sync {
    fn split_interactor(&self) -> Arc<SplitInteractor>;
    fn process_interactor(&self) -> Arc<ProcessInteractor>;
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn tool_port(&self) -> Arc<dyn ToolPort>;
}

pub struct DefaultAppContainer {
    split_interactor: Arc<SplitInteractor>,
    process_interactor: Arc<ProcessInteractor>,
    batch_interactor: Arc<BatchInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    tool_port: Arc<dyn ToolPort>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Self {
        let tools = &config.tools;
        let probe_port = Arc::new(FFprobeAdapter::new(tools.ffprobe.clone()));
        let ffmpeg = Arc::new(FFmpegAdapter::new(tools.ffmpeg.clone()));
        let download_port = Arc::new(YtDlpAdapter::new(tools.ytdlp.clone(), &tools.ffmpeg));
        let tool_port = Arc::new(ToolchainAdapter::new(tools.clone()));

        let split_interactor = Arc::new(SplitInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            Arc::clone(&ffmpeg) as Arc<dyn AnalyzePort>,
            Arc::clone(&ffmpeg) as Arc<dyn EncodePort>,
        ));

        let process_interactor = Arc::new(ProcessInteractor::new(
            download_port as Arc<dyn DownloadPort>,
            Arc::clone(&split_interactor),
        ));

        let batch_interactor = Arc::new(BatchInteractor::new(Arc::clone(&process_interactor)));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
        ));

        Self {
            split_interactor,
            process_interactor,
            batch_interactor,
            inspect_interactor,
            tool_port,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn split_interactor(&self) -> Arc<SplitInteractor> {
        Arc::clone(&self.split_interactor)
    }

    fn process_interactor(&self) -> Arc<ProcessInteractor> {
        Arc::clone(&self.process_interactor)
    }

    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn tool_port(&self) -> Arc<dyn ToolPort> {
        Arc::clone(&self.tool_port)
    }
}
