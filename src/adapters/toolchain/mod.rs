//! External toolchain detection

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::command::ToolCommand;
use crate::adapters::toml_config::ToolsConfig;
use crate::ports::*;

/// Checks that ffmpeg, ffprobe and yt-dlp can be run
pub struct ToolchainAdapter {
    tools: ToolsConfig,
}

impl ToolchainAdapter {
    pub fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }

    async fn version(tool: &str, binary: &str, flag: &str) -> Option<String> {
        match ToolCommand::new(tool, binary).arg(flag).run().await {
            Ok(output) => first_line(&String::from_utf8_lossy(&output.stdout)),
            Err(e) => {
                debug!(tool, error = %e, "Tool check failed");
                None
            }
        }
    }
}

#[async_trait]
impl ToolPort for ToolchainAdapter {
    async fn check_tools(&self) -> ToolStatus {
        let (ffmpeg, ffprobe, ytdlp) = tokio::join!(
            Self::version("ffmpeg", &self.tools.ffmpeg, "-version"),
            Self::version("ffprobe", &self.tools.ffprobe, "-version"),
            Self::version("yt-dlp", &self.tools.ytdlp, "--version"),
        );
        ToolStatus {
            ffmpeg,
            ffprobe,
            ytdlp,
        }
    }
}

/// First non-empty line of a version banner
pub fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
