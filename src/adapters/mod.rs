// Adapters - External system implementations

pub mod command;
pub mod ffmpeg;
pub mod ffprobe;
pub mod toml_config;
pub mod toolchain;
pub mod tracing_log;
pub mod workspace;
pub mod ytdlp;

// Re-export adapters
pub use ffmpeg::FFmpegAdapter;
pub use ffprobe::FFprobeAdapter;
pub use toml_config::AppConfig;
pub use toolchain::ToolchainAdapter;
pub use tracing_log::{init_logging, LogLevel};
pub use workspace::Workspace;
pub use ytdlp::YtDlpAdapter;
