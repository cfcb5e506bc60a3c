//! YouTube Video Splitter
//!
//! Downloads a YouTube video and splits it into 30-60 second clips at scene
//! changes or pauses in speech, with optional burned-in captions.
//!
//! # Usage
//!
//! ```bash
//! ytsplit split --url "https://www.youtube.com/watch?v=dQw4w9WgXcQ" --quality 720p
//! ytsplit split --input talk.mp4 --strategy silence --no-captions
//! ytsplit batch --file urls.txt --jobs 2
//! ytsplit serve --addr 127.0.0.1:8080
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use ytsplit::adapters::{init_logging, LogLevel};
use ytsplit::app::DefaultAppContainer;
use ytsplit::cli::{commands, Cli, Commands};
use ytsplit::config_initialization::{initialize_configuration_hierarchy, log_configuration};

/// Main entry point for the ytsplit CLI
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let (config, sources) = initialize_configuration_hierarchy(&cli)?;
    let level = LogLevel::parse(&config.logging.level)?;
    init_logging(level, config.logging.json);
    log_configuration(&config, &sources);

    let container = DefaultAppContainer::new(&config);

    // Execute the requested command
    match cli.command {
        Commands::Split(args) => {
            info!("Executing split command");
            commands::split(&container, &config, args).await?;
        }
        Commands::Batch(args) => {
            info!("Executing batch command");
            commands::batch(&container, &config, args).await?;
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(&container, args).await?;
        }
        Commands::Serve(args) => {
            info!("Executing serve command");
            commands::serve(&container, config, args).await?;
        }
        Commands::Check => {
            commands::check(&container).await?;
        }
    }

    debug!("ytsplit completed successfully");
    Ok(())
}
