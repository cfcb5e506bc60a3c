//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::toml_config::AppConfig;
use crate::adapters::tracing_log::LogLevel;
use crate::cli::{Cli, Commands};

/// Where the effective configuration came from, reported once logging is up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSources {
    pub file: Option<PathBuf>,
    pub env_overrides: usize,
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<(AppConfig, ConfigSources)> {
    let file = AppConfig::locate(cli.config.as_deref()).context("Failed to load configuration file")?;
    let mut config = match &file {
        Some(path) => AppConfig::from_file(path).context("Failed to load configuration file")?,
        None => AppConfig::default(),
    };

    let env_overrides = config
        .apply_env()
        .context("Invalid environment variable override")?;

    apply_cli_configuration_overrides(&mut config, cli)?;

    config.validate().context("Invalid configuration")?;
    Ok((
        config,
        ConfigSources {
            file,
            env_overrides,
        },
    ))
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(config: &mut AppConfig, cli: &Cli) -> Result<()> {
    if let Some(level) = &cli.log_level {
        LogLevel::parse(level)?;
        config.logging.level = level.clone();
    }
    if cli.json_logs {
        config.logging.json = true;
    }

    match &cli.command {
        Commands::Split(args) => args.flags.apply(config)?,
        Commands::Batch(args) => args.flags.apply(config)?,
        Commands::Serve(args) => {
            if let Some(addr) = &args.addr {
                config.server.addr = addr.clone();
            }
        }
        Commands::Inspect(_) | Commands::Check => {}
    }
    Ok(())
}

/// Log where the effective settings came from once logging is up
pub fn log_configuration(config: &AppConfig, sources: &ConfigSources) {
    match &sources.file {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => debug!("No configuration file found, using defaults"),
    }
    if sources.env_overrides > 0 {
        info!("Applied {} environment variable overrides", sources.env_overrides);
    }
    info!(
        min = config.split.min_duration,
        max = config.split.max_duration,
        strategy = %config.split.strategy,
        quality = %config.download.quality,
        captions = config.download.captions,
        crf = config.encode.crf,
        threads = config.encode.threads,
        "Configuration initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::try_parse_from([
            "ytsplit",
            "--json-logs",
            "split",
            "--input",
            "a.mp4",
            "--max",
            "45",
            "--strategy",
            "scene",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        apply_cli_configuration_overrides(&mut config, &cli).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.split.max_duration, 45.0);
        assert_eq!(config.split.strategy, crate::domain::model::SplitStrategy::Scene);
    }

    #[test]
    fn test_explicit_config_file_is_layered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ytsplit.toml");
        std::fs::write(&path, "[split]\nmin_duration = 10\nmax_duration = 20\n").unwrap();

        let cli = Cli::try_parse_from([
            "ytsplit",
            "--config",
            path.to_str().unwrap(),
            "split",
            "--input",
            "a.mp4",
            "--max",
            "25",
        ])
        .unwrap();
        let (config, sources) = initialize_configuration_hierarchy(&cli).unwrap();
        assert_eq!(config.split.min_duration, 10.0);
        assert_eq!(config.split.max_duration, 25.0);
        assert_eq!(sources.file, Some(path));
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let cli = Cli::try_parse_from([
            "ytsplit", "split", "--input", "a.mp4", "--min", "90", "--max", "30",
        ])
        .unwrap();
        assert!(initialize_configuration_hierarchy(&cli).is_err());
    }
}
