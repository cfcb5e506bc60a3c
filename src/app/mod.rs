// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod inspect_interactor;
pub mod process_interactor;
pub mod split_interactor;

#[cfg(test)]
pub(crate) mod test_support;

use crate::adapters::toml_config::AppConfig;
use crate::domain::errors::DomainError;
use crate::domain::model::*;

// Re-export interactors
pub use batch_interactor::{BatchInteractor, BatchItem, BatchReport, BatchRequest};
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::InspectInteractor;
pub use process_interactor::{ProcessInteractor, ProcessRequest};
pub use split_interactor::{SplitInteractor, SplitRequest};

/// Detector tuning for scene and silence analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    pub scene_threshold: f64,
    pub silence_noise_db: f64,
    pub silence_min_duration: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            scene_threshold: 0.3,
            silence_noise_db: -40.0,
            silence_min_duration: 1.0,
        }
    }
}

/// Everything that shapes how one video is cut
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    pub window: DurationWindow,
    pub strategy: SplitStrategy,
    pub captions: bool,
    pub caption_style: CaptionStyle,
    pub settings: EncodeSettings,
    pub analysis: AnalysisSettings,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            window: DurationWindow::default(),
            strategy: SplitStrategy::Auto,
            captions: true,
            caption_style: CaptionStyle::Standard,
            settings: EncodeSettings::default(),
            analysis: AnalysisSettings::default(),
        }
    }
}

impl SplitOptions {
    /// Options as configured, before any per-request overrides
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        Ok(Self {
            window: config.window()?,
            strategy: config.split.strategy,
            captions: config.download.captions,
            caption_style: config.download.caption_style,
            settings: config.encode.clone(),
            analysis: AnalysisSettings {
                scene_threshold: config.split.scene_threshold,
                silence_noise_db: config.split.silence_noise_db,
                silence_min_duration: config.split.silence_min_duration,
            },
        })
    }
}
