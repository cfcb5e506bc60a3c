// Inspect interactor - Orchestrates media file inspection use case

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl InspectInteractor {
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    pub async fn inspect(&self, input: &Path) -> Result<MediaInfo, DomainError> {
        if !input.is_file() {
            return Err(DomainError::FileNotFound(input.display().to_string()));
        }
        let media_info = self.probe_port.probe(input).await?;
        info!(
            path = %input.display(),
            duration = media_info.duration,
            resolution = media_info.resolution().as_deref().unwrap_or("none"),
            "Media file probed"
        );
        Ok(media_info)
    }
}
