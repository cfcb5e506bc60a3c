// Background job bookkeeping for the web interface

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::model::ProcessReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub url: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ProcessReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Shared in-memory job table
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, JobRecord>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a queued job and return its id
    pub async fn create(&self, url: &str) -> Uuid {
        let id = Uuid::new_v4();
        let record = JobRecord {
            id,
            url: url.to_string(),
            status: JobStatus::Queued,
            created_at: Utc::now(),
            report: None,
            error: None,
        };
        self.jobs.write().await.insert(id, record);
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<JobRecord> {
        self.jobs.read().await.get(id).cloned()
    }

    /// All jobs, oldest first
    pub async fn list(&self) -> Vec<JobRecord> {
        let mut jobs: Vec<JobRecord> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by_key(|job| job.created_at);
        jobs
    }

    /// Path of a clip listed in the job's report; nothing else is reachable
    pub async fn clip_path(&self, id: &Uuid, name: &str) -> Option<PathBuf> {
        let jobs = self.jobs.read().await;
        let report = jobs.get(id)?.report.as_ref()?;
        report
            .clips
            .iter()
            .find(|clip| clip.name == name)
            .map(|clip| PathBuf::from(&clip.path))
    }

    pub async fn mark_running(&self, id: &Uuid) {
        if let Some(job) = self.jobs.write().await.get_mut(id) {
            job.status = JobStatus::Running;
        }
    }

    pub async fn finish(&self, id: &Uuid, result: Result<ProcessReport, String>) {
        if let Some(job) = self.jobs.write().await.get_mut(id) {
            match result {
                Ok(report) => {
                    job.status = JobStatus::Done;
                    job.report = Some(report);
                }
                Err(error) => {
                    job.status = JobStatus::Failed;
                    job.error = Some(error);
                }
            }
        }
    }
}
