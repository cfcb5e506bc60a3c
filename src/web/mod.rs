// Web interface - axum routes over the processing pipeline

pub mod jobs;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{boxed, Body},
    extract::{Json, Path, State},
    http::{header, HeaderValue, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::adapters::toml_config::AppConfig;
use crate::app::{ProcessInteractor, ProcessRequest, SplitOptions};
use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::domain::url::{validate_url, video_id};
use jobs::{JobRecord, JobStore};

#[derive(Clone)]
pub struct AppState {
    pub process: Arc<ProcessInteractor>,
    pub config: Arc<AppConfig>,
    pub jobs: JobStore,
}

impl AppState {
    pub fn new(process: Arc<ProcessInteractor>, config: AppConfig) -> Self {
        Self {
            process,
            config: Arc::new(config),
            jobs: JobStore::new(),
        }
    }
}

/// Body of `POST /api/jobs`; unset fields fall back to the configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRequest {
    pub url: String,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub quality: Option<String>,
    pub add_captions: Option<bool>,
    pub caption_style: Option<String>,
    pub strategy: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl JobRequest {
    /// Merge with the configured defaults and validate
    pub fn into_process_request(self, config: &AppConfig) -> Result<ProcessRequest, DomainError> {
        let url = self.url.trim().to_string();
        if !validate_url(&url) {
            return Err(DomainError::InvalidUrl(url));
        }

        let mut options = SplitOptions::from_config(config)?;
        options.window = DurationWindow::new(
            self.min_duration.unwrap_or(config.split.min_duration),
            self.max_duration.unwrap_or(config.split.max_duration),
        )?;
        if let Some(captions) = self.add_captions {
            options.captions = captions;
        }
        if let Some(style) = &self.caption_style {
            options.caption_style = CaptionStyle::parse(style)?;
        }
        if let Some(strategy) = &self.strategy {
            options.strategy = SplitStrategy::parse(strategy)?;
        }
        let quality = match &self.quality {
            Some(q) => VideoQuality::parse(q)?,
            None => config.download.quality,
        };

        // Concurrent jobs must not write into the same directory
        let root = self
            .output_dir
            .unwrap_or_else(|| config.output.directory.clone());
        let output_dir = match video_id(&url) {
            Some(id) => root.join(id),
            None => root,
        };

        Ok(ProcessRequest {
            url,
            quality,
            output_dir,
            timestamped: config.output.timestamped,
            keep_source: config.output.keep_source,
            options,
        })
    }
}

/// Error body returned by the JSON API
pub enum ApiError {
    NotFound(String),
    Domain(DomainError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Domain(err) if err.is_client_error() => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Domain(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/jobs", post(create_job).get(list_jobs))
        .route("/api/jobs/:id", get(get_job))
        .route("/api/jobs/:id/clips/:name", get(download_clip))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Serve until Ctrl-C
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), DomainError> {
    let app = create_routes(state);
    info!("Listening on http://{}", addr);
    axum::Server::try_bind(&addr)
        .map_err(|e| DomainError::BadArgs(format!("Cannot bind {}: {}", addr, e)))?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DomainError::FsFail(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutting down");
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<JobRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let request = payload.into_process_request(&state.config)?;
    let id = state.jobs.create(&request.url).await;
    info!(%id, url = %request.url, "Queued job");

    let jobs = state.jobs.clone();
    let process = Arc::clone(&state.process);
    tokio::spawn(async move {
        jobs.mark_running(&id).await;
        let result = process.process(request).await.map_err(|e| {
            error!(%id, error = %e, "Job failed");
            e.to_string()
        });
        jobs.finish(&id, result).await;
    });

    Ok((StatusCode::ACCEPTED, Json(json!({ "id": id }))))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRecord>, ApiError> {
    state
        .jobs
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", id)))
}

/// Stream one finished clip as an attachment
async fn download_clip(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let path = state
        .jobs
        .clip_path(&id, &name)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Clip {} not found for job {}", name, id)))?;

    let mut response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .map_err(|e| DomainError::FsFail(format!("Failed to read {}: {}", path.display(), e)))?
        .map(boxed);
    if response.status() == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(format!("Clip {} is no longer on disk", name)));
    }
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name)) {
        response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobRecord>> {
    Json(state.jobs.list().await)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>YouTube Video Splitter</title>
    <link href="https://cdn.jsdelivr.net/npm/tailwindcss@3.2.7/dist/tailwind.min.css" rel="stylesheet">
  </head>
  <body class="p-4 max-w-xl mx-auto">
    <h1 class="text-2xl font-bold mb-4">YouTube Video Splitter</h1>
    <form id="jobForm" class="space-y-4">
      <div>
        <label class="block font-medium">YouTube URL</label>
        <input type="text" name="url" class="border rounded w-full p-1" placeholder="https://www.youtube.com/watch?v=..." required />
      </div>
      <div class="flex space-x-4">
        <div>
          <label class="block font-medium">Min seconds</label>
          <input type="number" name="min_duration" value="30" min="1" class="border rounded p-1 w-24" />
        </div>
        <div>
          <label class="block font-medium">Max seconds</label>
          <input type="number" name="max_duration" value="60" min="1" class="border rounded p-1 w-24" />
        </div>
      </div>
      <div>
        <label class="block font-medium">Quality</label>
        <select name="quality" class="border rounded p-1">
          <option value="best">Best</option>
          <option value="1080p">1080p</option>
          <option value="720p">720p</option>
          <option value="480p">480p</option>
          <option value="360p">360p</option>
        </select>
      </div>
      <div>
        <label><input type="checkbox" name="add_captions" checked /> Burn in captions</label>
        <select name="caption_style" class="border rounded p-1 ml-2">
          <option value="standard">Standard</option>
          <option value="minimal">Minimal</option>
          <option value="bold">Bold</option>
          <option value="outline">Outline</option>
        </select>
      </div>
      <div>
        <label class="block font-medium">Output directory (optional)</label>
        <input type="text" name="output_dir" class="border rounded w-full p-1" />
      </div>
      <button type="submit" class="bg-blue-500 text-white px-4 py-2 rounded">Split video</button>
    </form>
    <pre id="status" class="mt-4 bg-gray-100 p-2 whitespace-pre-wrap"></pre>
    <ul id="clips" class="mt-2 space-y-1"></ul>

    <script>
      const statusBox = document.getElementById('status');
      const clipList = document.getElementById('clips');

      function showClips(id, clips) {
        clipList.innerHTML = '';
        clips.forEach(c => {
          const item = document.createElement('li');
          const link = document.createElement('a');
          link.href = '/api/jobs/' + id + '/clips/' + encodeURIComponent(c.name);
          link.textContent = 'Download ' + c.name;
          link.className = 'text-blue-600 underline';
          item.appendChild(link);
          item.appendChild(document.createTextNode(' (' + c.duration + 's, ' + c.size_mb.toFixed(2) + ' MB)'));
          clipList.appendChild(item);
        });
      }

      async function poll(id) {
        const res = await fetch('/api/jobs/' + id);
        const job = await res.json();
        if (job.status === 'done') {
          statusBox.textContent = 'Done: ' + job.report.total_clips + ' clips in ' + job.report.output_directory;
          showClips(id, job.report.clips);
        } else if (job.status === 'failed') {
          statusBox.textContent = 'Failed: ' + job.error;
        } else {
          statusBox.textContent = 'Status: ' + job.status + '...';
          setTimeout(() => poll(id), 2000);
        }
      }

      document.getElementById('jobForm').addEventListener('submit', async (e) => {
        e.preventDefault();
        clipList.innerHTML = '';
        const form = e.target;
        const payload = {
          url: form.url.value,
          min_duration: Number(form.min_duration.value),
          max_duration: Number(form.max_duration.value),
          quality: form.quality.value,
          add_captions: form.add_captions.checked,
          caption_style: form.caption_style.value,
          output_dir: form.output_dir.value || null
        };
        const res = await fetch('/api/jobs', {
          method: 'POST',
          headers: {'Content-Type': 'application/json'},
          body: JSON.stringify(payload)
        });
        const data = await res.json();
        if (res.ok) {
          poll(data.id);
        } else {
          statusBox.textContent = 'Error: ' + data.error;
        }
      });
    </script>
  </body>
</html>
"#;
