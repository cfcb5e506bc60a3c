//! Command implementations

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::toml_config::AppConfig;
use crate::app::batch_interactor::parse_url_list;
use crate::app::process_interactor::resolve_output_dir;
use crate::app::{
    AppContainer, BatchReport, BatchRequest, ProcessRequest, SplitOptions, SplitRequest,
};
use crate::cli::args::{BatchArgs, InspectArgs, ServeArgs, SplitArgs};
use crate::domain::model::*;
use crate::ports::ToolStatus;
use crate::utils::Utils;
use crate::web::{self, AppState};

/// Execute the split command
pub async fn split(container: &dyn AppContainer, config: &AppConfig, args: SplitArgs) -> Result<()> {
    let options = SplitOptions::from_config(config).context("Invalid split options")?;

    if let Some(input) = args.input {
        info!("Input: {}", input.display());
        let output_dir = resolve_output_dir(&config.output.directory, config.output.timestamped);
        let report = container
            .split_interactor()
            .split(SplitRequest {
                input: input.clone(),
                output_dir,
                subtitles: args.subtitles,
                options,
            })
            .await
            .with_context(|| format!("Failed to split {}", input.display()))?;

        if args.flags.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?
            );
        } else {
            display_split_report(&report);
        }
        return Ok(());
    }

    let url = args.url.context("Either --url or --input is required")?;
    info!("URL: {}", url);
    let report = container
        .process_interactor()
        .process(ProcessRequest {
            url: url.clone(),
            quality: config.download.quality,
            output_dir: config.output.directory.clone(),
            timestamped: config.output.timestamped,
            keep_source: config.output.keep_source,
            options,
        })
        .await
        .with_context(|| format!("Failed to process {}", url))?;

    if args.flags.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        display_process_report(&report);
    }
    Ok(())
}

/// Execute the batch command
pub async fn batch(container: &dyn AppContainer, config: &AppConfig, args: BatchArgs) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read URL list {}", args.file.display()))?;
    let urls = parse_url_list(&text);
    if urls.is_empty() {
        anyhow::bail!("No URLs found in {}", args.file.display());
    }

    let options = SplitOptions::from_config(config).context("Invalid split options")?;
    let root = resolve_output_dir(&config.output.directory, config.output.timestamped);
    let report = container
        .batch_interactor()
        .run(BatchRequest {
            urls,
            jobs: args.jobs,
            template: ProcessRequest {
                url: String::new(),
                quality: config.download.quality,
                output_dir: root,
                timestamped: false,
                keep_source: config.output.keep_source,
                options,
            },
        })
        .await
        .context("Batch processing failed")?;

    if args.flags.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        display_batch_report(&report);
    }

    if report.succeeded == 0 {
        anyhow::bail!("All {} videos failed", report.failed);
    }
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(container: &dyn AppContainer, args: InspectArgs) -> Result<()> {
    let media_info = container
        .inspect_interactor()
        .inspect(&args.input)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&media_info)
            .context("Failed to serialize media info to JSON")?;
        println!("{}", json);
    } else {
        display_media_info(&media_info);
    }
    Ok(())
}

/// Execute the serve command
pub async fn serve(container: &dyn AppContainer, config: AppConfig, args: ServeArgs) -> Result<()> {
    let addr_text = args.addr.unwrap_or_else(|| config.server.addr.clone());
    let addr: SocketAddr = addr_text
        .parse()
        .with_context(|| format!("Invalid listen address: {}", addr_text))?;

    let status = container.tool_port().check_tools().await;
    if !status.ready() {
        warn!("Missing tools: {}. Jobs will fail until they are installed", status.missing().join(", "));
    }

    let state = AppState::new(container.process_interactor(), config);
    web::serve(state, addr).await.context("Web server failed")?;
    Ok(())
}

/// Execute the check command
pub async fn check(container: &dyn AppContainer) -> Result<()> {
    let status = container.tool_port().check_tools().await;
    display_tool_status(&status);
    if !status.ready() {
        anyhow::bail!("Missing required tools: {}", status.missing().join(", "));
    }
    Ok(())
}

fn display_split_report(report: &SplitReport) {
    println!("Split Results");
    println!("=============");
    println!("Source: {}", report.source);
    println!("Duration: {}", Utils::format_seconds(report.source_duration));
    println!("Strategy: {}", report.strategy_used);
    display_clips(&report.clips);
    if report.failed_clips > 0 {
        println!("Failed clips: {}", report.failed_clips);
    }
    println!("Output: {}", report.output_directory);
}

fn display_process_report(report: &ProcessReport) {
    let video = &report.original_video;
    println!("Video: {}", video.title);
    if !video.uploader.is_empty() {
        println!("Uploader: {}", video.uploader);
    }
    println!("Duration: {}", Utils::format_seconds(video.duration));
    display_clips(&report.clips);
    println!("Created {} clips in {}", report.total_clips, report.output_directory);
}

fn display_batch_report(report: &BatchReport) {
    println!("Batch Results");
    println!("=============");
    for item in &report.items {
        match (&item.report, &item.error) {
            (Some(r), _) => println!("  ✓ {}: {} clips in {}", item.url, r.total_clips, item.output_directory),
            (None, Some(e)) => println!("  ✗ {}: {}", item.url, e),
            (None, None) => println!("  ? {}", item.url),
        }
    }
    println!("Succeeded: {}, failed: {}", report.succeeded, report.failed);
}

fn display_clips(clips: &[ClipInfo]) {
    println!();
    for clip in clips {
        println!(
            "  {}  {} - {}  ({}, {})",
            clip.name,
            Utils::format_seconds(clip.start_time),
            Utils::format_seconds(clip.end_time),
            Utils::format_seconds(clip.duration),
            Utils::format_file_size((clip.size_mb * 1024.0 * 1024.0) as u64)
        );
    }
    println!();
}

/// Display media information in human-readable format
fn display_media_info(media_info: &MediaInfo) {
    println!("Media Information");
    println!("=================");
    println!("File: {}", media_info.path);
    println!("Format: {}", media_info.format);
    println!("Duration: {}", Utils::format_seconds(media_info.duration));
    println!("File Size: {}", Utils::format_file_size(media_info.size));
    println!("Bit Rate: {} bps", media_info.bit_rate.unwrap_or(0));
    println!();

    if let Some(video) = &media_info.video {
        println!("Video: {}x{} @ {:.2} fps, {}", video.width, video.height, video.fps, video.codec);
    }
    if let Some(audio) = &media_info.audio {
        println!("Audio: {} Hz, {} channels, {}", audio.sample_rate, audio.channels, audio.codec);
    }
}

fn display_tool_status(status: &ToolStatus) {
    let line = |name: &str, version: &Option<String>| match version {
        Some(v) => println!("  ✓ {}: {}", name, v),
        None => println!("  ✗ {}: not found", name),
    };
    println!("Toolchain");
    println!("=========");
    line("ffmpeg", &status.ffmpeg);
    line("ffprobe", &status.ffprobe);
    line("yt-dlp", &status.ytdlp);
}
