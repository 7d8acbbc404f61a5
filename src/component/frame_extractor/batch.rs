//! 批次擷取：資料夾模式與清單模式共用的執行流程

use super::extractor::{ExtractionWindow, StopReason, extract_frames};
use super::frame_writer::FrameWriter;
use super::manifest::Manifest;
use super::video_source::VideoSource;
use crate::config::is_video_file;
use crate::tools::{
    FolderStatus, clear_frames, create_folder, ensure_directory_exists, get_files_path,
};
use anyhow::Result;
use indicatif::ProgressBar;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// 單一影片的擷取任務
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub video_path: PathBuf,
    pub output_dir: PathBuf,
    pub window: ExtractionWindow,
}

/// 批次擷取結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub frames_written: usize,
}

fn stem_dir(output_root: &Path, video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());
    output_root.join(stem)
}

/// 為資料夾下（不遞迴）的每個影片建立任務，輸出到 `output_root/<檔名>`
pub fn folder_jobs(
    input_dir: &Path,
    output_root: &Path,
    window: &ExtractionWindow,
) -> Result<Vec<BatchJob>> {
    Ok(get_files_path(input_dir)?
        .into_iter()
        .filter(|p| is_video_file(p))
        .map(|video_path| BatchJob {
            output_dir: stem_dir(output_root, &video_path),
            video_path,
            window: *window,
        })
        .collect())
}

/// 將清單轉為任務；未指定輸出資料夾的列輸出到 `output_root/<檔名>`
#[must_use]
pub fn manifest_jobs(manifest: &Manifest, output_root: &Path) -> Vec<BatchJob> {
    manifest
        .entries
        .iter()
        .map(|entry| BatchJob {
            video_path: entry.video_path.clone(),
            output_dir: entry
                .output_dir
                .clone()
                .unwrap_or_else(|| stem_dir(output_root, &entry.video_path)),
            window: entry.window,
        })
        .collect()
}

enum JobOutcome {
    Done(usize, StopReason),
    Skipped,
}

/// 依序執行批次任務
///
/// `open_source` 負責開啟每支影片。已存在的輸出資料夾在 `overwrite` 為
/// false 時略過，為 true 時先清除舊幀再擷取。單一任務失敗只會記錄並繼續下一個。
pub fn run_batch<S, O, W>(
    jobs: &[BatchJob],
    mut open_source: O,
    writer: &mut W,
    overwrite: bool,
    shutdown_signal: &AtomicBool,
    progress: &ProgressBar,
) -> BatchResult
where
    S: VideoSource,
    O: FnMut(&Path) -> Result<S>,
    W: FrameWriter + ?Sized,
{
    let mut result = BatchResult {
        total: jobs.len(),
        ..BatchResult::default()
    };

    for job in jobs {
        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷信號，停止批次擷取");
            break;
        }

        progress.set_message(job.video_path.display().to_string());

        match run_job(job, &mut open_source, writer, overwrite, shutdown_signal) {
            Ok(JobOutcome::Done(frames, reason)) => {
                result.successful += 1;
                result.frames_written += frames;
                if reason == StopReason::Cancelled {
                    progress.inc(1);
                    break;
                }
            }
            Ok(JobOutcome::Skipped) => {
                info!("輸出資料夾已存在，略過: {}", job.output_dir.display());
                result.skipped += 1;
            }
            Err(e) => {
                error!("擷取失敗 {}: {e:#}", job.video_path.display());
                result.failed += 1;
            }
        }

        progress.inc(1);
    }

    info!(
        "批次擷取完成 - 成功: {}, 略過: {}, 失敗: {}, 幀數: {}",
        result.successful, result.skipped, result.failed, result.frames_written
    );

    result
}

fn run_job<S, O, W>(
    job: &BatchJob,
    open_source: &mut O,
    writer: &mut W,
    overwrite: bool,
    shutdown_signal: &AtomicBool,
) -> Result<JobOutcome>
where
    S: VideoSource,
    O: FnMut(&Path) -> Result<S>,
    W: FrameWriter + ?Sized,
{
    if let Some(parent) = job.output_dir.parent() {
        ensure_directory_exists(parent)?;
    }

    match create_folder(&job.output_dir) {
        FolderStatus::Created => {}
        FolderStatus::AlreadyExists if overwrite => {
            clear_frames(&job.output_dir)?;
        }
        FolderStatus::AlreadyExists => return Ok(JobOutcome::Skipped),
        FolderStatus::Failed(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("無法建立輸出資料夾: {}", job.output_dir.display())));
        }
    }

    let mut source = open_source(&job.video_path)?;
    let extraction = extract_frames(
        &mut source,
        writer,
        &job.output_dir,
        &job.window,
        shutdown_signal,
    )?;

    Ok(JobOutcome::Done(
        extraction.frames_written,
        extraction.stop_reason,
    ))
}
