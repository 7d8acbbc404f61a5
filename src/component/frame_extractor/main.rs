use super::batch::{BatchJob, BatchResult, folder_jobs, manifest_jobs, run_batch};
use super::extractor::{ExtractionResult, ExtractionWindow, StopReason, extract_frames};
use super::ffmpeg_source::FfmpegVideoSource;
use super::frame_writer::JpegFrameWriter;
use super::manifest::load_manifest;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::{
    FolderStatus, clear_frames, create_folder, ensure_directory_exists, validate_directory_exists,
};
use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// 影片擷幀元件
///
/// 將影片依設定的時間範圍與取樣率拆成 `000001.jpg` 起算的連號圖片。
pub struct FrameExtractor<'a> {
    config: &'a mut Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl<'a> FrameExtractor<'a> {
    pub fn new(config: &'a mut Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    fn window(&self) -> ExtractionWindow {
        self.config.settings.extraction.window()
    }

    fn writer(&self) -> JpegFrameWriter {
        JpegFrameWriter::new(self.config.settings.extraction.jpeg_quality)
    }

    /// 擷取單一影片
    pub fn run_single(&mut self) -> Result<()> {
        println!("{}", style(t!("extractor.single_title")).cyan().bold());
        self.print_window();

        let video_path = self.prompt_path(&t!("extractor.prompt_video"), true)?;
        let output_dir = self.prompt_path(&t!("extractor.prompt_output"), false)?;

        if let Some(parent) = output_dir.parent() {
            ensure_directory_exists(parent)?;
        }
        match create_folder(&output_dir) {
            FolderStatus::Created => {}
            FolderStatus::AlreadyExists => {
                let removed = clear_frames(&output_dir)?;
                warn!("輸出資料夾已存在，清除 {removed} 張舊幀: {}", output_dir.display());
                println!(
                    "{}",
                    style(t!("extractor.output_exists", count = removed)).yellow()
                );
            }
            FolderStatus::Failed(e) => {
                bail!("無法建立輸出資料夾 {}: {e}", output_dir.display());
            }
        }

        let result = self.extract_video(&video_path, &output_dir, &self.window())?;
        self.remember(&video_path);

        println!(
            "{} {}",
            style("✓").green(),
            t!(
                "extractor.single_done",
                count = result.frames_written,
                dir = output_dir.display()
            )
        );
        if result.stop_reason == StopReason::Cancelled {
            println!("{}", style(t!("extractor.cancelled")).yellow());
        }

        Ok(())
    }

    /// 擷取資料夾內的所有影片
    pub fn run_folder(&mut self) -> Result<()> {
        println!("{}", style(t!("extractor.folder_title")).cyan().bold());
        self.print_window();

        let input_dir = self.prompt_path(&t!("extractor.prompt_input_dir"), true)?;
        validate_directory_exists(&input_dir)?;
        let output_root = self.prompt_path(&t!("extractor.prompt_output_root"), false)?;
        ensure_directory_exists(&output_root)?;

        let jobs = folder_jobs(&input_dir, &output_root, &self.window())?;
        if jobs.is_empty() {
            println!("{}", style(t!("extractor.no_videos")).yellow());
            return Ok(());
        }
        println!(
            "{}",
            style(t!("extractor.found_videos", count = jobs.len())).green()
        );

        let result = self.run_jobs(&jobs)?;
        self.remember(&input_dir);
        self.print_summary(&result);

        Ok(())
    }

    /// 依 CSV 清單擷取
    pub fn run_manifest(&mut self) -> Result<()> {
        println!("{}", style(t!("extractor.manifest_title")).cyan().bold());
        self.print_window();

        let manifest_path = self.prompt_path(&t!("extractor.prompt_manifest"), true)?;
        let manifest = load_manifest(&manifest_path, &self.window())?;

        if !manifest.invalid_rows.is_empty() {
            println!(
                "{}",
                style(t!(
                    "extractor.invalid_rows",
                    count = manifest.invalid_rows.len()
                ))
                .yellow()
            );
            for (line, message) in &manifest.invalid_rows {
                println!("  {} #{line}: {message}", style("✗").red());
            }
        }
        if manifest.entries.is_empty() {
            println!("{}", style(t!("extractor.no_videos")).yellow());
            return Ok(());
        }

        let output_root = self.prompt_path(&t!("extractor.prompt_output_root"), false)?;
        ensure_directory_exists(&output_root)?;

        let jobs = manifest_jobs(&manifest, &output_root);
        let mut result = self.run_jobs(&jobs)?;
        result.total += manifest.invalid_rows.len();
        result.failed += manifest.invalid_rows.len();

        self.remember(&manifest_path);
        self.print_summary(&result);

        Ok(())
    }

    /// 開啟影片並擷取到指定資料夾
    pub fn extract_video(
        &self,
        video_path: &Path,
        output_dir: &Path,
        window: &ExtractionWindow,
    ) -> Result<ExtractionResult> {
        let mut source = FfmpegVideoSource::open(video_path)
            .with_context(|| format!("無法開啟影片: {}", video_path.display()))?;
        let mut writer = self.writer();

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress bar template"),
        );
        spinner.set_message(t!("extractor.extracting").to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = extract_frames(
            &mut source,
            &mut writer,
            output_dir,
            window,
            &self.shutdown_signal,
        );
        spinner.finish_and_clear();

        let result = result?;
        info!(
            "{} -> {}: {} 張",
            video_path.display(),
            output_dir.display(),
            result.frames_written
        );
        Ok(result)
    }

    fn run_jobs(&self, jobs: &[BatchJob]) -> Result<BatchResult> {
        let overwrite = Confirm::new()
            .with_prompt(t!("extractor.prompt_overwrite"))
            .default(false)
            .interact()?;

        let progress_bar = ProgressBar::new(jobs.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        let mut writer = self.writer();
        let result = run_batch(
            jobs,
            FfmpegVideoSource::open,
            &mut writer,
            overwrite,
            &self.shutdown_signal,
            &progress_bar,
        );
        progress_bar.finish_and_clear();

        Ok(result)
    }

    fn prompt_path(&self, prompt: &str, offer_recent: bool) -> Result<PathBuf> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(recent) = self
            .config
            .settings
            .recent_paths
            .first()
            .filter(|_| offer_recent)
        {
            input = input.default(recent.clone());
        }
        let path: String = input.interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    fn remember(&mut self, path: &Path) {
        add_recent_path(&mut self.config.settings, &path.to_string_lossy());
        if let Err(e) = save_settings(&self.config.settings) {
            warn!("無法儲存設定: {e}");
        }
    }

    fn print_window(&self) {
        let settings = &self.config.settings.extraction;
        let end = settings
            .end_sec
            .map_or_else(|| t!("settings.unbounded").to_string(), |e| format!("{e}"));
        println!(
            "{}",
            style(t!(
                "extractor.window",
                start = settings.start_sec,
                end = end,
                fps = settings.fps,
                quality = settings.jpeg_quality
            ))
            .dim()
        );
    }

    fn print_summary(&self, result: &BatchResult) {
        println!();
        println!("{}", style(t!("extractor.summary_title")).cyan().bold());
        println!("  {}", t!("extractor.summary_total", count = result.total));
        println!(
            "  {}",
            style(t!("extractor.summary_success", count = result.successful)).green()
        );
        if result.skipped > 0 {
            println!(
                "  {}",
                style(t!("extractor.summary_skipped", count = result.skipped)).yellow()
            );
        }
        if result.failed > 0 {
            println!(
                "  {}",
                style(t!("extractor.summary_failed", count = result.failed)).red()
            );
        }
        println!(
            "  {}",
            t!("extractor.summary_frames", count = result.frames_written)
        );
    }
}
