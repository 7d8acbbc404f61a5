//! 整合測試 - 以合成影片來源驗證擷幀流程與批次處理
//!
//! 不需要 ffmpeg；圖片以真正的 JPEG 編碼寫入暫存資料夾。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use anyhow::{Result, bail};
use frame_harvester::component::frame_extractor::{
    ExtractionWindow, Frame, JpegFrameWriter, StopReason, VideoSource, extract_frames,
    folder_jobs, load_manifest, manifest_jobs, run_batch, sample_frame_at,
};
use frame_harvester::tools::{create_folder, get_files_path, get_frames_count};
use indicatif::ProgressBar;
use tempfile::TempDir;

const WIDTH: u32 = 16;
const HEIGHT: u32 = 12;

/// 每 0.1 秒一幀、共 `frame_count` 幀的合成來源
struct SyntheticSource {
    frame_count: usize,
    /// 在此序號回傳解碼失敗（模擬中途損毀）
    broken_frame: Option<usize>,
    position_sec: f64,
}

impl SyntheticSource {
    fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            broken_frame: None,
            position_sec: 0.0,
        }
    }

    fn current_index(&self) -> usize {
        (self.position_sec * 10.0).round() as usize
    }
}

impl VideoSource for SyntheticSource {
    fn seek_ms(&mut self, position_ms: f64) -> Result<()> {
        self.position_sec = position_ms / 1000.0;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let index = self.current_index();
        if index >= self.frame_count || self.broken_frame == Some(index) {
            return Ok(None);
        }

        let shade = (index * 20 % 256) as u8;
        Ok(Some(Frame {
            width: WIDTH,
            height: HEIGHT,
            data: vec![shade; Frame::expected_len(WIDTH, HEIGHT)],
            timestamp: self.position_sec,
        }))
    }
}

fn jpg_names(dir: &Path) -> Vec<String> {
    get_files_path(dir)
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

fn extract_into(dir: &Path, source: &mut SyntheticSource, window: ExtractionWindow) -> usize {
    let mut writer = JpegFrameWriter::default();
    let signal = AtomicBool::new(false);
    extract_frames(source, &mut writer, dir, &window, &signal)
        .unwrap()
        .frames_written
}

/// 測試 1: K 幀的來源應寫出 000001.jpg 到 K 並回傳 K
#[test]
fn test_extract_exactly_k_frames() {
    let temp_dir = TempDir::new().unwrap();
    let mut source = SyntheticSource::new(7);

    let written = extract_into(temp_dir.path(), &mut source, ExtractionWindow::default());

    assert_eq!(written, 7);
    let expected: Vec<String> = (1..=7).map(|i| format!("{i:06}.jpg")).collect();
    assert_eq!(jpg_names(temp_dir.path()), expected);
    assert_eq!(get_frames_count(temp_dir.path()).unwrap(), 7);

    let decoded = image::open(temp_dir.path().join("000003.jpg")).unwrap();
    assert_eq!(decoded.width(), WIDTH);
    assert_eq!(decoded.height(), HEIGHT);
}

/// 測試 2: 結束時間早於起始時間時不寫出任何檔案
#[test]
fn test_inverted_window_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let mut source = SyntheticSource::new(50);

    let written = extract_into(
        temp_dir.path(),
        &mut source,
        ExtractionWindow::new(3.0, Some(1.0), 10.0),
    );

    assert_eq!(written, 0);
    assert!(jpg_names(temp_dir.path()).is_empty());
}

/// 測試 3: 中途解碼失敗會結束擷取，已寫出的檔案保留
#[test]
fn test_mid_stream_failure_keeps_written_frames() {
    let temp_dir = TempDir::new().unwrap();
    let mut source = SyntheticSource::new(20);
    source.broken_frame = Some(4);

    let mut writer = JpegFrameWriter::new(80);
    let signal = AtomicBool::new(false);
    let result = extract_frames(
        &mut source,
        &mut writer,
        temp_dir.path(),
        &ExtractionWindow::default(),
        &signal,
    )
    .unwrap();

    assert_eq!(result.frames_written, 4);
    assert_eq!(result.stop_reason, StopReason::StreamExhausted);
    assert_eq!(jpg_names(temp_dir.path()).len(), 4);
}

/// 測試 4: 較低取樣率只取部分來源幀
#[test]
fn test_lower_fps_samples_subset() {
    let temp_dir = TempDir::new().unwrap();
    let mut source = SyntheticSource::new(30);

    // 0.0, 0.5, 1.0, 1.5, 2.0, 2.5 有幀；3.0 超出
    let written = extract_into(
        temp_dir.path(),
        &mut source,
        ExtractionWindow::new(0.0, None, 2.0),
    );
    assert_eq!(written, 6);
}

/// 測試 5: 超出長度取樣不會出錯
#[test]
fn test_sample_beyond_duration() {
    let mut source = SyntheticSource::new(10);
    assert!(sample_frame_at(&mut source, 100.0).unwrap().is_none());
    assert!(sample_frame_at(&mut source, 0.5).unwrap().is_some());
}

fn make_video_folder() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    fs::create_dir(&input).unwrap();
    for name in ["alpha.mp4", "beta.mov", "readme.txt"] {
        fs::write(input.join(name), "placeholder").unwrap();
    }
    temp_dir
}

fn open_synthetic(path: &Path) -> Result<SyntheticSource> {
    match path.file_stem().and_then(|s| s.to_str()) {
        Some("alpha") => Ok(SyntheticSource::new(3)),
        Some("beta") => Ok(SyntheticSource::new(5)),
        _ => bail!("無法開啟: {}", path.display()),
    }
}

/// 測試 6: 資料夾批次擷取，第二次執行會略過已存在的輸出
#[test]
fn test_folder_batch_skips_existing_outputs() {
    let temp_dir = make_video_folder();
    let input = temp_dir.path().join("input");
    let output_root = temp_dir.path().join("frames");

    let jobs = folder_jobs(&input, &output_root, &ExtractionWindow::default()).unwrap();
    assert_eq!(jobs.len(), 2);

    let signal = AtomicBool::new(false);
    let mut writer = JpegFrameWriter::default();
    let progress = ProgressBar::hidden();

    let first = run_batch(&jobs, open_synthetic, &mut writer, false, &signal, &progress);
    assert_eq!(first.successful, 2);
    assert_eq!(first.frames_written, 8);
    assert_eq!(get_frames_count(&output_root.join("alpha")).unwrap(), 3);
    assert_eq!(get_frames_count(&output_root.join("beta")).unwrap(), 5);

    let second = run_batch(&jobs, open_synthetic, &mut writer, false, &signal, &progress);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.successful, 0);

    let third = run_batch(&jobs, open_synthetic, &mut writer, true, &signal, &progress);
    assert_eq!(third.successful, 2);
}

/// 測試 7: 開啟失敗的影片計入失敗，不影響其他任務
#[test]
fn test_batch_counts_open_failures() {
    let temp_dir = make_video_folder();
    let input = temp_dir.path().join("input");
    fs::write(input.join("gamma.mkv"), "placeholder").unwrap();
    let output_root = temp_dir.path().join("frames");

    let jobs = folder_jobs(&input, &output_root, &ExtractionWindow::default()).unwrap();
    let signal = AtomicBool::new(false);
    let mut writer = JpegFrameWriter::default();

    let result = run_batch(
        &jobs,
        open_synthetic,
        &mut writer,
        false,
        &signal,
        &ProgressBar::hidden(),
    );

    assert_eq!(result.total, 3);
    assert_eq!(result.successful, 2);
    assert_eq!(result.failed, 1);
}

/// 測試 8: 中斷信號會在第一個任務前停止
#[test]
fn test_batch_respects_shutdown_signal() {
    let temp_dir = make_video_folder();
    let input = temp_dir.path().join("input");
    let output_root = temp_dir.path().join("frames");

    let jobs = folder_jobs(&input, &output_root, &ExtractionWindow::default()).unwrap();
    let signal = AtomicBool::new(true);
    let mut writer = JpegFrameWriter::default();

    let result = run_batch(
        &jobs,
        open_synthetic,
        &mut writer,
        false,
        &signal,
        &ProgressBar::hidden(),
    );

    assert_eq!(result.successful + result.failed + result.skipped, 0);
    assert!(!output_root.join("alpha").exists());
}

/// 測試 9: CSV 清單轉為批次任務並依各列的範圍擷取
#[test]
fn test_manifest_batch() {
    let temp_dir = make_video_folder();
    let manifest_path = temp_dir.path().join("jobs.csv");
    fs::write(
        &manifest_path,
        "video_path,start_sec,end_sec,fps,output_dir\n\
         input/alpha.mp4,,,,\n\
         input/beta.mp4,0.1,0.3,10,custom_beta\n",
    )
    .unwrap();

    let manifest = load_manifest(&manifest_path, &ExtractionWindow::default()).unwrap();
    assert!(manifest.invalid_rows.is_empty());

    let output_root = temp_dir.path().join("frames");
    let jobs = manifest_jobs(&manifest, &output_root);
    let signal = AtomicBool::new(false);
    let mut writer = JpegFrameWriter::default();

    let result = run_batch(
        &jobs,
        open_synthetic,
        &mut writer,
        false,
        &signal,
        &ProgressBar::hidden(),
    );

    assert_eq!(result.successful, 2);
    assert_eq!(get_frames_count(&output_root.join("alpha")).unwrap(), 3);

    let beta_dir: PathBuf = temp_dir.path().join("custom_beta");
    assert_eq!(
        jpg_names(&beta_dir),
        vec!["000001.jpg", "000002.jpg", "000003.jpg"]
    );
}

/// 測試 10: create_folder 的三態結果
#[test]
fn test_create_folder_tri_state() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("out");

    assert_eq!(create_folder(&target).code(), 0);
    assert_eq!(create_folder(&target).code(), -1);
    assert_eq!(create_folder(&temp_dir.path().join("a").join("b")).code(), 1);
}

/// 測試 11: 以較低取樣率覆寫時，舊的高序號幀會被清除
#[test]
fn test_overwrite_removes_stale_frames() {
    let temp_dir = make_video_folder();
    let input = temp_dir.path().join("input");
    let output_root = temp_dir.path().join("frames");
    let signal = AtomicBool::new(false);
    let mut writer = JpegFrameWriter::default();
    let progress = ProgressBar::hidden();

    let dense = folder_jobs(&input, &output_root, &ExtractionWindow::default()).unwrap();
    run_batch(&dense, open_synthetic, &mut writer, false, &signal, &progress);
    assert_eq!(get_frames_count(&output_root.join("beta")).unwrap(), 5);

    fs::write(output_root.join("beta").join("notes.txt"), "keep").unwrap();

    // 2 fps 只會在 0.0 秒取到一幀
    let sparse = folder_jobs(
        &input,
        &output_root,
        &ExtractionWindow::new(0.0, None, 2.0),
    )
    .unwrap();
    let result = run_batch(&sparse, open_synthetic, &mut writer, true, &signal, &progress);

    assert_eq!(result.successful, 2);
    assert_eq!(result.frames_written, 2);
    assert_eq!(get_frames_count(&output_root.join("alpha")).unwrap(), 1);
    assert_eq!(get_frames_count(&output_root.join("beta")).unwrap(), 1);
    assert_eq!(
        jpg_names(&output_root.join("beta")),
        vec!["000001.jpg", "notes.txt"]
    );
}
