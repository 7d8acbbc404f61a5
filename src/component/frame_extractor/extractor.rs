use super::frame_writer::FrameWriter;
use super::video_source::{VideoSource, sample_frame_at};
use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::{MAIN_SEPARATOR, Path, PathBuf, is_separator};
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEFAULT_FPS: f64 = 10.0;

/// 時間點以 0.01 秒為單位前進，超過此幀率間隔會被捨入為 0
pub const MAX_FPS: f64 = 100.0;

/// 擷取時間範圍與取樣率
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionWindow {
    /// 起始秒數（含）
    pub start_sec: f64,
    /// 結束秒數，`None` 表示不設上限
    pub end_sec: Option<f64>,
    /// 每秒取樣幀數
    pub fps: f64,
}

impl Default for ExtractionWindow {
    fn default() -> Self {
        Self {
            start_sec: 0.0,
            end_sec: None,
            fps: DEFAULT_FPS,
        }
    }
}

impl ExtractionWindow {
    #[must_use]
    pub const fn new(start_sec: f64, end_sec: Option<f64>, fps: f64) -> Self {
        Self {
            start_sec,
            end_sec,
            fps,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.start_sec.is_finite() || self.start_sec < 0.0 {
            bail!("起始秒數無效: {}", self.start_sec);
        }
        if let Some(end) = self.end_sec
            && end.is_nan()
        {
            bail!("結束秒數無效: {end}");
        }
        if !self.fps.is_finite() || self.fps <= 0.0 || self.fps > MAX_FPS {
            bail!("取樣率必須介於 0 與 {MAX_FPS} 之間: {}", self.fps);
        }
        Ok(())
    }

    /// 兩次取樣之間的秒數
    #[must_use]
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.fps
    }

    fn is_past_end(&self, sec: f64) -> bool {
        self.end_sec.is_some_and(|end| sec > end)
    }
}

/// 擷取停止的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 時間點超過 `end_sec`
    WindowEnd,
    /// 來源無法再解碼出幀
    StreamExhausted,
    /// 收到中斷信號
    Cancelled,
}

/// 擷取結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionResult {
    /// 實際寫出的圖片數量
    pub frames_written: usize,
    /// 最後一次取樣使用的序號（含最後失敗的那次）
    pub last_index: usize,
    pub stop_reason: StopReason,
}

/// 取到小數第二位，避免累加誤差
///
/// 以二進位實際值捨入，剛好落在中間時取偶數位（`0.125` -> `0.12`）。
#[must_use]
pub fn round_to_centis(sec: f64) -> f64 {
    format!("{sec:.2}").parse().unwrap_or(sec)
}

/// 確保輸出資料夾路徑以分隔符號結尾
#[must_use]
pub fn normalize_output_dir(output_dir: &Path) -> PathBuf {
    let raw = output_dir.as_os_str();
    if raw.is_empty() {
        return PathBuf::from(format!(".{MAIN_SEPARATOR}"));
    }
    if raw.to_string_lossy().ends_with(is_separator) {
        return output_dir.to_path_buf();
    }

    let mut normalized = raw.to_os_string();
    normalized.push(MAIN_SEPARATOR.to_string());
    PathBuf::from(normalized)
}

/// 第 `index` 張幀的輸出路徑（`{index:06}.jpg`，從 1 開始）
#[must_use]
pub fn frame_output_path(normalized_dir: &Path, index: usize) -> PathBuf {
    let mut path: OsString = normalized_dir.as_os_str().to_os_string();
    path.push(format!("{index:06}.jpg"));
    PathBuf::from(path)
}

/// 依取樣率擷取時間範圍內的幀並寫入輸出資料夾
///
/// 序號在寫出前遞增，因此檔名從 `000001.jpg` 開始。解碼失敗即結束擷取，
/// 已寫出的檔案會保留。
pub fn extract_frames<S, W>(
    source: &mut S,
    writer: &mut W,
    output_dir: &Path,
    window: &ExtractionWindow,
    shutdown_signal: &AtomicBool,
) -> Result<ExtractionResult>
where
    S: VideoSource + ?Sized,
    W: FrameWriter + ?Sized,
{
    window.validate()?;

    let interval = window.frame_interval();
    let output_dir = normalize_output_dir(output_dir);

    let mut current_sec = window.start_sec;
    let mut frame_count = 0;
    let mut frames_written = 0;

    let stop_reason = loop {
        if window.is_past_end(current_sec) {
            break StopReason::WindowEnd;
        }
        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷信號，停止擷取");
            break StopReason::Cancelled;
        }

        let sampled_at = current_sec;
        let frame = sample_frame_at(source, sampled_at)?;
        frame_count += 1;
        current_sec = round_to_centis(current_sec + interval);

        let Some(frame) = frame else {
            debug!("{sampled_at:.2}s 無法取得幀，結束擷取");
            break StopReason::StreamExhausted;
        };

        let path = frame_output_path(&output_dir, frame_count);
        writer
            .write(&frame, &path)
            .with_context(|| format!("無法寫出第 {frame_count} 幀"))?;
        frames_written += 1;
        debug!("幀 {frame_count} ({sampled_at:.2}s) -> {}", path.display());
    };

    info!(
        "擷取完成: {} 張 ({:?})，輸出至 {}",
        frames_written,
        stop_reason,
        output_dir.display()
    );

    Ok(ExtractionResult {
        frames_written,
        last_index: frame_count,
        stop_reason,
    })
}
