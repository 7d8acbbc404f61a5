use super::video_source::{Frame, VideoSource};
use crate::tools::{VideoInfo, get_video_info};
use anyhow::{Context, Result, bail};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 以 ffmpeg 逐幀解碼的影片來源
///
/// 每次讀取都會啟動一個 ffmpeg 程序，將指定時間點的幀以 RGB24 輸出到 stdout。
pub struct FfmpegVideoSource {
    path: PathBuf,
    info: VideoInfo,
    position_sec: f64,
}

impl FfmpegVideoSource {
    /// 開啟影片並以 ffprobe 讀取尺寸、長度與幀率
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("影片檔案不存在: {}", path.display());
        }

        let info = get_video_info(path)?;
        debug!(
            "開啟影片 {}: {:.2}s, {}x{}, {:.2} fps",
            path.display(),
            info.duration_seconds,
            info.width,
            info.height,
            info.frame_rate
        );

        Ok(Self {
            path: path.to_path_buf(),
            info,
            position_sec: 0.0,
        })
    }

    fn build_command(&self, timestamp: f64) -> Command {
        let t0 = (timestamp - SEEK_MARGIN).max(0.0);
        let delta = timestamp - t0;

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error"]);

        // 第一個 -ss（在 -i 前）：快速跳到附近的關鍵幀
        if t0 > 0.0 {
            cmd.args(["-ss", &format!("{t0:.3}")]);
        }

        // 輸出維持儲存尺寸，與 ffprobe 回報的寬高一致
        cmd.arg("-noautorotate");
        cmd.arg("-i").arg(&self.path);

        // 第二個 -ss（在 -i 後）：精準解碼到目標時間
        if delta > 0.0 {
            cmd.args(["-ss", &format!("{delta:.3}")]);
        }

        cmd.args([
            "-map", "0:v:0",
            "-frames:v", "1",
            "-an", "-sn", "-dn",
            "-f", "rawvideo",
            "-pix_fmt", "rgb24",
            "pipe:1",
        ]);

        cmd
    }
}

impl VideoSource for FfmpegVideoSource {
    fn seek_ms(&mut self, position_ms: f64) -> Result<()> {
        self.position_sec = (position_ms / 1000.0).max(0.0);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let timestamp = self.position_sec;
        if timestamp >= self.info.duration_seconds {
            debug!("超出影片長度: {timestamp:.3}s");
            return Ok(None);
        }

        let output = self
            .build_command(timestamp)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("無法執行 ffmpeg 解碼: {}", self.path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("ffmpeg 解碼失敗 {timestamp:.3}s: {}", stderr.trim());
            return Ok(None);
        }

        let expected = self.info.rgb_frame_len();
        let mut data = output.stdout;
        if data.len() < expected {
            debug!(
                "解碼資料不足 {timestamp:.3}s: {} / {expected} bytes",
                data.len()
            );
            return Ok(None);
        }
        data.truncate(expected);

        // 模擬循序解碼：讀取後前進一個來源幀
        self.position_sec += self.info.frame_duration();

        Ok(Some(Frame {
            width: self.info.width,
            height: self.info.height,
            data,
            timestamp,
        }))
    }
}
