use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// 無法取得幀率時的預設值
const FALLBACK_FRAME_RATE: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

impl VideoInfo {
    /// 單一來源幀的長度（秒）
    #[must_use]
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// 一張 RGB24 幀的位元組數
    #[must_use]
    pub const fn rgb_frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

#[derive(Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

/// 使用 ffprobe 讀取第一條視訊串流的資訊
pub fn get_video_info(path: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate,duration:format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("無法解析影片資訊: {}", path.display()))
}

fn parse_probe_output(json: &str) -> Result<VideoInfo> {
    let probe: ProbeOutput = serde_json::from_str(json).context("無法解析 ffprobe 輸出")?;

    let stream = probe
        .streams
        .first()
        .ok_or_else(|| anyhow!("找不到視訊串流"))?;

    let width = stream.width.ok_or_else(|| anyhow!("無法取得影片寬度"))?;
    let height = stream.height.ok_or_else(|| anyhow!("無法取得影片高度"))?;
    if width == 0 || height == 0 {
        bail!("影片尺寸無效: {width}x{height}");
    }

    // 優先使用容器長度，其次串流長度
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(stream.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| anyhow!("無法取得影片長度"))?;

    let frame_rate = [&stream.avg_frame_rate, &stream.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|r| parse_frame_rate(r))
        .unwrap_or(FALLBACK_FRAME_RATE);

    Ok(VideoInfo {
        duration_seconds,
        width,
        height,
        frame_rate,
    })
}

/// 解析幀率字串（例如 "30/1"、"30000/1001" 或 "25"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.parse().ok()?,
    };

    (value.is_finite() && value > 0.0).then_some(value)
}
