//! CSV 擷取清單
//!
//! 每列格式：`video_path,start_sec,end_sec,fps[,output_dir]`。
//! 空白欄位沿用預設值；第一欄為 `video_path` 的列視為標題並略過。
//! 相對路徑以清單檔所在的資料夾為基準。

use super::extractor::ExtractionWindow;
use crate::tools::read_csv;
use anyhow::{Context, Result, anyhow, bail};
use log::warn;
use std::path::{Path, PathBuf};

const HEADER_MARKER: &str = "video_path";

/// 清單中的一筆擷取任務
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// 在 CSV 中的列號（從 1 開始）
    pub line: usize,
    pub video_path: PathBuf,
    pub window: ExtractionWindow,
    pub output_dir: Option<PathBuf>,
}

/// 清單解析結果
#[derive(Debug, Default)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
    /// 無法解析的列：(列號, 錯誤訊息)
    pub invalid_rows: Vec<(usize, String)>,
}

/// 讀取並解析擷取清單
pub fn load_manifest(manifest_path: &Path, defaults: &ExtractionWindow) -> Result<Manifest> {
    let rows = read_csv(manifest_path)?;
    let base_dir = manifest_path.parent().unwrap_or(Path::new("."));

    let mut manifest = Manifest::default();
    for (index, row) in rows.iter().enumerate() {
        let line = index + 1;

        if is_skippable(row) {
            continue;
        }

        match parse_row(row, line, base_dir, defaults) {
            Ok(entry) => manifest.entries.push(entry),
            Err(e) => {
                warn!("清單第 {line} 列無效: {e:#}");
                manifest.invalid_rows.push((line, format!("{e:#}")));
            }
        }
    }

    Ok(manifest)
}

fn is_skippable(row: &[String]) -> bool {
    match row.first() {
        None => true,
        Some(first) => {
            let first = first.trim();
            first.eq_ignore_ascii_case(HEADER_MARKER)
                || (first.is_empty() && row.iter().all(|c| c.trim().is_empty()))
        }
    }
}

fn parse_row(
    row: &[String],
    line: usize,
    base_dir: &Path,
    defaults: &ExtractionWindow,
) -> Result<ManifestEntry> {
    let cell = |i: usize| row.get(i).map(|c| c.trim()).filter(|c| !c.is_empty());

    let video = cell(0).ok_or_else(|| anyhow!("缺少影片路徑"))?;
    if row.len() > 5 {
        bail!("欄位過多: {} 欄", row.len());
    }

    let start_sec = parse_number(cell(1), "start_sec")?.unwrap_or(defaults.start_sec);
    let end_sec = parse_number(cell(2), "end_sec")?.or(defaults.end_sec);
    let fps = parse_number(cell(3), "fps")?.unwrap_or(defaults.fps);

    let window = ExtractionWindow::new(start_sec, end_sec, fps);
    window.validate()?;

    Ok(ManifestEntry {
        line,
        video_path: resolve(base_dir, video),
        window,
        output_dir: cell(4).map(|dir| resolve(base_dir, dir)),
    })
}

fn parse_number(value: Option<&str>, field: &str) -> Result<Option<f64>> {
    value
        .map(|v| {
            v.parse::<f64>()
                .with_context(|| format!("{field} 不是數字: {v}"))
        })
        .transpose()
}

fn resolve(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
