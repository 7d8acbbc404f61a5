use crate::config::types::{Config, ExtractionSettings, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// 設定檔位於目前工作目錄
pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    /// 載入設定；檔案不存在或無法解析時使用預設值
    #[must_use]
    pub fn new() -> Self {
        let settings = load_settings(Path::new(SETTINGS_FILE)).unwrap_or_else(|e| {
            warn!("無法載入設定，使用預設值: {e:#}");
            UserSettings::default()
        });

        Self { settings }
    }
}

pub fn load_settings(path: &Path) -> Result<UserSettings> {
    if !path.exists() {
        return Ok(UserSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    let mut settings: UserSettings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

    // 擷幀參數不合法時只重設這一段，保留語言與最近路徑
    if let Err(e) = settings.extraction.window().validate() {
        warn!("擷幀設定無效，改用預設值: {e}");
        settings.extraction = ExtractionSettings::default();
    }

    Ok(settings)
}
