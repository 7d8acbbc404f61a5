use crate::component::frame_extractor::{DEFAULT_FPS, DEFAULT_JPEG_QUALITY, ExtractionWindow};
use serde::{Deserialize, Serialize};

pub const MAX_RECENT_PATHS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    English,
    #[serde(rename = "zh-TW")]
    TraditionalChinese,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::English, Self::TraditionalChinese];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::TraditionalChinese => "zh-TW",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::TraditionalChinese => "繁體中文",
        }
    }
}

/// 擷幀預設參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub start_sec: f64,
    /// `None` 表示擷取到影片結尾
    pub end_sec: Option<f64>,
    pub fps: f64,
    /// JPEG 品質 (1-100)
    pub jpeg_quality: u8,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            start_sec: 0.0,
            end_sec: None,
            fps: DEFAULT_FPS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ExtractionSettings {
    #[must_use]
    pub const fn window(&self) -> ExtractionWindow {
        ExtractionWindow::new(self.start_sec, self.end_sec, self.fps)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub extraction: ExtractionSettings,
    pub recent_paths: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
