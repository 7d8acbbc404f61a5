use super::video_source::Frame;
use anyhow::{Context, Result, bail};
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JPEG 預設品質
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// 將幀編碼並寫入檔案
pub trait FrameWriter {
    fn write(&mut self, frame: &Frame, path: &Path) -> Result<()>;
}

/// 以 JPEG 格式寫出幀
#[derive(Debug, Clone, Copy)]
pub struct JpegFrameWriter {
    quality: u8,
}

impl Default for JpegFrameWriter {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl JpegFrameWriter {
    /// 品質範圍 1-100，超出範圍會被截斷
    #[must_use]
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    #[must_use]
    pub const fn quality(&self) -> u8 {
        self.quality
    }
}

impl FrameWriter for JpegFrameWriter {
    fn write(&mut self, frame: &Frame, path: &Path) -> Result<()> {
        if !frame.is_complete() {
            bail!(
                "幀資料長度不符: {}x{} 需要 {} bytes，實際 {} bytes",
                frame.width,
                frame.height,
                Frame::expected_len(frame.width, frame.height),
                frame.data.len()
            );
        }

        let file = File::create(path)
            .with_context(|| format!("無法建立圖片檔案: {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        JpegEncoder::new_with_quality(&mut writer, self.quality)
            .encode(&frame.data, frame.width, frame.height, ExtendedColorType::Rgb8)
            .with_context(|| format!("JPEG 編碼失敗: {}", path.display()))?;

        writer
            .flush()
            .with_context(|| format!("無法寫入圖片檔案: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let data = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, 255 - v, v / 2]
            })
            .collect();
        Frame {
            width,
            height,
            data,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_write_jpeg_roundtrip_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("000001.jpg");

        let mut writer = JpegFrameWriter::default();
        writer.write(&gradient_frame(32, 16), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 32);
        assert_eq!(decoded.height(), 16);
    }

    #[test]
    fn test_write_rejects_incomplete_frame() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.jpg");

        let mut frame = gradient_frame(4, 4);
        frame.data.pop();

        let mut writer = JpegFrameWriter::default();
        assert!(writer.write(&frame, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(JpegFrameWriter::new(0).quality(), 1);
        assert_eq!(JpegFrameWriter::new(200).quality(), 100);
        assert_eq!(JpegFrameWriter::new(80).quality(), 80);
    }
}
