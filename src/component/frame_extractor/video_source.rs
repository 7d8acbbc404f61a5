use anyhow::Result;

/// 解碼後的 RGB8 影像
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// 逐列排列的 RGB 像素，長度為 `width * height * 3`
    pub data: Vec<u8>,
    /// 讀取此幀時的來源時間點（秒）
    pub timestamp: f64,
}

impl Frame {
    #[must_use]
    pub const fn expected_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.data.len() == Self::expected_len(self.width, self.height)
    }
}

/// 可依時間點定位並逐幀解碼的影片來源
///
/// 來源由呼叫端開啟並擁有，擷取流程只會借用它讀取。
pub trait VideoSource {
    /// 定位到指定時間點（毫秒）
    fn seek_ms(&mut self, position_ms: f64) -> Result<()>;

    /// 解碼下一幀；串流結束或解碼失敗時回傳 `None`
    fn read_frame(&mut self) -> Result<Option<Frame>>;
}

/// 取得指定秒數的單張幀
///
/// 超出影片長度不視為錯誤，只會回傳 `None`。
pub fn sample_frame_at<S: VideoSource + ?Sized>(source: &mut S, sec: f64) -> Result<Option<Frame>> {
    source.seek_ms(sec * 1000.0)?;
    source.read_frame()
}
