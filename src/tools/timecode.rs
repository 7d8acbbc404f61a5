use anyhow::{Result, bail};
use std::fmt;

/// 時:分:秒.微秒
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    pub micros: u32,
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:06}",
            self.hours, self.minutes, self.seconds, self.micros
        )
    }
}

/// 將秒數轉換為時間碼（四捨五入到微秒）
pub fn sec_to_timecode(sec: f64) -> Result<Timecode> {
    if !sec.is_finite() || sec < 0.0 {
        bail!("無效的秒數: {sec}");
    }

    let total_micros = (sec * 1_000_000.0).round() as u64;
    let total_secs = total_micros / 1_000_000;

    Ok(Timecode {
        hours: total_secs / 3600,
        minutes: ((total_secs / 60) % 60) as u8,
        seconds: (total_secs % 60) as u8,
        micros: (total_micros % 1_000_000) as u32,
    })
}
