use anyhow::{Result, bail};
use log::{debug, error};
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// 建立資料夾後等待其可見的最長時間
pub const FOLDER_VISIBLE_TIMEOUT: Duration = Duration::from_secs(10);

const INITIAL_BACKOFF: Duration = Duration::from_millis(10);
const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// 建立資料夾的結果
#[derive(Debug)]
pub enum FolderStatus {
    Created,
    AlreadyExists,
    Failed(io::Error),
}

impl FolderStatus {
    /// 舊版整數代碼：0 = 已建立，-1 = 已存在，1 = 失敗
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Created => 0,
            Self::AlreadyExists => -1,
            Self::Failed(_) => 1,
        }
    }
}

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// 建立單層資料夾，以值回傳三態結果
///
/// 父資料夾必須已存在。建立成功後會等待路徑可見。
pub fn create_folder(path: &Path) -> FolderStatus {
    match std::fs::create_dir(path) {
        Ok(()) => match wait_for_path(path, FOLDER_VISIBLE_TIMEOUT) {
            Ok(()) => FolderStatus::Created,
            Err(e) => {
                error!("資料夾建立後無法存取 {}: {e}", path.display());
                FolderStatus::Failed(io::Error::new(io::ErrorKind::TimedOut, e.to_string()))
            }
        },
        Err(_) if path.exists() => FolderStatus::AlreadyExists,
        Err(e) => {
            error!("無法建立資料夾 {}: {e}", path.display());
            FolderStatus::Failed(e)
        }
    }
}

/// 等待路徑出現，使用指數退避輪詢直到逾時
pub fn wait_for_path(path: &Path, timeout: Duration) -> Result<()> {
    let started = Instant::now();
    let mut backoff = INITIAL_BACKOFF;

    while !path.exists() {
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            bail!(
                "等待路徑逾時 ({:.1}s): {}",
                timeout.as_secs_f64(),
                path.display()
            );
        }

        let sleep_for = backoff.min(timeout - elapsed);
        debug!("路徑尚未出現，{}ms 後重試: {}", sleep_for.as_millis(), path.display());
        thread::sleep(sleep_for);
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }

    Ok(())
}
