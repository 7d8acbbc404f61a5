use crate::tools::get_files_path;
use anyhow::{Context, Result, bail};
use log::debug;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static FRAME_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\.|$)").expect("frame name pattern"));

/// 解析幀檔名的序號（例如 `000012.jpg` -> 12）
fn parse_frame_index(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    FRAME_NAME.captures(name)?.get(1)?.as_str().parse().ok()
}

/// 取得已擷取幀資料夾中的幀數
///
/// 幀以從 1 開始的數字命名，因此最大序號即為幀數。非數字檔名會被忽略。
pub fn get_frames_count(frames_dir: &Path) -> Result<usize> {
    let count = get_files_path(frames_dir)?
        .iter()
        .filter_map(|p| parse_frame_index(p))
        .max();

    match count {
        Some(count) => Ok(count),
        None => bail!("資料夾中沒有編號的幀檔案: {}", frames_dir.display()),
    }
}

/// 刪除資料夾中先前擷取的 `NNNNNN.jpg`，回傳刪除數量
///
/// 其他檔案與子資料夾不受影響。
pub fn clear_frames(frames_dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for path in get_files_path(frames_dir)? {
        let is_jpg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"));
        if is_jpg && parse_frame_index(&path).is_some() {
            fs::remove_file(&path)
                .with_context(|| format!("無法刪除舊幀: {}", path.display()))?;
            removed += 1;
        }
    }

    debug!("清除 {} 張舊幀: {}", removed, frames_dir.display());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_frame_index() {
        assert_eq!(parse_frame_index(&PathBuf::from("/x/000012.jpg")), Some(12));
        assert_eq!(parse_frame_index(&PathBuf::from("000001")), Some(1));
        assert_eq!(parse_frame_index(&PathBuf::from("thumbs.db")), None);
        assert_eq!(parse_frame_index(&PathBuf::from("12a.jpg")), None);
    }

    #[test]
    fn test_get_frames_count_ignores_non_numeric() {
        let temp_dir = TempDir::new().unwrap();
        for i in 1..=7 {
            fs::write(temp_dir.path().join(format!("{i:06}.jpg")), "f").unwrap();
        }
        fs::write(temp_dir.path().join("notes.txt"), "n").unwrap();
        fs::write(temp_dir.path().join("zz_cover.jpg"), "c").unwrap();

        assert_eq!(get_frames_count(temp_dir.path()).unwrap(), 7);
    }

    #[test]
    fn test_get_frames_count_empty_folder() {
        let temp_dir = TempDir::new().unwrap();
        assert!(get_frames_count(temp_dir.path()).is_err());
    }

    #[test]
    fn test_clear_frames_keeps_other_files() {
        let temp_dir = TempDir::new().unwrap();
        for i in 1..=5 {
            fs::write(temp_dir.path().join(format!("{i:06}.jpg")), "f").unwrap();
        }
        fs::write(temp_dir.path().join("000001.txt"), "n").unwrap();
        fs::write(temp_dir.path().join("cover.jpg"), "c").unwrap();

        assert_eq!(clear_frames(temp_dir.path()).unwrap(), 5);
        assert_eq!(get_frames_count(temp_dir.path()).unwrap(), 1);
        assert!(temp_dir.path().join("cover.jpg").exists());
        assert!(!temp_dir.path().join("000003.jpg").exists());
    }
}
