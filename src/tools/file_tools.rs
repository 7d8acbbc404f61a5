use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn direct_children(path: &Path) -> Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("無法讀取資料夾: {}", path.display()))?;
        children.push(entry.into_path());
    }
    children.sort();
    Ok(children)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// 列出資料夾下（不遞迴）的所有檔案，略過隱藏檔
pub fn get_files_path(path: &Path) -> Result<Vec<PathBuf>> {
    Ok(direct_children(path)?
        .into_iter()
        .filter(|p| p.is_file() && !is_hidden(p))
        .collect())
}

/// 列出資料夾下（不遞迴）所有非檔案的項目
pub fn get_subfolders_path(path: &Path) -> Result<Vec<PathBuf>> {
    Ok(direct_children(path)?
        .into_iter()
        .filter(|p| !p.is_file())
        .collect())
}

#[must_use]
pub fn path_exists(path: &Path) -> bool {
    path.exists()
}

pub fn make_dir(path: &Path) -> Result<()> {
    std::fs::create_dir(path).with_context(|| format!("無法建立資料夾: {}", path.display()))
}
