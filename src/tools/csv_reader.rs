use anyhow::{Context, Result};
use std::path::Path;

/// 讀取 CSV 檔案的所有列，每個欄位皆保留為字串
///
/// 不解析標題列，允許各列欄位數不同。
pub fn read_csv(csv_path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("無法開啟 CSV: {}", csv_path.display()))?;

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .with_context(|| format!("無法解析 CSV: {}", csv_path.display()))
        })
        .collect()
}
