use std::path::Path;

/// 視為影片的副檔名（小寫，不含點）
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "3gp", "avi", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "mts", "ogv", "ts",
    "webm", "wmv",
];

#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("/a/clip.mp4")));
        assert!(is_video_file(Path::new("CLIP.MKV")));
        assert!(!is_video_file(Path::new("frame.jpg")));
        assert!(!is_video_file(Path::new("no_extension")));
    }
}
