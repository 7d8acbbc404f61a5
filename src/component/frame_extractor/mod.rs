//! 影片擷幀元件
//!
//! 依時間範圍與取樣率定位、解碼並輸出連號 JPEG：
//! 1. 以毫秒定位來源並解碼一幀（`sample_frame_at`）
//! 2. 依 `1 / fps` 前進時間點，四捨五入到 0.01 秒
//! 3. 解碼成功的幀寫成 `{序號:06}.jpg`，序號從 1 開始

mod batch;
mod extractor;
mod ffmpeg_source;
mod frame_writer;
mod main;
mod manifest;
mod video_source;

pub use batch::{BatchJob, BatchResult, folder_jobs, manifest_jobs, run_batch};
pub use extractor::{
    DEFAULT_FPS, ExtractionResult, ExtractionWindow, MAX_FPS, StopReason, extract_frames,
    frame_output_path, normalize_output_dir, round_to_centis,
};
pub use ffmpeg_source::FfmpegVideoSource;
pub use frame_writer::{DEFAULT_JPEG_QUALITY, FrameWriter, JpegFrameWriter};
pub use main::FrameExtractor;
pub use manifest::{Manifest, ManifestEntry, load_manifest};
pub use video_source::{Frame, VideoSource, sample_frame_at};
