mod csv_reader;
mod ffprobe_info;
mod file_tools;
mod frame_counter;
mod path_validator;
mod shell;
mod timecode;

pub use csv_reader::read_csv;
pub use ffprobe_info::{VideoInfo, get_video_info};
pub use file_tools::{get_files_path, get_subfolders_path, make_dir, path_exists};
pub use frame_counter::{clear_frames, get_frames_count};
pub use path_validator::{
    FOLDER_VISIBLE_TIMEOUT, FolderStatus, create_folder, ensure_directory_exists,
    validate_directory_exists, wait_for_path,
};
pub use shell::{CommandOutput, run_cmd};
pub use timecode::{Timecode, sec_to_timecode};
