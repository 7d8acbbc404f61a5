use crate::component::FrameExtractor;
use crate::config::Config;
use crate::pause;
use crate::tools::{
    Timecode, get_frames_count, get_subfolders_path, run_cmd, sec_to_timecode,
    validate_directory_exists,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::Input;
use log::warn;
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn report_error(e: &anyhow::Error) {
    eprintln!("{} {e:#}", style(t!("common.error")).red().bold());
}

pub fn run_single_extraction(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let mut extractor = FrameExtractor::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = extractor.run_single() {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_folder_extraction(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let mut extractor = FrameExtractor::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = extractor.run_folder() {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_manifest_extraction(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let mut extractor = FrameExtractor::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = extractor.run_manifest() {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}

/// 統計幀資料夾：子資料夾逐一統計，根目錄本身有編號幀時也一併統計
pub fn run_frame_counter(term: &Term, config: &Config) -> Result<()> {
    println!("{}", style(t!("counter.title")).cyan().bold());

    let path: String = Input::new()
        .with_prompt(t!("counter.prompt_dir"))
        .interact_text()?;
    let root = PathBuf::from(path.trim());

    if let Err(e) = count_frames_under(&root, config.settings.extraction.fps) {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}

/// 需要統計的資料夾；根目錄有編號幀或沒有子資料夾時排在最前面
fn frame_folders(root: &Path) -> Result<Vec<PathBuf>> {
    validate_directory_exists(root)?;

    let mut folders = get_subfolders_path(root)?;
    if folders.is_empty() || get_frames_count(root).is_ok() {
        folders.insert(0, root.to_path_buf());
    }
    Ok(folders)
}

fn count_with_span(folder: &Path, fps: f64) -> Result<(usize, Timecode)> {
    let count = get_frames_count(folder)?;
    let span = sec_to_timecode(count as f64 / fps)?;
    Ok((count, span))
}

fn count_frames_under(root: &Path, fps: f64) -> Result<()> {
    for folder in &frame_folders(root)? {
        let name = folder
            .file_name()
            .map_or_else(|| folder.display().to_string(), |n| n.to_string_lossy().to_string());

        match count_with_span(folder, fps) {
            Ok((count, span)) => {
                println!(
                    "  {} {}",
                    style("✓").green(),
                    t!("counter.result", name = name, count = count, span = span, fps = fps)
                );
            }
            Err(e) => {
                warn!("無法統計幀數 {}: {e}", folder.display());
                println!("  {} {name}: {e}", style("✗").red());
            }
        }
    }

    Ok(())
}

pub fn run_shell_command(term: &Term) -> Result<()> {
    println!("{}", style(t!("shell.title")).cyan().bold());

    let cmd: String = Input::new()
        .with_prompt(t!("shell.prompt"))
        .interact_text()?;

    match run_cmd(cmd.trim()) {
        Ok(output) => {
            print!("{}", output.output);
            let code = output
                .status_code
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            let line = t!("shell.exit_code", code = code);
            if output.success() {
                println!("{}", style(line).dim());
            } else {
                println!("{}", style(line).yellow());
            }
        }
        Err(e) => report_error(&e),
    }

    pause(term)?;
    Ok(())
}
