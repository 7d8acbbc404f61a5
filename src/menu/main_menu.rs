use crate::component::frame_extractor::{ExtractionWindow, MAX_FPS};
use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::{
    run_folder_extraction, run_frame_counter, run_manifest_extraction, run_shell_command,
    run_single_extraction,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_single"),
        t!("main_menu.opt_folder"),
        t!("main_menu.opt_manifest"),
        t!("main_menu.opt_counter"),
        t!("main_menu.opt_shell"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => run_single_extraction(term, shutdown_signal, config)?,
        Some(1) => run_folder_extraction(term, shutdown_signal, config)?,
        Some(2) => run_manifest_extraction(term, shutdown_signal, config)?,
        Some(3) => run_frame_counter(term, config)?,
        Some(4) => run_shell_command(term)?,
        Some(5) => show_settings_menu(term, config)?,
        Some(6) | None => return Ok(false),
        _ => unreachable!(),
    }

    Ok(true)
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_extraction"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_extraction_settings_menu(term, config)?,
            Some(1) => show_language_menu(term, config)?,
            Some(2) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 擷幀參數設定
fn show_extraction_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.extraction.title")).cyan().bold());

    let current = config.settings.extraction.clone();

    let start_sec: f64 = Input::new()
        .with_prompt(t!("settings.extraction.start"))
        .default(current.start_sec)
        .validate_with(|v: &f64| -> Result<(), String> {
            if v.is_finite() && *v >= 0.0 {
                Ok(())
            } else {
                Err(t!("settings.extraction.invalid_start").to_string())
            }
        })
        .interact_text()?;

    // 空白代表不設上限
    let end_text: String = Input::new()
        .with_prompt(t!("settings.extraction.end"))
        .default(current.end_sec.map(|e| e.to_string()).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|v: &String| -> Result<(), String> {
            let v = v.trim();
            if v.is_empty() || v.parse::<f64>().is_ok_and(|n| !n.is_nan()) {
                Ok(())
            } else {
                Err(t!("settings.extraction.invalid_end").to_string())
            }
        })
        .interact_text()?;
    let end_text = end_text.trim();
    let end_sec = if end_text.is_empty() {
        None
    } else {
        end_text.parse::<f64>().ok()
    };

    let fps: f64 = Input::new()
        .with_prompt(t!("settings.extraction.fps"))
        .default(current.fps)
        .validate_with(|v: &f64| -> Result<(), String> {
            if ExtractionWindow::new(0.0, None, *v).validate().is_ok() {
                Ok(())
            } else {
                Err(t!("settings.extraction.invalid_fps", max = MAX_FPS).to_string())
            }
        })
        .interact_text()?;

    let jpeg_quality: u8 = Input::new()
        .with_prompt(t!("settings.extraction.quality"))
        .default(current.jpeg_quality)
        .validate_with(|v: &u8| -> Result<(), String> {
            if (1..=100).contains(v) {
                Ok(())
            } else {
                Err(t!("settings.extraction.invalid_quality").to_string())
            }
        })
        .interact_text()?;

    let extraction = &mut config.settings.extraction;
    extraction.start_sec = start_sec;
    extraction.end_sec = end_sec;
    extraction.fps = fps;
    extraction.jpeg_quality = jpeg_quality;

    if config.settings.extraction != current {
        save_settings(&config.settings)?;
        println!("\n{}", style(t!("settings.saved")).green());
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let items: Vec<&str> = Language::ALL.iter().map(Language::display_name).collect();

    let default_index = Language::ALL
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = Language::ALL[selection];

    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            selected_lang.display_name()
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
