//! Settings editor.
//!
//! Changes apply to the running session immediately and are written to the
//! config file only on "Save". "Reset to defaults" restores the built-in
//! values.

use console::Style;
use dialoguer::{Confirm, Input, Select};
use exifhunt_core::config::{MAX_THUMBNAIL_DIM, MIN_THUMBNAIL_DIM};
use exifhunt_core::{Config, ReportFormat};

use super::theme::exifhunt_theme;
use super::{format_label, yes_no};

/// Menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setting {
    ThumbnailSize,
    FileSize,
    Timestamps,
    Cleanup,
    OpenWhenDone,
    DefaultFormat,
    Save,
    Reset,
    Back,
}

const SETTINGS: &[Setting] = &[
    Setting::ThumbnailSize,
    Setting::FileSize,
    Setting::Timestamps,
    Setting::Cleanup,
    Setting::OpenWhenDone,
    Setting::DefaultFormat,
    Setting::Save,
    Setting::Reset,
    Setting::Back,
];

fn label(setting: Setting, config: &Config) -> String {
    match setting {
        Setting::ThumbnailSize => format!("Thumbnail size: {}px", config.thumbnail.max_dim),
        Setting::FileSize => format!(
            "Include file size: {}",
            yes_no(config.report.include_file_size)
        ),
        Setting::Timestamps => format!(
            "Include timestamps: {}",
            yes_no(config.report.include_timestamps)
        ),
        Setting::Cleanup => format!(
            "Delete thumbnails after run: {}",
            yes_no(config.thumbnail.cleanup_after_run)
        ),
        Setting::OpenWhenDone => format!(
            "Open report when done: {}",
            yes_no(config.report.open_when_done)
        ),
        Setting::DefaultFormat => format!(
            "Default format: {}",
            format_label(config.report.default_format)
        ),
        Setting::Save => "Save settings".to_string(),
        Setting::Reset => "Reset to defaults".to_string(),
        Setting::Back => "Back".to_string(),
    }
}

/// Accept sizes inside the supported thumbnail range.
fn check_thumbnail_size(size: &u32) -> Result<(), String> {
    if (MIN_THUMBNAIL_DIM..=MAX_THUMBNAIL_DIM).contains(size) {
        Ok(())
    } else {
        Err(format!(
            "Thumbnail size must be between {MIN_THUMBNAIL_DIM} and {MAX_THUMBNAIL_DIM}"
        ))
    }
}

/// Let the user adjust settings for this session and optionally save them.
pub fn edit_settings(config: &mut Config) -> anyhow::Result<()> {
    let theme = exifhunt_theme();
    let ok = Style::new().for_stderr().green();
    let err = Style::new().for_stderr().red();

    loop {
        let items: Vec<String> = SETTINGS.iter().map(|s| label(*s, config)).collect();
        let Some(index) = Select::with_theme(&theme)
            .with_prompt("Settings")
            .items(&items)
            .default(0)
            .interact_opt()?
        else {
            break;
        };

        match SETTINGS[index] {
            Setting::ThumbnailSize => {
                if let Some(size) = super::handle_interrupt(
                    Input::<u32>::with_theme(&theme)
                        .with_prompt(format!(
                            "Thumbnail size ({MIN_THUMBNAIL_DIM}-{MAX_THUMBNAIL_DIM} px)"
                        ))
                        .default(config.thumbnail.max_dim)
                        .validate_with(check_thumbnail_size)
                        .interact_text(),
                )? {
                    config.thumbnail.max_dim = size;
                }
            }
            Setting::FileSize => {
                config.report.include_file_size = !config.report.include_file_size;
            }
            Setting::Timestamps => {
                config.report.include_timestamps = !config.report.include_timestamps;
            }
            Setting::Cleanup => {
                config.thumbnail.cleanup_after_run = !config.thumbnail.cleanup_after_run;
            }
            Setting::OpenWhenDone => {
                config.report.open_when_done = !config.report.open_when_done;
            }
            Setting::DefaultFormat => {
                let choices = &["PDF", "Text", "Ask each time"];
                let current = match config.report.default_format {
                    Some(ReportFormat::Pdf) => 0,
                    Some(ReportFormat::Text) => 1,
                    None => 2,
                };
                match Select::with_theme(&theme)
                    .with_prompt("Default format")
                    .items(choices)
                    .default(current)
                    .interact_opt()?
                {
                    Some(0) => config.report.default_format = Some(ReportFormat::Pdf),
                    Some(1) => config.report.default_format = Some(ReportFormat::Text),
                    Some(2) => config.report.default_format = None,
                    _ => {}
                }
            }
            Setting::Save => {
                let path = Config::default_path();
                match config.save_to(&path) {
                    Ok(()) => {
                        tracing::info!("Settings saved to {}", path.display());
                        eprintln!("  {} Saved to {}", ok.apply_to("✓"), path.display());
                    }
                    Err(e) => eprintln!("  {} {e}", err.apply_to("✗")),
                }
            }
            Setting::Reset => {
                let confirm = Confirm::with_theme(&theme)
                    .with_prompt("Restore all settings to their defaults?")
                    .default(false)
                    .interact_opt()?;
                if matches!(confirm, Some(true)) {
                    *config = Config::default();
                    eprintln!(
                        "  {} Defaults restored (choose \"Save settings\" to keep them)",
                        ok.apply_to("✓")
                    );
                }
            }
            Setting::Back => break,
        }
    }

    Ok(())
}
