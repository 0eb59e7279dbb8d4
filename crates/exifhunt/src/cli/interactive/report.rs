//! Guided report generation.
//!
//! Walks the user through: input folder → output folder → media kinds →
//! format → open when done → confirmation. Builds a `ReportArgs` and delegates
//! to `cli::report::execute()`.

use console::Style;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use exifhunt_core::{Config, FileDiscovery, InputError, ReportFormat};
use std::path::PathBuf;

use super::theme::exifhunt_theme;
use crate::cli::report::{FormatArg, ReportArgs};

const FORMAT_ITEMS: &[&str] = &["PDF (with thumbnails)", "Text"];

/// Walk the user through one report.
pub fn guided_report(config: &Config) -> anyhow::Result<()> {
    let theme = exifhunt_theme();
    let warn = Style::new().for_stderr().yellow();

    // ── Step 1: Input folder ────────────────────────────────────────────────

    let input = loop {
        let Some(raw_path) = super::handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Folder to scan")
                .allow_empty(true)
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        if raw_path.trim().is_empty() {
            eprintln!("  {}", warn.apply_to(InputError::NoFolderSelected));
            continue;
        }

        let path = expand(&raw_path);
        if !path.is_dir() {
            eprintln!(
                "  {}",
                warn.apply_to(InputError::FolderNotFound(path.clone()))
            );
            continue;
        }

        if !FileDiscovery::contains_compatible_files(&path)? {
            eprintln!(
                "  {}",
                warn.apply_to("The folder contains no compatible images/videos.")
            );
            let proceed = Confirm::with_theme(&theme)
                .with_prompt("Use this folder anyway?")
                .default(false)
                .interact_opt()?;
            match proceed {
                Some(true) => {}
                Some(false) => continue,
                None => return Ok(()),
            }
        }

        break path;
    };

    // ── Step 2: Output folder ───────────────────────────────────────────────

    let Some(raw_output) = super::handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt("Output folder")
            .default(config.output_dir().display().to_string())
            .interact_text(),
    )?
    else {
        return Ok(());
    };
    let output = expand(&raw_output);

    // ── Step 3: Media kinds ─────────────────────────────────────────────────

    let (images, videos) = loop {
        let Some(chosen) = MultiSelect::with_theme(&theme)
            .with_prompt("Include (space to toggle)")
            .items(&["Images", "Videos"])
            .defaults(&[config.scan.include_images, config.scan.include_videos])
            .interact_opt()?
        else {
            return Ok(());
        };

        let images = chosen.contains(&0);
        let videos = chosen.contains(&1);
        if !images && !videos {
            eprintln!("  {}", warn.apply_to(InputError::NoMediaKind));
            continue;
        }
        break (images, videos);
    };

    // ── Step 4: Format ──────────────────────────────────────────────────────

    let default_index = match config.report.default_format {
        Some(ReportFormat::Text) => 1,
        _ => 0,
    };
    let format = match Select::with_theme(&theme)
        .with_prompt("Report format")
        .items(FORMAT_ITEMS)
        .default(default_index)
        .interact_opt()?
    {
        Some(1) => FormatArg::Text,
        Some(_) => FormatArg::Pdf,
        None => return Ok(()),
    };

    // ── Step 5: Open when done ──────────────────────────────────────────────

    let Some(open) = Confirm::with_theme(&theme)
        .with_prompt("Open the report when done?")
        .default(config.report.open_when_done)
        .interact_opt()?
    else {
        return Ok(());
    };

    // ── Step 6: Confirmation ────────────────────────────────────────────────

    let bold = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();
    let kinds = match (images, videos) {
        (true, true) => "images and videos",
        (true, false) => "images",
        _ => "videos",
    };
    eprintln!();
    eprintln!(
        "  {}",
        bold.apply_to(format!("Ready to report on {kinds} in {}", input.display()))
    );
    eprintln!(
        "  {}",
        dim.apply_to(format!(
            "Format: {} | Output: {}",
            ReportFormat::from(format),
            output.display()
        ))
    );
    eprintln!();

    let confirm = Confirm::with_theme(&theme)
        .with_prompt("Generate report?")
        .default(true)
        .interact_opt()?;
    if !matches!(confirm, Some(true)) {
        return Ok(());
    }

    // ── Step 7: Build ReportArgs and delegate ───────────────────────────────

    let args = ReportArgs {
        input,
        output: Some(output),
        images,
        videos,
        format: Some(format),
        open,
        ..ReportArgs::default()
    };

    match crate::cli::report::execute(args, config) {
        Ok(path) => {
            let ok = Style::new().for_stderr().green();
            eprintln!("  {} Report saved to {}", ok.apply_to("✓"), path.display());
        }
        Err(e) => {
            let err = Style::new().for_stderr().red();
            eprintln!("  {} {e:#}", err.apply_to("✗"));
        }
    }
    eprintln!();

    Ok(())
}

fn expand(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw.trim()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_trims_and_keeps_plain_paths() {
        assert_eq!(expand("  ./photos "), PathBuf::from("./photos"));
    }

    #[test]
    fn expand_resolves_home() {
        let expanded = expand("~/photos");
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with("photos"));
    }
}
