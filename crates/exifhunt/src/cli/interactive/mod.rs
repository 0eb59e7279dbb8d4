//! Interactive CLI mode, shown for a bare `exifhunt` invocation on a TTY.
//!
//! A menu-driven front end that builds the same `ReportArgs` the flag-based
//! CLI uses and edits the same config file.

pub mod report;
pub mod settings;
pub mod theme;

use console::Style;
use dialoguer::Select;
use exifhunt_core::Config;

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
///
/// Wraps `interact_text()` calls, which have no `_opt` variant.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Main menu options presented to the user.
const MENU_ITEMS: &[&str] = &["Generate report", "Settings", "Show configuration", "Exit"];

/// Entry point for interactive mode.
///
/// Settings changed here apply to later reports in the same session even when
/// they are not saved.
pub fn run(mut config: Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::exifhunt_theme();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => report::guided_report(&config)?,
            Some(1) => settings::edit_settings(&mut config)?,
            Some(2) => show_config(&config)?,
            Some(3) | None => break, // Exit or Ctrl+C / Esc
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn format_label(format: Option<exifhunt_core::ReportFormat>) -> String {
    match format {
        Some(f) => f.to_string(),
        None => "ask each time".to_string(),
    }
}

/// Print a summary of the current settings and offer the full TOML.
fn show_config(config: &Config) -> anyhow::Result<()> {
    let theme = theme::exifhunt_theme();
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();
    let label = Style::new().for_stderr().bold();

    loop {
        eprintln!();
        eprintln!("  {}", cyan.apply_to("Current configuration:"));
        eprintln!();

        let config_path = Config::default_path();
        let path_note = if config_path.exists() {
            "(exists)"
        } else {
            "(using defaults)"
        };

        eprintln!(
            "    {:<20} {} {}",
            label.apply_to("Config file:"),
            config_path.display(),
            dim.apply_to(path_note)
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Output folder:"),
            config.output_dir().display()
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Default format:"),
            format_label(config.report.default_format)
        );
        eprintln!(
            "    {:<20} images: {}, videos: {}",
            label.apply_to("Media kinds:"),
            yes_no(config.scan.include_images),
            yes_no(config.scan.include_videos)
        );
        eprintln!(
            "    {:<20} {}px (cleanup: {})",
            label.apply_to("Thumbnail:"),
            config.thumbnail.max_dim,
            yes_no(config.thumbnail.cleanup_after_run)
        );
        eprintln!(
            "    {:<20} file size: {}, timestamps: {}",
            label.apply_to("PDF details:"),
            yes_no(config.report.include_file_size),
            yes_no(config.report.include_timestamps)
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Log level:"),
            config.logging.level
        );
        eprintln!();

        let items = &["View full config (TOML)", "Show config file path", "Back"];

        let selection = Select::with_theme(&theme)
            .with_prompt("Configuration")
            .items(items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => match config.to_toml() {
                Ok(toml) => {
                    eprintln!();
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!("{toml}");
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!();
                }
                Err(e) => {
                    let err = Style::new().for_stderr().red();
                    eprintln!("  {} Failed to serialize config: {e}", err.apply_to("✗"));
                    eprintln!();
                }
            },
            Some(1) => {
                eprintln!();
                eprintln!("  {}", config_path.display());
                eprintln!();
            }
            Some(2) | None => break, // Back or Esc / Ctrl+C
            _ => unreachable!(),
        }
    }

    Ok(())
}
