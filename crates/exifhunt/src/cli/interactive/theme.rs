//! Prompt theme and the interactive welcome header.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;
use exifhunt_core::pipeline::tool_available;

/// Tools video support shells out to, and what each one is for.
const VIDEO_TOOLS: &[(&str, &str)] = &[
    ("ffprobe", "video metadata"),
    ("ffmpeg", "video thumbnails"),
];

/// Yellow prompts with `[x]` checkboxes for the media-kind picker.
pub fn exifhunt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("›".to_string()).for_stderr().yellow().bold(),
        prompt_suffix: style(":".to_string()).for_stderr().dim(),
        active_item_prefix: style(">".to_string()).for_stderr().yellow().bold(),
        active_item_style: Style::new().for_stderr().bold(),
        checked_item_prefix: style("[x]".to_string()).for_stderr().yellow(),
        unchecked_item_prefix: style("[ ]".to_string()).for_stderr().dim(),
        values_style: Style::new().for_stderr().yellow(),
        ..ColorfulTheme::default()
    }
}

/// Header lines: name and version, then one status line per video tool.
fn header_lines(version: &str, tools: &[(&str, &str, bool)]) -> Vec<String> {
    let mut lines = vec![format!("EXIFHunt {version} · photo & video metadata reports")];
    for (tool, purpose, found) in tools {
        let status = if *found { "found" } else { "not found" };
        lines.push(format!("{tool:<8} {status:<10} ({purpose})"));
    }
    lines
}

/// Print the header to stderr. Missing tools are shown in red since videos
/// then get an entry without metadata or thumbnail.
pub fn print_banner() {
    let tools: Vec<(&str, &str, bool)> = VIDEO_TOOLS
        .iter()
        .map(|(tool, purpose)| (*tool, *purpose, tool_available(tool)))
        .collect();
    let lines = header_lines(exifhunt_core::VERSION, &tools);

    let title = Style::new().for_stderr().yellow().bold();
    let ok = Style::new().for_stderr().dim();
    let missing = Style::new().for_stderr().red();

    eprintln!();
    if let Some((first, rest)) = lines.split_first() {
        eprintln!("  {}", title.apply_to(first));
        for (line, (_, _, found)) in rest.iter().zip(&tools) {
            let paint = if *found { &ok } else { &missing };
            eprintln!("    {}", paint.apply_to(line));
        }
    }
    eprintln!();
}
