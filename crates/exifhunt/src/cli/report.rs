//! The `exifhunt report` command.

use clap::{Args, ValueEnum};
use exifhunt_core::{
    BatchDriver, BatchOutcome, BatchRequest, Config, ExifHuntError, FileDiscovery, MediaKind,
    ReportFormat,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Report formats accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// PDF with thumbnails
    Pdf,
    /// Plain text
    Text,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ReportFormat::Pdf,
            FormatArg::Text => ReportFormat::Text,
        }
    }
}

/// Arguments for the `report` command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Folder containing the images and videos
    pub input: PathBuf,

    /// Output folder (defaults to the configured output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include images (with --videos, both; with neither, the config decides)
    #[arg(long)]
    pub images: bool,

    /// Include videos
    #[arg(long)]
    pub videos: bool,

    /// Report format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Longest thumbnail edge in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(100..=600))]
    pub thumbnail_size: Option<u32>,

    /// Leave out "File Size:" lines in the PDF
    #[arg(long)]
    pub no_file_size: bool,

    /// Leave out "Created:"/"Modified:" lines in the PDF
    #[arg(long)]
    pub no_timestamps: bool,

    /// Keep the thumbnail folder after the run
    #[arg(long)]
    pub keep_thumbnails: bool,

    /// Open the report when done
    #[arg(long)]
    pub open: bool,
}

/// Manual Default impl for constructing ReportArgs outside of clap.
///
/// Used by the interactive module to build ReportArgs field-by-field.
impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            images: false,
            videos: false,
            format: None,
            thumbnail_size: None,
            no_file_size: false,
            no_timestamps: false,
            keep_thumbnails: false,
            open: false,
        }
    }
}

impl ReportArgs {
    /// Fold command-line overrides into a copy of the loaded config.
    fn effective_config(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if let Some(size) = self.thumbnail_size {
            config.thumbnail.max_dim = size;
        }
        if self.no_file_size {
            config.report.include_file_size = false;
        }
        if self.no_timestamps {
            config.report.include_timestamps = false;
        }
        if self.keep_thumbnails {
            config.thumbnail.cleanup_after_run = false;
        }
        if self.open {
            config.report.open_when_done = true;
        }
        config
    }

    fn request(&self, config: &Config) -> BatchRequest {
        let (include_images, include_videos) = if self.images || self.videos {
            (self.images, self.videos)
        } else {
            (config.scan.include_images, config.scan.include_videos)
        };
        BatchRequest {
            input_dir: self.input.clone(),
            output_dir: self.output.clone().unwrap_or_else(|| config.output_dir()),
            include_images,
            include_videos,
            format: self.format.map(Into::into),
        }
    }
}

/// Execute the report command and return the path of the written report.
pub fn execute(args: ReportArgs, config: &Config) -> anyhow::Result<PathBuf> {
    let config = args.effective_config(config);
    let request = args.request(&config);

    let driver = BatchDriver::new(&config);
    driver.check_request(&request)?;
    warn_if_incompatible(&request.input_dir);

    let progress = create_progress_bar();
    let start = Instant::now();

    let outcome = driver.run_with_progress(&request, |index, total, file| {
        progress.set_length(total as u64);
        progress.set_position(index as u64);
        progress.set_message(file.file_name.clone());
    });
    progress.finish_and_clear();
    let outcome = outcome?;

    print_summary(&outcome, start.elapsed());
    println!("{}", outcome.report_path.display());

    if config.report.open_when_done {
        open_report(&outcome.report_path)?;
    }

    Ok(outcome.report_path)
}

/// Warn when the folder holds nothing ExifHunt can read. Returns whether it
/// warned; a folder that cannot be listed is left for the run to report.
fn warn_if_incompatible(dir: &Path) -> bool {
    match FileDiscovery::contains_compatible_files(dir) {
        Ok(true) => false,
        Ok(false) => {
            tracing::warn!("The folder contains no compatible images/videos.");
            true
        }
        Err(e) => {
            tracing::debug!("Could not list {}: {e}", dir.display());
            false
        }
    }
}

/// Hand a finished report to the system viewer.
///
/// A missing report is an error; a viewer that fails to launch is not.
pub fn open_report(path: &Path) -> Result<(), ExifHuntError> {
    if !path.is_file() {
        return Err(ExifHuntError::ReportMissing(path.to_path_buf()));
    }
    if let Err(e) = opener::open(path) {
        tracing::warn!("Could not open {}: {e}", path.display());
    }
    Ok(())
}

fn create_progress_bar() -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("scanning...");
    pb
}

/// Print a short summary of the run to stderr.
fn print_summary(outcome: &BatchOutcome, elapsed: Duration) {
    let images = outcome
        .entries
        .iter()
        .filter(|e| e.kind == MediaKind::Image)
        .count();
    let videos = outcome.entries.len() - images;
    let without_metadata = outcome
        .entries
        .iter()
        .filter(|e| e.metadata.is_empty())
        .count();

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Images:       {:>8}", images);
    eprintln!("    Videos:       {:>8}", videos);
    if without_metadata > 0 {
        eprintln!("    No metadata:  {:>8}", without_metadata);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", outcome.entries.len());
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
}
