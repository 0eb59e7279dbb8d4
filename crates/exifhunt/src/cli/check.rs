//! The `exifhunt check` command: will this folder produce a useful report?

use clap::Args;
use exifhunt_core::{Config, FileDiscovery, InputError, MediaKind};
use std::path::{Path, PathBuf};

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Folder to inspect
    pub input: PathBuf,
}

/// What a folder holds, as far as a report is concerned.
#[derive(Debug, PartialEq, Eq)]
pub struct FolderCheck {
    /// Any entry matches the broad compatibility lists
    pub compatible: bool,
    /// Images a default run would include
    pub images: usize,
    /// Videos a default run would include
    pub videos: usize,
}

/// Inspect `dir` without reading any file contents.
pub fn inspect(dir: &Path, config: &Config) -> anyhow::Result<FolderCheck> {
    if !dir.is_dir() {
        return Err(InputError::FolderNotFound(dir.to_path_buf()).into());
    }
    let compatible = FileDiscovery::contains_compatible_files(dir)?;
    let files = FileDiscovery::new(config.scan.clone()).discover(
        dir,
        config.scan.include_images,
        config.scan.include_videos,
    );
    let images = files.iter().filter(|f| f.kind == MediaKind::Image).count();
    Ok(FolderCheck {
        compatible,
        images,
        videos: files.len() - images,
    })
}

/// Execute the check command.
pub fn execute(args: CheckArgs, config: &Config) -> anyhow::Result<()> {
    let check = inspect(&args.input, config)?;

    if !check.compatible {
        println!("The folder contains no compatible images/videos.");
        return Ok(());
    }
    println!(
        "{}: {} image(s) and {} video(s) will be included",
        args.input.display(),
        check.images,
        check.videos
    );
    Ok(())
}
