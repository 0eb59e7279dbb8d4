//! ExifHunt Core - metadata reports for folders of photos and videos.
//!
//! ExifHunt reads the files directly inside one folder, extracts EXIF tags
//! from images and container fields from videos, and writes a single report:
//! a paginated PDF with thumbnails, or a plain text file.
//!
//! # Architecture
//!
//! ```text
//! Folder → Discover → Extract Metadata → (Thumbnails) → Render → exif_<ts>.{pdf,txt}
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use exifhunt_core::{BatchDriver, BatchRequest, Config, ReportFormat};
//!
//! fn main() -> exifhunt_core::Result<()> {
//!     let config = Config::load()?;
//!     let driver = BatchDriver::new(&config);
//!
//!     let outcome = driver.run(&BatchRequest {
//!         input_dir: "./photos".into(),
//!         output_dir: config.output_dir(),
//!         include_images: true,
//!         include_videos: true,
//!         format: Some(ReportFormat::Text),
//!     })?;
//!     println!("Report: {}", outcome.report_path.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod types;

pub use config::Config;
pub use error::{
    ConfigError, ExifHuntError, InputError, PipelineError, PipelineResult, ReportError, Result,
};
pub use pipeline::{BatchDriver, BatchOutcome, BatchRequest, FileDiscovery};
pub use report::{ReportFormat, ReportOptions};
pub use types::{MediaEntry, MediaKind, Metadata, MetadataValue};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
