//! Media pipeline components.
//!
//! - **discovery**: List a folder and classify files by extension
//! - **metadata**: EXIF tags for images, container fields for videos
//! - **probe**: ffprobe wrapper for video containers
//! - **thumbnail**: JPEG previews for the PDF report
//! - **batch**: Validates a request and drives one report generation

pub mod batch;
pub mod discovery;
pub mod metadata;
pub mod probe;
pub mod thumbnail;

// Re-exports for convenient access
pub use batch::{BatchDriver, BatchOutcome, BatchRequest};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use metadata::MetadataExtractor;
pub use probe::tool_available;
pub use thumbnail::ThumbnailGenerator;
