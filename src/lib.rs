// Library exports for testing and reuse

pub mod archive;
pub mod cli;
pub mod convert;
pub mod corine;
pub mod error;
pub mod names;
pub mod normalize;
pub mod pipeline;
pub mod raster;
pub mod stats;
pub mod walker;

// Re-export commonly used types
pub use convert::{convert_image, convert_mask, convert_mask_remapped, MaskDepth, Outcome};
pub use corine::{l1_bucket, l3_bucket, l3_code, remap_mask, CorineLevel, L3_CODES};
pub use error::{PrepError, Result};
pub use names::{BandName, MaskName};
pub use normalize::normalize_band;
pub use pipeline::RunSummary;
pub use stats::{collect_statistics, save_statistics, ClassCounts};
pub use walker::{list_tiles, FileFilter};
