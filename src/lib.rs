//! AI Hub egg-defect XML to YOLO format converter
//!
//! This library converts per-image XML box annotations into YOLO text labels,
//! writes the `data.yaml` manifest and reports class balance of a converted dataset.

pub mod analysis;
pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use analysis::{analyze_dataset, DatasetAnalysis};
pub use config::{Args, StatsArgs};
pub use conversion::{convert_annotation, parse_xml_annotation};
pub use dataset::{process_dataset, process_split, ConversionSummary, ImageOutcome};
pub use error::{ConversionWarning, ConvertError};
pub use io::setup_output_directories;
pub use types::{ConversionStats, EggClass, NormalizedBox, OutputDirs, SplitPaths};
