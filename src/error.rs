use std::io;
use thiserror::Error;

/// Non-fatal problems found while converting an annotation.
///
/// The affected record (or, for `MissingSizeInfo`, the whole file) is skipped
/// and conversion carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionWarning {
    #[error("no usable size info (width and height must be positive)")]
    MissingSizeInfo,

    #[error("unknown state {0:?}")]
    UnknownState(Option<String>),

    #[error("invalid bbox coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("invalid bbox: {x_center}, {y_center}, {width}, {height}")]
    InvalidBox {
        x_center: f64,
        y_center: f64,
        width: f64,
        height: f64,
    },
}

/// Errors that stop processing of a single image (counted under `error`).
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("invalid image size {0:?}")]
    InvalidSize(String),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
