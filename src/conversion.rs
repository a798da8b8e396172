use log::warn;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{ConversionWarning, ConvertError};
use crate::types::{EggClass, NormalizedBox, XmlAnnotation, XmlBndBox, XmlSize};

/// Result of converting one annotation document: the kept boxes in input
/// order plus every warning raised along the way.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Conversion {
    pub boxes: Vec<NormalizedBox>,
    pub warnings: Vec<ConversionWarning>,
}

/// Parse an annotation document from a string
pub fn parse_annotation_str(xml: &str) -> Result<XmlAnnotation, ConvertError> {
    Ok(quick_xml::de::from_str(xml)?)
}

/// Read and parse an annotation file, streaming it from disk
pub fn read_annotation_file(path: &Path) -> Result<XmlAnnotation, ConvertError> {
    let file = File::open(path)?;
    Ok(quick_xml::de::from_reader(BufReader::new(file))?)
}

/// Parse an XML annotation file and convert its boxes to YOLO form.
///
/// Warnings are logged with the file path; only unreadable files, malformed
/// XML and non-integer image sizes are returned as errors.
pub fn parse_xml_annotation(path: &Path) -> Result<Vec<NormalizedBox>, ConvertError> {
    let annotation = read_annotation_file(path)?;
    let conversion = convert_annotation(&annotation)?;
    for warning in &conversion.warnings {
        warn!("{} in {}", warning, path.display());
    }
    Ok(conversion.boxes)
}

/// Convert every `bndbox` of an annotation into a normalized box.
///
/// Without a positive image size nothing can be normalized, so the result is
/// empty with a single `MissingSizeInfo` warning. Records with an unknown state,
/// unusable coordinates or an out-of-range result are skipped.
pub fn convert_annotation(annotation: &XmlAnnotation) -> Result<Conversion, ConvertError> {
    let mut conversion = Conversion::default();

    let (img_width, img_height) = match image_size(annotation.size.as_ref())? {
        Some(size) => size,
        None => {
            conversion.warnings.push(ConversionWarning::MissingSizeInfo);
            return Ok(conversion);
        }
    };

    for bndbox in &annotation.bndboxes {
        match convert_bndbox(bndbox, img_width, img_height) {
            Ok(bbox) => conversion.boxes.push(bbox),
            Err(warning) => conversion.warnings.push(warning),
        }
    }

    Ok(conversion)
}

/// Convert a single pixel-space box record
pub fn convert_bndbox(
    bndbox: &XmlBndBox,
    img_width: f64,
    img_height: f64,
) -> Result<NormalizedBox, ConversionWarning> {
    let state = bndbox.state.as_deref().map(str::trim);
    let class = state
        .and_then(EggClass::from_state)
        .ok_or_else(|| ConversionWarning::UnknownState(state.map(str::to_string)))?;

    let x_min = coordinate("x_min", bndbox.x_min.as_deref())?;
    let y_min = coordinate("y_min", bndbox.y_min.as_deref())?;
    let x_max = coordinate("x_max", bndbox.x_max.as_deref())?;
    let y_max = coordinate("y_max", bndbox.y_max.as_deref())?;

    let bbox = NormalizedBox {
        class,
        x_center: (x_min + x_max) / 2.0 / img_width,
        y_center: (y_min + y_max) / 2.0 / img_height,
        width: (x_max - x_min) / img_width,
        height: (y_max - y_min) / img_height,
    };

    // Out-of-range boxes are dropped, never clamped
    if bbox.is_valid() {
        Ok(bbox)
    } else {
        Err(ConversionWarning::InvalidBox {
            x_center: bbox.x_center,
            y_center: bbox.y_center,
            width: bbox.width,
            height: bbox.height,
        })
    }
}

fn coordinate(name: &str, value: Option<&str>) -> Result<f64, ConversionWarning> {
    let value = value.ok_or_else(|| ConversionWarning::InvalidCoordinates(format!("missing {}", name)))?;
    value.trim().parse::<f64>().map_err(|_| {
        ConversionWarning::InvalidCoordinates(format!("{} {:?} is not a number", name, value))
    })
}

// Returns None when the size is absent, empty or not strictly positive.
fn image_size(size: Option<&XmlSize>) -> Result<Option<(f64, f64)>, ConvertError> {
    let Some(size) = size else {
        return Ok(None);
    };
    let dimension = |text: Option<&str>| -> Result<Option<i64>, ConvertError> {
        match text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ConvertError::InvalidSize(t.to_string())),
            None => Ok(None),
        }
    };

    match (dimension(size.width.as_deref())?, dimension(size.height.as_deref())?) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(Some((width as f64, height as f64)))
        }
        _ => Ok(None),
    }
}
