use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

// Image formats picked up from the split directories
pub const IMG_FORMATS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

// Precomputed HashSet of image extensions for fast lookup
pub static IMAGE_EXTENSIONS_SET: OnceLock<HashSet<String>> = OnceLock::new();

/// Get the image extensions set
pub fn get_image_extensions_set() -> &'static HashSet<String> {
    IMAGE_EXTENSIONS_SET.get_or_init(|| IMG_FORMATS.iter().map(|ext| ext.to_lowercase()).collect())
}

pub const NUM_CLASSES: usize = 5;

/// Egg defect classes in YOLO class-id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EggClass {
    Normal = 0,
    Crack = 1,
    ForeignMatter = 2,
    Discoloration = 3,
    Deformed = 4,
}

impl EggClass {
    pub const ALL: [EggClass; NUM_CLASSES] = [
        EggClass::Normal,
        EggClass::Crack,
        EggClass::ForeignMatter,
        EggClass::Discoloration,
        EggClass::Deformed,
    ];

    /// Map an AI Hub `state` tag to its class. Only "1" through "5" are known.
    pub fn from_state(state: &str) -> Option<Self> {
        match state {
            "1" => Some(EggClass::Normal),
            "2" => Some(EggClass::Crack),
            "3" => Some(EggClass::ForeignMatter),
            "4" => Some(EggClass::Discoloration),
            "5" => Some(EggClass::Deformed),
            _ => None,
        }
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    pub fn id(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            EggClass::Normal => "normal",
            EggClass::Crack => "crack",
            EggClass::ForeignMatter => "foreign_matter",
            EggClass::Discoloration => "discoloration",
            EggClass::Deformed => "deformed",
        }
    }
}

impl fmt::Display for EggClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bounding box in YOLO form: center and size as fractions of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub class: EggClass,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    pub fn class_id(&self) -> usize {
        self.class.id()
    }

    /// Centers in [0, 1], sizes in (0, 1]. NaN fails every comparison.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.x_center)
            && (0.0..=1.0).contains(&self.y_center)
            && self.width > 0.0
            && self.width <= 1.0
            && self.height > 0.0
            && self.height <= 1.0
    }

    /// Format as one YOLO label line (without the trailing newline).
    pub fn to_yolo_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id(),
            self.x_center,
            self.y_center,
            self.width,
            self.height
        )
    }

    /// Parse one YOLO label line. Returns `None` for malformed lines or unknown class ids.
    pub fn from_yolo_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let class = EggClass::from_id(fields.next()?.parse().ok()?)?;
        let mut next_f64 = || fields.next()?.parse::<f64>().ok();
        let (x_center, y_center, width, height) = (next_f64()?, next_f64()?, next_f64()?, next_f64()?);
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            class,
            x_center,
            y_center,
            width,
            height,
        })
    }
}

// The XML annotation document. Leaves stay as text so bad values become warnings.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct XmlAnnotation {
    #[serde(default)]
    pub size: Option<XmlSize>,
    #[serde(rename = "bndbox", default)]
    pub bndboxes: Vec<XmlBndBox>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct XmlSize {
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct XmlBndBox {
    pub state: Option<String>,
    pub x_min: Option<String>,
    pub y_min: Option<String>,
    pub x_max: Option<String>,
    pub y_max: Option<String>,
}

// Input and output directories for one split
#[derive(Debug, Clone)]
pub struct SplitPaths {
    pub name: String,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    pub out_images_dir: PathBuf,
    pub out_labels_dir: PathBuf,
}

// Struct to hold the paths to the output directories for train/val splits
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub root: PathBuf,
    pub train_images_dir: PathBuf,
    pub val_images_dir: PathBuf,
    pub train_labels_dir: PathBuf,
    pub val_labels_dir: PathBuf,
}

// Per-split conversion counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub success: usize,
    pub no_label: usize,
    pub no_objects: usize,
    pub error: usize,
    pub class_counts: [usize; NUM_CLASSES],
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_success(&mut self) {
        self.success += 1;
    }

    pub fn increment_no_label(&mut self) {
        self.no_label += 1;
    }

    pub fn increment_no_objects(&mut self) {
        self.no_objects += 1;
    }

    pub fn increment_error(&mut self) {
        self.error += 1;
    }

    pub fn record_boxes(&mut self, boxes: &[NormalizedBox]) {
        for bbox in boxes {
            self.class_counts[bbox.class_id()] += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.no_label + self.no_objects + self.error
    }

    pub fn objects(&self) -> usize {
        self.class_counts.iter().sum()
    }

    pub fn merge(&mut self, other: &ConversionStats) {
        self.success += other.success;
        self.no_label += other.no_label;
        self.no_objects += other.no_objects;
        self.error += other.error;
        for (mine, theirs) in self.class_counts.iter_mut().zip(other.class_counts) {
            *mine += theirs;
        }
    }

    pub fn print_summary(&self, split_name: &str) {
        log::info!("=== {} Summary ===", split_name);
        log::info!("  Success: {}", self.success);
        log::info!("  No label: {}", self.no_label);
        log::info!("  No objects: {}", self.no_objects);
        log::info!("  Errors: {}", self.error);

        if self.error > 0 {
            log::warn!(
                "{}: {} of {} images failed to convert",
                split_name,
                self.error,
                self.total()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_codes_map_to_zero_based_classes() {
        assert_eq!(EggClass::from_state("1"), Some(EggClass::Normal));
        assert_eq!(EggClass::from_state("5"), Some(EggClass::Deformed));
        assert_eq!(EggClass::from_state("0"), None);
        assert_eq!(EggClass::from_state("6"), None);
        assert_eq!(EggClass::from_state("01"), None);
        assert_eq!(EggClass::Crack.id(), 1);
        assert_eq!(EggClass::ForeignMatter.name(), "foreign_matter");
    }

    #[test]
    fn yolo_line_parsing_rejects_garbage() {
        assert!(NormalizedBox::from_yolo_line("").is_none());
        assert!(NormalizedBox::from_yolo_line("7 0.5 0.5 0.5 0.5").is_none());
        assert!(NormalizedBox::from_yolo_line("1 0.5 0.5 0.5").is_none());
        assert!(NormalizedBox::from_yolo_line("1 0.5 0.5 0.5 0.5 0.5").is_none());
        assert!(NormalizedBox::from_yolo_line("x 0.5 0.5 0.5 0.5").is_none());

        let bbox = NormalizedBox::from_yolo_line("3 0.100000 0.200000 0.300000 0.400000").unwrap();
        assert_eq!(bbox.class, EggClass::Discoloration);
        assert_eq!(bbox.height, 0.4);
    }

    #[test]
    fn stats_merge_adds_counters() {
        let mut a = ConversionStats::new();
        a.increment_success();
        a.class_counts[0] = 2;
        let mut b = ConversionStats::new();
        b.increment_error();
        b.increment_no_label();
        b.class_counts[0] = 1;
        b.class_counts[4] = 3;

        a.merge(&b);

        assert_eq!(a.total(), 3);
        assert_eq!(a.class_counts, [3, 0, 0, 0, 3]);
        assert_eq!(a.objects(), 6);
    }
}
