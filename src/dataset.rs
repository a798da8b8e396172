use log::{error, info, warn};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::conversion::parse_xml_annotation;
use crate::error::ConvertError;
use crate::io::{collect_images, copy_image, create_dataset_yaml, setup_output_directories, write_label_file};
use crate::types::{ConversionStats, EggClass, OutputDirs, SplitPaths};
use crate::utils::create_progress_bar;

/// Log progress every this many images
pub const PROGRESS_INTERVAL: usize = 5000;

/// What happened to one image of a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Image copied and label file written with this many boxes
    Converted { boxes: usize },
    /// No `<stem>.xml` next to the image
    MissingLabel,
    /// The annotation produced no valid boxes
    NoValidObjects,
}

/// Stats for both splits plus where the manifest was written
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub train: ConversionStats,
    pub val: ConversionStats,
    pub manifest_path: PathBuf,
}

impl ConversionSummary {
    /// Per-class object counts over both splits
    pub fn class_distribution(&self) -> Vec<(EggClass, usize)> {
        let mut total = self.train.clone();
        total.merge(&self.val);
        EggClass::ALL
            .iter()
            .map(|&class| (class, total.class_counts[class.id()]))
            .collect()
    }

    pub fn print_summary(&self) {
        info!("{}", "=".repeat(50));
        info!("Conversion complete!");
        info!("{}", "=".repeat(50));
        info!("Training: {} images", self.train.success);
        info!("Validation: {} images", self.val.success);
        info!("Class distribution (total objects):");
        for (class, count) in self.class_distribution() {
            info!("  {}: {} = {}", class.id(), class.name(), count);
        }
        info!("Created {} at {}", crate::io::MANIFEST_FILE_NAME, self.manifest_path.display());
    }
}

/// Convert one image of a split.
///
/// Images without an annotation file or without any valid box are left out of
/// the output entirely; they are not written as background images.
pub fn process_image(
    image_path: &Path,
    split: &SplitPaths,
    stats: &mut ConversionStats,
) -> Result<ImageOutcome, ConvertError> {
    let stem = image_path.file_stem().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("image path has no file stem: {}", image_path.display()),
        )
    })?;

    let xml_path = split.labels_dir.join(with_suffix(stem, ".xml"));
    if !xml_path.exists() {
        return Ok(ImageOutcome::MissingLabel);
    }

    let boxes = parse_xml_annotation(&xml_path)?;
    if boxes.is_empty() {
        return Ok(ImageOutcome::NoValidObjects);
    }

    copy_image(image_path, &split.out_images_dir)?;
    let label_path = split.out_labels_dir.join(with_suffix(stem, ".txt"));
    write_label_file(&label_path, &boxes)?;

    stats.record_boxes(&boxes);
    Ok(ImageOutcome::Converted { boxes: boxes.len() })
}

/// Convert every image of one split, one at a time in listing order.
///
/// Per-image failures are counted and logged; they never stop the split.
pub fn process_split(split: &SplitPaths) -> ConversionStats {
    let mut stats = ConversionStats::new();

    let image_files = match collect_images(&split.images_dir) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to list images in {}: {}", split.images_dir.display(), e);
            return stats;
        }
    };
    info!("{}: Found {} images", split.name, image_files.len());

    let pb = create_progress_bar(image_files.len() as u64, &split.name);
    for (i, image_path) in image_files.iter().enumerate() {
        if (i + 1) % PROGRESS_INTERVAL == 0 {
            info!("  Progress: {}/{}", i + 1, image_files.len());
        }

        match process_image(image_path, split, &mut stats) {
            Ok(ImageOutcome::Converted { .. }) => stats.increment_success(),
            Ok(ImageOutcome::MissingLabel) => stats.increment_no_label(),
            Ok(ImageOutcome::NoValidObjects) => stats.increment_no_objects(),
            Err(e) => {
                error!("Error processing {}: {}", image_path.display(), e);
                stats.increment_error();
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} processing complete", split.name));

    stats.print_summary(&split.name);
    stats
}

/// Main dataset conversion pipeline: training split, validation split, manifest
pub fn process_dataset(args: &Args) -> Result<ConversionSummary, ConvertError> {
    let output_dirs = setup_output_directories(args)?;
    let (train_split, val_split) = split_paths(args, &output_dirs);

    for split in [&train_split, &val_split] {
        if !split.images_dir.is_dir() {
            warn!(
                "{} images directory does not exist: {}",
                split.name,
                split.images_dir.display()
            );
        }
    }

    let train = process_split(&train_split);
    let val = process_split(&val_split);

    info!("Creating {} file...", crate::io::MANIFEST_FILE_NAME);
    let manifest_path = create_dataset_yaml(&output_dirs)?;

    let summary = ConversionSummary {
        train,
        val,
        manifest_path,
    };
    summary.print_summary();
    Ok(summary)
}

// Stems may contain dots, so `Path::with_extension` would cut them short.
fn with_suffix(stem: &OsStr, suffix: &str) -> OsString {
    let mut name = stem.to_os_string();
    name.push(suffix);
    name
}

fn split_paths(args: &Args, output_dirs: &OutputDirs) -> (SplitPaths, SplitPaths) {
    (
        SplitPaths {
            name: "Training".to_string(),
            images_dir: args.train_images.clone(),
            labels_dir: args.train_labels.clone(),
            out_images_dir: output_dirs.train_images_dir.clone(),
            out_labels_dir: output_dirs.train_labels_dir.clone(),
        },
        SplitPaths {
            name: "Validation".to_string(),
            images_dir: args.val_images.clone(),
            labels_dir: args.val_labels.clone(),
            out_images_dir: output_dirs.val_images_dir.clone(),
            out_labels_dir: output_dirs.val_labels_dir.clone(),
        },
    )
}
