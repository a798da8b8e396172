//! Class-balance report for a converted dataset
//!
//! Reads the YOLO label files under `labels/train` and `labels/val` and counts
//! objects per class, so a strongly skewed training split can be spotted
//! before training.

use log::{error, info, warn};
use std::fs;
use std::path::Path;

use crate::error::ConvertError;
use crate::io::collect_label_files;
use crate::types::{EggClass, NormalizedBox, NUM_CLASSES};

/// Ratios above this suggest weighting classes during training
pub const IMBALANCE_WARNING_RATIO: f64 = 3.0;

/// Object counts for one split
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitDistribution {
    pub name: String,
    pub label_files: usize,
    pub class_counts: [usize; NUM_CLASSES],
    pub skipped_lines: usize,
}

impl SplitDistribution {
    pub fn total(&self) -> usize {
        self.class_counts.iter().sum()
    }

    /// Share of this split's objects in `class`, in percent
    pub fn percentage(&self, class: EggClass) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.class_counts[class.id()] as f64 / total as f64 * 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetAnalysis {
    pub train: SplitDistribution,
    pub val: SplitDistribution,
    /// Most over least frequent class of the training split (present classes only)
    pub imbalance_ratio: Option<f64>,
}

impl DatasetAnalysis {
    pub fn is_imbalanced(&self) -> bool {
        self.imbalance_ratio
            .is_some_and(|ratio| ratio > IMBALANCE_WARNING_RATIO)
    }

    pub fn print_report(&self) {
        for split in [&self.train, &self.val] {
            info!(
                "{} class distribution ({} label files, {} objects):",
                split.name,
                split.label_files,
                split.total()
            );
            for class in EggClass::ALL {
                if split.class_counts[class.id()] > 0 {
                    info!(
                        "  {:20}: {:6} ({:5.2}%)",
                        class.name(),
                        split.class_counts[class.id()],
                        split.percentage(class)
                    );
                }
            }
            if split.skipped_lines > 0 {
                warn!("  {} malformed label lines skipped", split.skipped_lines);
            }
        }

        match self.imbalance_ratio {
            Some(ratio) => {
                info!("Class imbalance ratio: {:.2}:1", ratio);
                if self.is_imbalanced() {
                    warn!("Class imbalance is severe. Consider class weighting.");
                }
            }
            None => warn!("Training split has no objects; imbalance ratio unavailable"),
        }
    }
}

/// Max over min of the non-zero counts, or `None` when every count is zero
pub fn imbalance_ratio(class_counts: &[usize]) -> Option<f64> {
    let present = class_counts.iter().copied().filter(|&count| count > 0);
    let max = present.clone().max()?;
    let min = present.min()?;
    Some(max as f64 / min as f64)
}

/// Count objects per class over every label file in `labels_dir`
pub fn count_classes(labels_dir: &Path, name: &str) -> Result<SplitDistribution, ConvertError> {
    let mut distribution = SplitDistribution {
        name: name.to_string(),
        ..Default::default()
    };

    for label_path in collect_label_files(labels_dir)? {
        let content = match fs::read_to_string(&label_path) {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to read {}: {}", label_path.display(), e);
                continue;
            }
        };
        distribution.label_files += 1;

        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            match NormalizedBox::from_yolo_line(line) {
                Some(bbox) => distribution.class_counts[bbox.class_id()] += 1,
                None => {
                    warn!("Malformed label line in {}: {:?}", label_path.display(), line);
                    distribution.skipped_lines += 1;
                }
            }
        }
    }

    Ok(distribution)
}

/// Analyse the class balance of the dataset rooted at `root`
pub fn analyze_dataset(root: &Path) -> Result<DatasetAnalysis, ConvertError> {
    let train = count_classes(&root.join("labels/train"), "Training")?;
    let val = count_classes(&root.join("labels/val"), "Validation")?;
    let imbalance_ratio = imbalance_ratio(&train.class_counts);

    Ok(DatasetAnalysis {
        train,
        val,
        imbalance_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_ignores_absent_classes() {
        assert_eq!(imbalance_ratio(&[8, 0, 2, 0, 4]), Some(4.0));
        assert_eq!(imbalance_ratio(&[5, 5, 5, 5, 5]), Some(1.0));
        assert_eq!(imbalance_ratio(&[0, 0, 0, 0, 0]), None);
    }

    #[test]
    fn percentage_of_empty_split_is_zero() {
        let split = SplitDistribution::default();
        assert_eq!(split.percentage(EggClass::Crack), 0.0);
    }

    #[test]
    fn counts_lines_and_skips_malformed_ones() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        fs::write(
            dir.join("a.txt"),
            "0 0.5 0.5 0.2 0.2\n1 0.5 0.5 0.2 0.2\n\n0 0.1 0.1 0.1 0.1\n",
        )
        .unwrap();
        fs::write(dir.join("b.txt"), "4 0.5 0.5 0.2 0.2\nbogus\n").unwrap();

        let split = count_classes(dir, "Training").unwrap();

        assert_eq!(split.label_files, 2);
        assert_eq!(split.class_counts, [2, 1, 0, 0, 1]);
        assert_eq!(split.skipped_lines, 1);
        assert_eq!(split.percentage(EggClass::Normal), 50.0);
    }
}
