use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for converting AI Hub XML annotations to YOLO format.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory containing the training images
    #[arg(long = "train-images")]
    pub train_images: PathBuf,

    /// Directory containing the training XML labels
    #[arg(long = "train-labels")]
    pub train_labels: PathBuf,

    /// Directory containing the validation images
    #[arg(long = "val-images")]
    pub val_images: PathBuf,

    /// Directory containing the validation XML labels
    #[arg(long = "val-labels")]
    pub val_labels: PathBuf,

    /// Output dataset directory
    #[arg(long = "output", default_value = "../data")]
    pub output: PathBuf,

    /// Delete existing images/labels split directories before converting
    #[arg(long = "clean")]
    pub clean: bool,
}

/// Command-line arguments for reporting the class balance of a converted dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct StatsArgs {
    /// Root of the converted dataset (the directory holding data.yaml)
    #[arg(short = 'd', long = "data", default_value = "../data")]
    pub data: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_to_sibling_data_dir() {
        let args = Args::try_parse_from([
            "egg2yolo",
            "--train-images",
            "a",
            "--train-labels",
            "b",
            "--val-images",
            "c",
            "--val-labels",
            "d",
        ])
        .unwrap();

        assert_eq!(args.output, PathBuf::from("../data"));
        assert!(!args.clean);
        assert_eq!(args.val_labels, PathBuf::from("d"));
    }

    #[test]
    fn split_directories_are_required() {
        let result = Args::try_parse_from(["egg2yolo", "--train-images", "a"]);
        assert!(result.is_err());
    }
}
