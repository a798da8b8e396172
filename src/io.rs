use glob::{glob, Pattern};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::error::ConvertError;
use crate::types::{EggClass, NormalizedBox, OutputDirs};
use crate::utils::{ensure_output_directory, is_image_file, recreate_output_directory};

pub const MANIFEST_FILE_NAME: &str = "data.yaml";

/// Set up the `images/{train,val}` and `labels/{train,val}` output tree
pub fn setup_output_directories(args: &Args) -> std::io::Result<OutputDirs> {
    let root = ensure_output_directory(&args.output)?;
    let create = |path: PathBuf| {
        if args.clean {
            recreate_output_directory(&path)
        } else {
            ensure_output_directory(&path)
        }
    };

    Ok(OutputDirs {
        train_images_dir: create(root.join("images/train"))?,
        val_images_dir: create(root.join("images/val"))?,
        train_labels_dir: create(root.join("labels/train"))?,
        val_labels_dir: create(root.join("labels/val"))?,
        root,
    })
}

/// List the image files directly inside `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    let mut images: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    images.sort();
    Ok(images)
}

/// List the `.txt` label files directly inside `dir`, sorted by path
pub fn collect_label_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let pattern = format!("{}/*.txt", Pattern::escape(&dir.to_string_lossy()));
    let mut labels: Vec<PathBuf> = glob(&pattern)?.filter_map(|entry| entry.ok()).collect();
    labels.sort();
    Ok(labels)
}

/// Write one YOLO label line per box
pub fn write_label_file(path: &Path, boxes: &[NormalizedBox]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for bbox in boxes {
        writeln!(writer, "{}", bbox.to_yolo_line())?;
    }
    writer.flush()
}

/// Copy an image byte-for-byte into `images_dir`, keeping its file name
pub fn copy_image(image_path: &Path, images_dir: &Path) -> std::io::Result<PathBuf> {
    let file_name = image_path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("image path has no file name: {}", image_path.display()),
        )
    })?;
    let image_output_path = images_dir.join(file_name);
    fs::copy(image_path, &image_output_path)?;
    Ok(image_output_path)
}

/// Create the data.yaml manifest for YOLO training
pub fn create_dataset_yaml(output_dirs: &OutputDirs) -> std::io::Result<PathBuf> {
    let dataset_yaml_path = output_dirs.root.join(MANIFEST_FILE_NAME);
    let mut dataset_yaml = BufWriter::new(File::create(&dataset_yaml_path)?);
    let absolute_path = fs::canonicalize(&output_dirs.root)?;

    let mut yaml_content = format!(
        "# Egg Quality Classification Dataset\npath: {}\ntrain: images/train\nval: images/val\n",
        absolute_path.to_string_lossy()
    );
    yaml_content.push_str("\n# Classes\nnames:\n");
    for class in EggClass::ALL {
        yaml_content.push_str(&format!("  {}: {}\n", class.id(), class.name()));
    }

    dataset_yaml.write_all(yaml_content.as_bytes())?;
    dataset_yaml.flush()?;
    Ok(dataset_yaml_path)
}
