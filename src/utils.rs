use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::get_image_extensions_set;

/// Check whether a path has one of the supported image extensions (any case)
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| get_image_extensions_set().contains(&ext.to_lowercase()))
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Create an output directory, keeping whatever is already there
pub fn ensure_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// Delete an output directory if present and create it empty
pub fn recreate_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        log::warn!(
            "Directory {:?} already exists. Deleting and recreating it.",
            path
        );
        fs::remove_dir_all(path).and_then(|_| fs::create_dir_all(path))?;
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image_file(Path::new("egg_001.jpg")));
        assert!(is_image_file(Path::new("egg_001.JPEG")));
        assert!(is_image_file(Path::new("dir/egg.Png")));
        assert!(is_image_file(Path::new("egg.bmp")));
        assert!(!is_image_file(Path::new("egg.xml")));
        assert!(!is_image_file(Path::new("egg.webp")));
        assert!(!is_image_file(Path::new("egg")));
    }

    #[test]
    fn recreate_clears_existing_contents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("labels/train");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.txt"), "0 0.5 0.5 0.5 0.5\n").unwrap();

        ensure_output_directory(&dir).unwrap();
        assert!(dir.join("stale.txt").exists());

        recreate_output_directory(&dir).unwrap();
        assert!(dir.exists());
        assert!(!dir.join("stale.txt").exists());
    }
}
