use crate::error::ScanError;
use image::{self, RgbImage};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff"];

pub fn read_image_as_rgb8(filepath: &Path) -> Result<RgbImage, ScanError> {
    image::open(filepath)
        .map(|img| img.into_rgb8())
        .map_err(|source| ScanError::Image {
            path: filepath.to_path_buf(),
            source,
        })
}

pub fn write_rgb8(image: &RgbImage, filepath: &Path) -> Result<(), ScanError> {
    image.save(filepath).map_err(|source| ScanError::ImageWrite {
        path: filepath.to_path_buf(),
        source,
    })
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Lists the images to scan.
///
/// A file is returned as is. A directory is walked recursively and every file with a known image
/// extension is returned, sorted by path so runs are reproducible.
pub fn collect_image_paths(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return vec![root.to_path_buf()];
    }
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_image_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();
    paths
}
