//! Directory listings for each artifact kind, sorted by file name

use crate::io::configuration::{
    DERIVED_TABLE_SUFFIXES, IMAGE_EXTENSIONS, MASK_TOKEN, ROI_ARCHIVE_EXTENSION, ROI_ARCHIVE_TOKEN,
    SUMMARY_FILE_NAMES, TABLE_EXTENSION,
};
use crate::io::error::{Result, WithPath, input_missing};
use std::path::{Path, PathBuf};

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn extension_lower(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// List regular files in `dir` accepted by `keep`, sorted by path
///
/// # Errors
///
/// Returns [`crate::PipelineError::InputMissing`] if `dir` is not a directory,
/// or a file system error if it cannot be read
pub fn list_files(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(input_missing(dir, &"directory does not exist"));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_path(dir, "read directory")? {
        let path = entry.with_path(dir, "read directory entry")?.path();
        if path.is_file() && keep(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Whether a path is a raster image (segmentation masks excluded)
pub fn is_image(path: &Path) -> bool {
    let extension = extension_lower(path);
    IMAGE_EXTENSIONS.contains(&extension.as_str()) && !file_name_lower(path).contains(MASK_TOKEN)
}

/// Whether a path is an ROI archive written by nucleus segmentation
pub fn is_roi_archive(path: &Path) -> bool {
    extension_lower(path) == ROI_ARCHIVE_EXTENSION
        && file_name_lower(path).contains(ROI_ARCHIVE_TOKEN)
}

/// Whether a path is a delimited table other than one of the run summaries
pub fn is_table(path: &Path) -> bool {
    extension_lower(path) == TABLE_EXTENSION
        && !SUMMARY_FILE_NAMES.contains(&file_name_lower(path).as_str())
}

/// Whether a table was written by a previous run as a per-sample artifact
pub fn is_derived_table(path: &Path) -> bool {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    DERIVED_TABLE_SUFFIXES
        .iter()
        .any(|suffix| stem.ends_with(suffix))
}

/// List image files in `dir`
///
/// # Errors
///
/// Returns an error if the directory is missing or unreadable
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, is_image)
}

/// List ROI archives in `dir`
///
/// # Errors
///
/// Returns an error if the directory is missing or unreadable
pub fn list_roi_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, is_roi_archive)
}

/// List source localization or nucleus tables in `dir`
///
/// # Errors
///
/// Returns an error if the directory is missing or unreadable
pub fn list_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, |path| is_table(path) && !is_derived_table(path))
}

/// Fail with [`crate::PipelineError::InputMissing`] when a required listing is empty
///
/// # Errors
///
/// Returns an error naming `dir` and `what` if `files` is empty
pub fn require_nonempty(files: Vec<PathBuf>, dir: &Path, what: &str) -> Result<Vec<PathBuf>> {
    if files.is_empty() {
        Err(input_missing(dir, &format!("no {what} found")))
    } else {
        Ok(files)
    }
}
