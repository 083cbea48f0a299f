use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ValidationReport, JSON_EXTENSION};
use crate::utils::{file_stem_string, is_valid_json, list_files_with_extension, list_image_files};

/// Remove JSON files that do not parse, then images without a same-stem JSON file.
///
/// Images are checked against the JSON files listed before any deletion, so an
/// image whose JSON was corrupt is kept. Nothing is backed up.
pub fn validate_directory(dirname: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();
    let json_files = list_files_with_extension(dirname, JSON_EXTENSION)?;
    let json_stems: HashSet<String> = json_files.iter().map(|path| file_stem_string(path)).collect();

    for json_path in json_files {
        if !is_valid_json(&json_path)? {
            warn!("Removing unparsable JSON file: {}", json_path.display());
            fs::remove_file(&json_path).map_err(|e| Error::io(&json_path, e))?;
            report.corrupt_json_removed += 1;
        }
    }

    for image_path in list_image_files(dirname)? {
        if !json_stems.contains(&file_stem_string(&image_path)) {
            warn!("Removing image without annotation: {}", image_path.display());
            fs::remove_file(&image_path).map_err(|e| Error::io(&image_path, e))?;
            report.orphan_images_removed += 1;
        }
    }

    info!("Deleted {} invalid files.", report.total());
    Ok(report)
}
