use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::OnceLock;

// Supported image formats
pub const IMG_FORMATS: &[&str] = &[
    "bmp", "dng", "jpeg", "jpg", "mpo", "png", "tif", "tiff", "webp", "pfm",
];

pub const JSON_EXTENSION: &str = "json";
pub const LABEL_EXTENSION: &str = "txt";

// Precomputed HashSet of image extensions for fast lookup
pub static IMAGE_EXTENSIONS_SET: OnceLock<HashSet<String>> = OnceLock::new();

/// Get the image extensions set
pub fn get_image_extensions_set() -> &'static HashSet<String> {
    IMAGE_EXTENSIONS_SET.get_or_init(|| IMG_FORMATS.iter().map(|ext| ext.to_lowercase()).collect())
}

// The Shape struct representing annotated shapes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Shape {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub shape_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// The annotation of one image; keys besides size and shapes are ignored
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotation {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub flags: Option<HashMap<String, bool>>,
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub image_path: Option<String>,
    pub image_height: f64,
    pub image_width: f64,
}

/// An image and the label file sharing its stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub image: PathBuf,
    pub label: PathBuf,
}

// Paths to the split directories created inside the dataset directory
#[derive(Debug, Clone)]
pub struct SplitDirs {
    pub train_dir: PathBuf,
    pub val_dir: PathBuf,
}

// Pairs assigned to the train and val splits
#[derive(Debug, Default, Clone)]
pub struct SplitData {
    pub train: Vec<FilePair>,
    pub val: Vec<FilePair>,
}

impl SplitData {
    pub fn len(&self) -> usize {
        self.train.len() + self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Files removed by the validator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    pub corrupt_json_removed: usize,
    pub orphan_images_removed: usize,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.corrupt_json_removed + self.orphan_images_removed
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileCounts {
    pub images: usize,
    pub labels: usize,
}

// What each pipeline stage did
#[derive(Debug, Default, Clone)]
pub struct DatasetSummary {
    pub validation: ValidationReport,
    pub labels_written: usize,
    pub json_removed: usize,
    pub counts: FileCounts,
    pub train_pairs: usize,
    pub val_pairs: usize,
    pub num_classes: usize,
}

impl DatasetSummary {
    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!(
            "Deleted invalid files: {} (corrupt JSON: {}, images without JSON: {})",
            self.validation.total(),
            self.validation.corrupt_json_removed,
            self.validation.orphan_images_removed
        );
        log::info!("Label files written: {}", self.labels_written);
        log::info!("JSON files removed: {}", self.json_removed);
        log::info!(
            "Number of image files {}, text files {}",
            self.counts.images,
            self.counts.labels
        );
        log::info!("Train pairs: {}", self.train_pairs);
        log::info!("Val pairs: {}", self.val_pairs);
        log::info!("Classes: {}", self.num_classes);

        if self.counts.images != self.counts.labels {
            log::warn!(
                "Image and label counts differ ({} vs {}); unpaired files were left in place",
                self.counts.images,
                self.counts.labels
            );
        }
    }
}
