//! LabelMe to YOLO segmentation converter
//!
//! This library turns a directory of images and LabelMe polygon annotations into a
//! YOLO segmentation dataset in place: one normalized `.txt` label per image, a
//! train/val split and a dataset config listing the class names.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod labels;
pub mod types;
pub mod utils;
pub mod validation;
pub mod yolo_dataset;

// Re-export commonly used types and functions
pub use config::Args;
pub use error::{Error, Result};
pub use labels::ClassList;
pub use types::{DatasetSummary, FilePair, ImageAnnotation, Shape, SplitData};
pub use yolo_dataset::process_dataset;
