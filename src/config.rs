use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::labels::ClassList;

/// Command-line arguments for converting a LabelMe directory into a YOLO segmentation dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the images and their LabelMe JSON files
    #[arg(short = 'd', long = "directory")]
    pub directory: PathBuf,

    /// Proportion of the image/label pairs moved into the train split
    #[arg(long = "train_ratio", default_value_t = 0.8, value_parser = validate_ratio)]
    pub train_ratio: f64,

    /// Seed for random shuffling; the split is not reproducible without it
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Where to write the dataset config
    #[arg(long = "config", default_value = "config.yaml")]
    pub config_path: PathBuf,

    /// Ordered list of labels; fixes class ids instead of deriving them from the data
    #[arg(value_delimiter = ',')]
    pub label_list: Vec<String>,
}

impl Args {
    /// The user supplied class list, if any.
    pub fn class_list(&self) -> Option<ClassList> {
        if self.label_list.is_empty() {
            None
        } else {
            Some(ClassList::from_labels(&self.label_list))
        }
    }
}

// Validate that the ratio is between 0.0 and 1.0
pub fn validate_ratio(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("RATIO must be between 0.0 and 1.0".to_string()),
    }
}
