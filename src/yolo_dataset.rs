use log::info;
use std::path::Path;

use crate::config::Args;
use crate::conversion::{convert_directory, UnknownLabelPolicy};
use crate::dataset::split_dataset;
use crate::error::{Error, Result};
use crate::io::{count_files, create_dataset_yaml, delete_json_files, setup_split_directories};
use crate::labels::{collect_labels, ClassList};
use crate::types::DatasetSummary;
use crate::validation::validate_directory;

/// Main dataset processing pipeline.
///
/// Runs in place on `args.directory`: validates, converts, removes the JSON files,
/// splits into `train`/`val` and writes the dataset config to `args.config_path`.
pub fn process_dataset(args: &Args) -> Result<DatasetSummary> {
    let dirname = args.directory.as_path();
    if !dirname.is_dir() {
        return Err(Error::DirectoryNotFound(dirname.to_path_buf()));
    }

    let mut summary = DatasetSummary::default();

    info!("Validating {}...", dirname.display());
    summary.validation = validate_directory(dirname)?;

    let (class_list, policy) = resolve_class_list(dirname, args)?;
    info!("Found {} classes: {:?}", class_list.len(), class_list.names());

    info!("Converting annotations...");
    summary.labels_written = convert_directory(dirname, &class_list, policy)?;
    summary.json_removed = delete_json_files(dirname)?;
    summary.counts = count_files(dirname)?;

    info!("Splitting dataset...");
    let split_dirs = setup_split_directories(dirname)?;
    let split_data = split_dataset(dirname, &split_dirs, args.train_ratio, args.seed)?;
    summary.train_pairs = split_data.train.len();
    summary.val_pairs = split_data.val.len();

    info!("Creating {}...", args.config_path.display());
    let config = create_dataset_yaml(&args.config_path, &split_dirs, &class_list)?;
    summary.num_classes = config.nc;

    Ok(summary)
}

/// Use the label list from the command line, or derive one from the annotations.
fn resolve_class_list(dirname: &Path, args: &Args) -> Result<(ClassList, UnknownLabelPolicy)> {
    match args.class_list() {
        Some(class_list) => Ok((class_list, UnknownLabelPolicy::Skip)),
        None => {
            let labels = collect_labels(dirname)?;
            Ok((ClassList::from_labels(&labels), UnknownLabelPolicy::Fail))
        }
    }
}
