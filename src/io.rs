use log::info;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::labels::ClassList;
use crate::types::{FileCounts, SplitDirs, JSON_EXTENSION, LABEL_EXTENSION};
use crate::utils::{list_files_with_extension, list_image_files};

/// Contents of the dataset config handed to the YOLO trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub train: PathBuf,
    pub val: PathBuf,
    pub nc: usize,
    pub names: Vec<String>,
}

/// Create the `train` and `val` directories inside `dirname`, keeping existing ones.
pub fn setup_split_directories(dirname: &Path) -> Result<SplitDirs> {
    let train_dir = dirname.join("train");
    let val_dir = dirname.join("val");
    for dir in [&train_dir, &val_dir] {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(SplitDirs { train_dir, val_dir })
}

/// Delete every JSON file in `dirname`, returning how many were removed.
pub fn delete_json_files(dirname: &Path) -> Result<usize> {
    let json_files = list_files_with_extension(dirname, JSON_EXTENSION)?;
    for json_path in &json_files {
        fs::remove_file(json_path).map_err(|e| Error::io(json_path, e))?;
    }
    info!("Removed {} JSON files.", json_files.len());
    Ok(json_files.len())
}

/// Count the image and label files in `dirname`
pub fn count_files(dirname: &Path) -> Result<FileCounts> {
    let counts = FileCounts {
        images: list_image_files(dirname)?.len(),
        labels: list_files_with_extension(dirname, LABEL_EXTENSION)?.len(),
    };
    info!(
        "Number of image files {}, text files {}",
        counts.images, counts.labels
    );
    Ok(counts)
}

/// Create the dataset config file for YOLO training.
/// `names` is written in class-id order so that `names[i]` matches id `i` in the label files.
pub fn create_dataset_yaml(
    config_path: &Path,
    split_dirs: &SplitDirs,
    class_list: &ClassList,
) -> Result<DatasetConfig> {
    let config = DatasetConfig {
        train: fs::canonicalize(&split_dirs.train_dir)
            .map_err(|e| Error::io(&split_dirs.train_dir, e))?,
        val: fs::canonicalize(&split_dirs.val_dir)
            .map_err(|e| Error::io(&split_dirs.val_dir, e))?,
        nc: class_list.len(),
        names: class_list.names().to_vec(),
    };

    let yaml_content = serde_yaml::to_string(&config)?;
    let mut writer =
        BufWriter::new(File::create(config_path).map_err(|e| Error::io(config_path, e))?);
    writer
        .write_all(yaml_content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(config_path, e))?;

    info!("Created {} file.", config_path.display());
    Ok(config)
}
