use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{FilePair, SplitData, SplitDirs, LABEL_EXTENSION};
use crate::utils::{
    create_progress_bar, file_stem_string, list_files_with_extension, list_image_files,
};

/// Match images with label files by stem. Unmatched files are logged and left out.
pub fn pair_files(dirname: &Path) -> Result<Vec<FilePair>> {
    let mut labels: BTreeMap<String, _> = list_files_with_extension(dirname, LABEL_EXTENSION)?
        .into_iter()
        .map(|path| (file_stem_string(&path), path))
        .collect();

    let mut pairs = Vec::new();
    for image in list_image_files(dirname)? {
        match labels.remove(&file_stem_string(&image)) {
            Some(label) => pairs.push(FilePair { image, label }),
            None => warn!("No label file for image {}, leaving it in place", image.display()),
        }
    }
    for label in labels.values() {
        warn!("No image for label file {}, leaving it in place", label.display());
    }
    Ok(pairs)
}

/// Shuffle the pairs and split off the first `floor(n * train_ratio)` as train.
pub fn split_pairs(mut pairs: Vec<FilePair>, train_ratio: f64, seed: Option<u64>) -> SplitData {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    pairs.shuffle(&mut rng);

    let train_size = ((pairs.len() as f64 * train_ratio).floor() as usize).min(pairs.len());
    let val = pairs.split_off(train_size);

    SplitData { train: pairs, val }
}

/// Move both files of every pair into the matching split directory.
pub fn move_pairs(pairs: &[FilePair], target_dir: &Path, label: &str) -> Result<()> {
    let pb = create_progress_bar(pairs.len() as u64, label);
    for pair in pairs {
        for source in [pair.image.as_path(), pair.label.as_path()] {
            let file_name = source.file_name().unwrap_or_default();
            let destination = target_dir.join(file_name);
            fs::rename(source, &destination).map_err(|e| Error::io(source, e))?;
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} split complete", label));
    Ok(())
}

/// Split the image/label pairs of `dirname` into its train and val directories.
/// Returns the pairs with their original paths.
pub fn split_dataset(
    dirname: &Path,
    split_dirs: &SplitDirs,
    train_ratio: f64,
    seed: Option<u64>,
) -> Result<SplitData> {
    let pairs = pair_files(dirname)?;
    let split_data = split_pairs(pairs, train_ratio, seed);

    move_pairs(&split_data.train, &split_dirs.train_dir, "Train")?;
    move_pairs(&split_data.val, &split_dirs.val_dir, "Val")?;

    info!(
        "Split {} pairs: {} train, {} val.",
        split_data.len(),
        split_data.train.len(),
        split_data.val.len()
    );
    Ok(split_data)
}
