//! Input listing and train/validation split.

use std::path::{Path, PathBuf};

use super::PreprocessError;

/// Destination subset of a preprocessed cutout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetSplit {
    Train,
    Val,
}

impl DatasetSplit {
    /// Subdirectory name under the output directory.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Train => "TRAIN",
            Self::Val => "VAL",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Val => "val",
        }
    }
}

/// Files assigned to each subset, in listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitPlan {
    pub val: Vec<PathBuf>,
    pub train: Vec<PathBuf>,
}

impl SplitPlan {
    /// Iterates over every file with its subset, validation first.
    pub fn iter(&self) -> impl Iterator<Item = (DatasetSplit, &PathBuf)> {
        self.val
            .iter()
            .map(|p| (DatasetSplit::Val, p))
            .chain(self.train.iter().map(|p| (DatasetSplit::Train, p)))
    }

    pub fn len(&self) -> usize {
        self.val.len() + self.train.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lists `*.jpg` files in `dir` in directory enumeration order.
pub fn list_cutouts(dir: &Path) -> Result<Vec<PathBuf>, PreprocessError> {
    let entries = std::fs::read_dir(dir).map_err(|e| PreprocessError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PreprocessError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jpg") {
            files.push(path);
        }
    }
    Ok(files)
}

/// Assigns the first `floor(val_fraction * N)` files to validation and the
/// rest to training.
pub fn split_train_val(mut files: Vec<PathBuf>, val_fraction: f64) -> SplitPlan {
    let n_val = ((val_fraction * files.len() as f64).floor() as usize).min(files.len());
    let train = files.split_off(n_val);
    SplitPlan { val: files, train }
}
