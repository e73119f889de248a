//! Configuration for dataset preprocessing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do with a cutout whose name or pixels cannot be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidInputPolicy {
    /// Log a warning and continue with the next file.
    #[default]
    Skip,
    /// Abort the run with an error.
    Fail,
}

/// Preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Directory holding the raw cutouts.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory receiving `TRAIN` and `VAL`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Leading fraction of the listing assigned to validation.
    #[serde(default = "default_val_fraction")]
    pub val_fraction: f64,

    /// Square edge length to resize to after rotation.
    #[serde(default)]
    pub resize: Option<u32>,

    /// Leave out cutouts whose position angle token is `0.0`.
    #[serde(default)]
    pub exclude_zero_angle: bool,

    /// Handling of unparsable filenames and undecodable images.
    #[serde(default)]
    pub on_invalid: InvalidInputPolicy,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./data/final_28x28_unproc")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data/final_28x28_proc")
}

fn default_val_fraction() -> f64 {
    0.1
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            val_fraction: default_val_fraction(),
            resize: None,
            exclude_zero_angle: false,
            on_invalid: InvalidInputPolicy::default(),
        }
    }
}

impl PreprocessConfig {
    /// Configuration reading from `input_dir` and writing to `output_dir`.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}
