//! Turns raw cutouts into a rotation-normalized training set.
//!
//! Each cutout is rotated so its major axis lies along a fixed direction,
//! converted to 8-bit and written into `TRAIN` or `VAL` depending on its
//! position in the input listing.

mod config;
mod preprocessor;
mod rotate;
mod split;

pub use config::{InvalidInputPolicy, PreprocessConfig};
pub use preprocessor::{PreprocessReport, Preprocessor};
pub use rotate::{rotate_image, to_u8};
pub use split::{list_cutouts, split_train_val, DatasetSplit, SplitPlan};

use std::path::PathBuf;

use thiserror::Error;

use crate::cutout::NameError;

/// Errors that can occur during preprocessing.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// Filesystem error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filename does not carry a usable position angle.
    #[error("Invalid cutout name: {0}")]
    InvalidName(#[from] NameError),

    /// The file could not be decoded as an image.
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The processed image could not be written.
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl PreprocessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
