//! Preprocessing run.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::ImageFormat;
use tracing::{debug, info, warn};

use super::rotate::{rotate_image, to_u8};
use super::split::{list_cutouts, split_train_val, DatasetSplit};
use super::{InvalidInputPolicy, PreprocessConfig, PreprocessError};
use crate::cutout::CutoutName;
use crate::metrics;

/// Counts for one preprocessing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessReport {
    /// Images written to `TRAIN`.
    pub train: usize,
    /// Images written to `VAL`.
    pub val: usize,
    /// Inputs dropped because their name or pixels were unusable.
    pub skipped: usize,
    /// Inputs left out because their position angle is `0.0`.
    pub excluded: usize,
}

impl PreprocessReport {
    /// Images written in total.
    pub fn written(&self) -> usize {
        self.train + self.val
    }
}

/// Rotates, converts and splits a directory of cutouts.
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Runs over every cutout in the input directory.
    ///
    /// Blocking; call from a blocking thread when inside an async runtime.
    pub fn run(&self) -> Result<PreprocessReport, PreprocessError> {
        let mut report = PreprocessReport::default();

        let mut files = list_cutouts(&self.config.input_dir)?;
        if self.config.exclude_zero_angle {
            let before = files.len();
            files.retain(|path| !has_zero_angle(path));
            report.excluded = before - files.len();
        }

        let plan = split_train_val(files, self.config.val_fraction);
        for split in [DatasetSplit::Train, DatasetSplit::Val] {
            let dir = self.config.output_dir.join(split.dir_name());
            std::fs::create_dir_all(&dir).map_err(|e| PreprocessError::io(&dir, e))?;
        }

        info!(
            input = %self.config.input_dir.display(),
            output = %self.config.output_dir.display(),
            val = plan.val.len(),
            train = plan.train.len(),
            excluded = report.excluded,
            "Preprocessing {} cutouts",
            plan.len()
        );

        for (split, path) in plan.iter() {
            match self.process_file(path, split) {
                Ok(out_path) => {
                    debug!(path = %out_path.display(), "Wrote preprocessed cutout");
                    metrics::IMAGES_PREPROCESSED
                        .with_label_values(&[split.as_str()])
                        .inc();
                    match split {
                        DatasetSplit::Train => report.train += 1,
                        DatasetSplit::Val => report.val += 1,
                    }
                }
                Err(e)
                    if is_invalid_input(&e)
                        && self.config.on_invalid == InvalidInputPolicy::Skip =>
                {
                    warn!(path = %path.display(), error = %e, "Skipping cutout");
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            train = report.train,
            val = report.val,
            skipped = report.skipped,
            "Preprocessing complete"
        );
        Ok(report)
    }

    fn process_file(&self, path: &Path, split: DatasetSplit) -> Result<PathBuf, PreprocessError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = CutoutName::parse(&file_name)?;

        let image = image::open(path)
            .map_err(|source| PreprocessError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb32f();

        // Bring the major axis to a common orientation.
        let mut rotated = rotate_image(&image, 90.0 - name.position_angle);
        if let Some(edge) = self.config.resize {
            rotated = imageops::resize(&rotated, edge, edge, FilterType::Triangle);
        }

        let out_path = self.config.output_dir.join(split.dir_name()).join(&file_name);
        to_u8(&rotated)
            .save_with_format(&out_path, ImageFormat::Jpeg)
            .map_err(|source| PreprocessError::Encode {
                path: out_path.clone(),
                source,
            })?;

        Ok(out_path)
    }
}

fn has_zero_angle(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| CutoutName::parse(&n.to_string_lossy()).ok())
        .is_some_and(|name| name.position_angle == 0.0)
}

fn is_invalid_input(err: &PreprocessError) -> bool {
    matches!(
        err,
        PreprocessError::InvalidName(_) | PreprocessError::Decode { .. }
    )
}
