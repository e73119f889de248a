//! Cutout generation.
//!
//! For every selected galaxy a plate scale is derived from its catalog
//! diameter, a JPEG cutout is requested from the imaging service and written
//! under a filename that encodes identifier, position angle and morphology.
//!
//! A failed download is an expected outcome, not an error: services return
//! [`CutoutOutcome::Skipped`] and the run carries on. [`CutoutError`] is
//! reserved for local failures such as an unwritable output directory.

mod config;
mod naming;
mod skyserver;

pub use config::CutoutConfig;
pub use naming::{sanitize_component, CutoutName, NameError, CUTOUT_PREFIX};
pub use skyserver::SkyServerClient;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::SelectedGalaxy;

/// Plate scale in arcsec/pixel that fits a galaxy of the given `logD25` into
/// `image_size` pixels, padded by `pad_factor`.
///
/// `logD25` is log10 of the diameter in units of 0.1 arcmin, so the diameter in
/// arcsec is `60 * 0.1 * 10^logD25`.
pub fn plate_scale(image_size: u32, log_d25: f64, pad_factor: f64) -> f64 {
    pad_factor * (60.0 * 0.1 * 10f64.powf(log_d25) / image_size as f64)
}

/// Errors for local failures while producing a cutout.
#[derive(Debug, Error)]
pub enum CutoutError {
    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Writing the output file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CutoutError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result of a single cutout request.
#[derive(Debug, Clone, PartialEq)]
pub enum CutoutOutcome {
    /// The cutout was written to `path`.
    Saved { path: PathBuf, bytes: u64 },
    /// The service could not deliver the cutout; nothing was written.
    Skipped { reason: String },
}

impl CutoutOutcome {
    /// Returns the saved path, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Saved { path, .. } => Some(path),
            Self::Skipped { .. } => None,
        }
    }

    /// Whether a file was written.
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Parameters shared by every request of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoutJob {
    /// Directory cutouts are written to.
    pub out_dir: PathBuf,
    /// Side length of the square cutout in pixels.
    pub image_size: u32,
    /// Multiplicative border around the galaxy.
    pub pad_factor: f64,
    /// Log skipped downloads at `warn` rather than `debug`.
    pub verbose: bool,
}

impl CutoutJob {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            image_size: config::DEFAULT_IMAGE_SIZE,
            pad_factor: config::DEFAULT_PAD_FACTOR,
            verbose: true,
        }
    }

    /// Sets the cutout geometry.
    pub fn with_geometry(mut self, image_size: u32, pad_factor: f64) -> Self {
        self.image_size = image_size;
        self.pad_factor = pad_factor;
        self
    }
}

impl From<&CutoutConfig> for CutoutJob {
    fn from(config: &CutoutConfig) -> Self {
        Self {
            out_dir: config.out_dir.clone(),
            image_size: config.image_size,
            pad_factor: config.pad_factor,
            verbose: config.verbose,
        }
    }
}

/// Everything needed to fetch one cutout.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoutRequest {
    pub pgc: u64,
    /// Centre right ascension, degrees.
    pub ra: f64,
    /// Centre declination, degrees.
    pub dec: f64,
    /// Arcsec per pixel.
    pub plate_scale: f64,
    /// Width and height in pixels.
    pub image_size: u32,
    pub output_path: PathBuf,
    pub verbose: bool,
}

impl CutoutRequest {
    /// Derives the request for one galaxy under the shared job parameters.
    pub fn for_galaxy(galaxy: &SelectedGalaxy, job: &CutoutJob) -> Self {
        let name = CutoutName::for_galaxy(galaxy);
        Self {
            pgc: galaxy.pgc,
            ra: galaxy.ra,
            dec: galaxy.dec,
            plate_scale: plate_scale(job.image_size, galaxy.log_d25, job.pad_factor),
            image_size: job.image_size,
            output_path: job.out_dir.join(name.file_name()),
            verbose: job.verbose,
        }
    }
}

/// An imaging service that can deliver cutouts.
#[async_trait]
pub trait CutoutService: Send + Sync {
    /// Returns the name of this service.
    fn name(&self) -> &str;

    /// Fetches one cutout and writes it to `request.output_path`.
    ///
    /// Remote failures yield `Ok(CutoutOutcome::Skipped)`; only local
    /// failures are returned as errors.
    async fn fetch(&self, request: &CutoutRequest) -> Result<CutoutOutcome, CutoutError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::selected_galaxy;

    #[test]
    fn test_plate_scale_example() {
        let scale = plate_scale(64, 1.0, 1.2);
        assert!((scale - 1.125).abs() < 1e-12);
    }

    #[test]
    fn test_plate_scale_proportionality() {
        let base = plate_scale(64, 1.0, 1.0);

        // Linear in pad factor.
        assert!((plate_scale(64, 1.0, 2.5) - 2.5 * base).abs() < 1e-12);
        // Linear in 10^logD25.
        assert!((plate_scale(64, 2.0, 1.0) - 10.0 * base).abs() < 1e-9);
        assert!((plate_scale(64, 1.0 + 2f64.log10(), 1.0) - 2.0 * base).abs() < 1e-9);
        // Inverse in image size.
        assert!((plate_scale(128, 1.0, 1.0) - base / 2.0).abs() < 1e-12);
        assert!((plate_scale(28, 1.0, 1.0) * 28.0 - base * 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_request_for_galaxy() {
        let mut galaxy = selected_galaxy(2557, 1.0);
        galaxy.position_angle = Some(35.0);
        galaxy.morph_type = Some("Sb".to_string());

        let job = CutoutJob {
            out_dir: PathBuf::from("/data/unproc"),
            image_size: 64,
            pad_factor: 1.2,
            verbose: false,
        };
        let request = CutoutRequest::for_galaxy(&galaxy, &job);

        assert_eq!(request.pgc, 2557);
        assert_eq!(request.image_size, 64);
        assert!((request.plate_scale - 1.125).abs() < 1e-12);
        assert_eq!(
            request.output_path,
            PathBuf::from("/data/unproc/glx_2557_35.0_Sb.jpg")
        );
        assert!(!request.verbose);
    }

    #[test]
    fn test_outcome_accessors() {
        let saved = CutoutOutcome::Saved {
            path: PathBuf::from("a.jpg"),
            bytes: 10,
        };
        assert!(saved.is_saved());
        assert_eq!(saved.path().unwrap(), &PathBuf::from("a.jpg"));

        let skipped = CutoutOutcome::Skipped {
            reason: "HTTP 500".to_string(),
        };
        assert!(!skipped.is_saved());
        assert!(skipped.path().is_none());
    }
}
