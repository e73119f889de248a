//! Configuration for cutout generation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(crate) const DEFAULT_IMAGE_SIZE: u32 = 64;
pub(crate) const DEFAULT_PAD_FACTOR: f64 = 1.2;

/// Imaging service and cutout geometry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoutConfig {
    /// Base URL of the SkyServer `ImgCutout` service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory cutouts are written to.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Side length of the square cutout in pixels.
    #[serde(default = "default_image_size")]
    pub image_size: u32,

    /// Multiplicative border around the galaxy.
    #[serde(default = "default_pad_factor")]
    pub pad_factor: f64,

    /// Report skipped downloads at warning level.
    #[serde(default = "default_verbose")]
    pub verbose: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent sent to the imaging service.
    #[serde(default = "crate::catalog::default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://skyserver.sdss.org/dr16/SkyServerWS/ImgCutout".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("./")
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

fn default_pad_factor() -> f64 {
    DEFAULT_PAD_FACTOR
}

fn default_verbose() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl Default for CutoutConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            out_dir: default_out_dir(),
            image_size: default_image_size(),
            pad_factor: default_pad_factor(),
            verbose: default_verbose(),
            timeout_secs: default_timeout(),
            user_agent: crate::catalog::default_user_agent(),
        }
    }
}

impl CutoutConfig {
    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the output directory.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }
}
