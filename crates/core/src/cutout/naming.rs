//! Cutout filenames.
//!
//! The filename is the only place a cutout's orientation and classification
//! are persisted, so it has to survive a round trip:
//! `glx_{pgc}_{pa:.1}_{mtype}.jpg`.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use crate::catalog::{SelectedGalaxy, ABSENT_MARKER};

/// Prefix shared by every cutout filename.
pub const CUTOUT_PREFIX: &str = "glx";

// Identifier and angle never contain `_`, so everything after the third
// separator belongs to the morphological type.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^glx_(\d+)_([^_]+)_(.+)\.jpg$").expect("cutout name pattern is valid")
});

/// Errors from parsing a cutout filename.
#[derive(Debug, Error, PartialEq)]
pub enum NameError {
    #[error("not a cutout filename: {0}")]
    Pattern(String),

    #[error("invalid position angle {angle:?} in {name}")]
    Angle { name: String, angle: String },

    #[error("invalid identifier in {0}")]
    Identifier(String),
}

/// The fields encoded in a cutout filename.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoutName {
    pub pgc: u64,
    /// Position angle in degrees, `0.0` when the catalog has none.
    pub position_angle: f64,
    /// Morphological type, already sanitized; `NA` when absent.
    pub morph_type: String,
}

impl CutoutName {
    pub fn for_galaxy(galaxy: &SelectedGalaxy) -> Self {
        Self {
            pgc: galaxy.pgc,
            position_angle: galaxy.position_angle.unwrap_or(0.0),
            morph_type: sanitize_component(galaxy.morph_label()),
        }
    }

    /// Renders the filename.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{:.1}_{}.jpg",
            CUTOUT_PREFIX, self.pgc, self.position_angle, self.morph_type
        )
    }

    /// Parses a filename produced by [`CutoutName::file_name`].
    pub fn parse(file_name: &str) -> Result<Self, NameError> {
        let caps = NAME_PATTERN
            .captures(file_name)
            .ok_or_else(|| NameError::Pattern(file_name.to_string()))?;

        let pgc = caps[1]
            .parse()
            .map_err(|_| NameError::Identifier(file_name.to_string()))?;

        let angle = &caps[2];
        let position_angle = angle
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| NameError::Angle {
                name: file_name.to_string(),
                angle: angle.to_string(),
            })?;

        Ok(Self {
            pgc,
            position_angle,
            morph_type: caps[3].to_string(),
        })
    }
}

/// Makes a value safe to embed in a single path component.
///
/// Path separators, whitespace and control characters become `-`. A blank
/// value becomes the absent marker.
pub fn sanitize_component(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ABSENT_MARKER.to_string();
    }
    trimmed
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() || c.is_control() {
                '-'
            } else {
                c
            }
        })
        .collect()
}
