//! Testing utilities and mock implementations.
//!
//! Mocks stand in for the two remote services so the pipeline can be
//! exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use stamps_core::testing::{MockCatalogSource, MockCutoutService};
//!
//! let source = MockCatalogSource::with_rows(&[
//!     ["1", "00 00 00", "+00 00 00", "G", "Sb", "1.0", "30"],
//! ]);
//! let service = MockCutoutService::new();
//! service.skip_pgc(1).await;
//! ```

mod mock_catalog_source;
mod mock_cutout_service;

pub use mock_catalog_source::MockCatalogSource;
pub use mock_cutout_service::MockCutoutService;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io::Cursor;
    use std::path::Path;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    use crate::catalog::{CatalogRecord, SelectedGalaxy};

    /// Create a catalog record with no morphology or position angle.
    pub fn catalog_record(pgc: u64, log_d25: Option<f64>, object_type: &str) -> CatalogRecord {
        CatalogRecord {
            pgc,
            ra_sexagesimal: None,
            dec_sexagesimal: None,
            object_type: Some(object_type.to_string()),
            morph_type: None,
            log_d25,
            position_angle: None,
            ra: pgc as f64 * 0.01,
            dec: 10.0,
        }
    }

    /// Create a selected galaxy with no morphology or position angle.
    pub fn selected_galaxy(pgc: u64, log_d25: f64) -> SelectedGalaxy {
        SelectedGalaxy {
            pgc,
            ra: pgc as f64 * 0.01,
            dec: 10.0,
            log_d25,
            morph_type: None,
            position_angle: None,
        }
    }

    /// Encode a square JPEG with an off-centre bright ellipse.
    pub fn jpeg_bytes(size: u32) -> Vec<u8> {
        let c = size as f32 / 2.0;
        let image = RgbImage::from_fn(size, size, |x, y| {
            let dx = (x as f32 - c) / (size as f32 * 0.35);
            let dy = (y as f32 - c) / (size as f32 * 0.15);
            let v = (255.0 * (-(dx * dx + dy * dy)).exp()) as u8;
            Rgb([v, v / 2, v / 4])
        });

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .expect("in-memory JPEG encoding");
        buffer.into_inner()
    }

    /// Write a test cutout JPEG to `path`.
    pub fn write_test_cutout(path: &Path, size: u32) {
        std::fs::write(path, jpeg_bytes(size)).expect("write test cutout");
    }
}
