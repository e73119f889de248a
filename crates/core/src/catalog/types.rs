//! Catalog data types.

use serde::{Deserialize, Serialize};

use super::coords::{parse_dec_degrees, parse_ra_hours};
use super::{CatalogError, ABSENT_MARKER};

/// Column holding the sexagesimal right ascension (hours).
pub const RA_SEXAGESIMAL_COLUMN: &str = "RAJ2000";
/// Column holding the sexagesimal declination (degrees).
pub const DEC_SEXAGESIMAL_COLUMN: &str = "DEJ2000";

/// One row of the persisted catalog.
///
/// Field names follow the HyperLEDA column names so the CSV header can be
/// read back directly. Empty cells deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// PGC identifier, unique within the catalog.
    #[serde(rename = "PGC")]
    pub pgc: u64,
    /// Raw right ascension as delivered by the service.
    #[serde(rename = "RAJ2000", default)]
    pub ra_sexagesimal: Option<String>,
    /// Raw declination as delivered by the service.
    #[serde(rename = "DEJ2000", default)]
    pub dec_sexagesimal: Option<String>,
    /// Object type code (`G` for galaxies).
    #[serde(rename = "OType", default)]
    pub object_type: Option<String>,
    /// Morphological type.
    #[serde(rename = "MType", default)]
    pub morph_type: Option<String>,
    /// log10 of the D25 diameter in 0.1 arcmin.
    #[serde(rename = "logD25", default)]
    pub log_d25: Option<f64>,
    /// Position angle of the major axis, degrees.
    #[serde(rename = "PA", default)]
    pub position_angle: Option<f64>,
    /// Right ascension, decimal degrees.
    pub ra: f64,
    /// Declination, decimal degrees.
    pub dec: f64,
}

/// A record that passed selection, with absent fields normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedGalaxy {
    pub pgc: u64,
    pub ra: f64,
    pub dec: f64,
    pub log_d25: f64,
    /// `None` when the catalog carries no (or a blank) morphological type.
    pub morph_type: Option<String>,
    /// `None` when the catalog carries no position angle.
    pub position_angle: Option<f64>,
}

impl SelectedGalaxy {
    /// Builds a selected galaxy from a catalog record.
    ///
    /// Returns `None` if the record has no size measure, since it could never
    /// have passed selection.
    pub fn from_record(record: &CatalogRecord) -> Option<Self> {
        Some(Self {
            pgc: record.pgc,
            ra: record.ra,
            dec: record.dec,
            log_d25: record.log_d25?,
            morph_type: non_blank(record.morph_type.as_deref()),
            position_angle: record.position_angle.filter(|pa| pa.is_finite()),
        })
    }

    /// Morphological type, or the absent marker.
    pub fn morph_label(&self) -> &str {
        self.morph_type.as_deref().unwrap_or(ABSENT_MARKER)
    }

    /// Whether the galaxy carries morphological information.
    pub fn has_morphology(&self) -> bool {
        self.morph_type.is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ABSENT_MARKER)
        .map(str::to_string)
}

/// The raw catalog table as downloaded: a header and string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CatalogTable {
    /// Creates a table, checking that every row matches the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, CatalogError> {
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(CatalogError::ParseError(format!(
                "row {} has {} fields, expected {}",
                idx,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Parses the sexagesimal coordinate columns and appends `ra` and `dec`
    /// columns in decimal degrees.
    pub fn append_decimal_coordinates(&mut self) -> Result<(), CatalogError> {
        let ra_idx = self
            .column_index(RA_SEXAGESIMAL_COLUMN)
            .ok_or_else(|| CatalogError::MissingColumn(RA_SEXAGESIMAL_COLUMN.to_string()))?;
        let dec_idx = self
            .column_index(DEC_SEXAGESIMAL_COLUMN)
            .ok_or_else(|| CatalogError::MissingColumn(DEC_SEXAGESIMAL_COLUMN.to_string()))?;

        let mut decimal = Vec::with_capacity(self.rows.len());
        for (row_idx, row) in self.rows.iter().enumerate() {
            let ra = parse_ra_hours(&row[ra_idx])
                .map_err(|source| CatalogError::Coordinate { row: row_idx, source })?;
            let dec = parse_dec_degrees(&row[dec_idx])
                .map_err(|source| CatalogError::Coordinate { row: row_idx, source })?;
            decimal.push((ra, dec));
        }

        for (row, (ra, dec)) in self.rows.iter_mut().zip(decimal) {
            row.push(ra.to_string());
            row.push(dec.to_string());
        }
        self.columns.push("ra".to_string());
        self.columns.push("dec".to_string());
        Ok(())
    }
}
