//! Selection of the galaxies to fetch cutouts for.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{CatalogRecord, SelectedGalaxy, GALAXY_OBJECT_TYPE};
use crate::metrics;

/// Selection predicate over catalog records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    /// Exclusive lower bound on `logD25`.
    #[serde(default = "default_ld_min")]
    pub ld_min: f64,

    /// Exclusive upper bound on `logD25`.
    #[serde(default = "default_ld_max")]
    pub ld_max: f64,

    /// Required object type code.
    #[serde(default = "default_object_type")]
    pub object_type: String,
}

fn default_ld_min() -> f64 {
    0.8
}

fn default_ld_max() -> f64 {
    1.3
}

fn default_object_type() -> String {
    GALAXY_OBJECT_TYPE.to_string()
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            ld_min: default_ld_min(),
            ld_max: default_ld_max(),
            object_type: default_object_type(),
        }
    }
}

impl SelectionCriteria {
    /// Galaxy selection with the given size bounds.
    pub fn new(ld_min: f64, ld_max: f64) -> Self {
        Self {
            ld_min,
            ld_max,
            ..Self::default()
        }
    }

    /// Whether a record passes: `ld_min < logD25 < ld_max` and the object type matches.
    ///
    /// Records without a size measure never match.
    pub fn matches(&self, record: &CatalogRecord) -> bool {
        let in_range = record
            .log_d25
            .is_some_and(|ld| self.ld_min < ld && ld < self.ld_max);
        let type_ok = record
            .object_type
            .as_deref()
            .is_some_and(|t| t.trim() == self.object_type);
        in_range && type_ok
    }
}

/// Record counts reported by a filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Records read from the catalog.
    pub ingested: usize,
    /// Records passing selection.
    pub selected: usize,
    /// Selected records that carry a morphological type.
    pub with_morphology: usize,
}

/// Result of applying a selection to the catalog.
#[derive(Debug, Clone, Default)]
pub struct FilteredCatalog {
    pub galaxies: Vec<SelectedGalaxy>,
    pub summary: FilterSummary,
}

/// Applies the selection predicate and normalizes the surviving records.
pub fn filter_catalog(records: &[CatalogRecord], criteria: &SelectionCriteria) -> FilteredCatalog {
    info!("{} records ingested", records.len());

    let galaxies: Vec<SelectedGalaxy> = records
        .iter()
        .filter(|r| criteria.matches(r))
        .filter_map(SelectedGalaxy::from_record)
        .collect();

    let summary = FilterSummary {
        ingested: records.len(),
        selected: galaxies.len(),
        with_morphology: galaxies.iter().filter(|g| g.has_morphology()).count(),
    };

    info!(
        ld_min = criteria.ld_min,
        ld_max = criteria.ld_max,
        "Selected {} galaxies",
        summary.selected
    );
    info!("{} with morphological information", summary.with_morphology);
    metrics::RECORDS_SELECTED.inc_by(summary.selected as u64);

    FilteredCatalog { galaxies, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::catalog_record;

    fn sample_catalog() -> Vec<CatalogRecord> {
        let mut records = vec![
            catalog_record(1, Some(0.8), "G"),
            catalog_record(2, Some(0.81), "G"),
            catalog_record(3, Some(1.0), "G"),
            catalog_record(4, Some(1.29), "G"),
            catalog_record(5, Some(1.3), "G"),
            catalog_record(6, Some(1.0), "S"),
            catalog_record(7, None, "G"),
            catalog_record(8, Some(f64::NAN), "G"),
            catalog_record(9, Some(1.1), "G"),
        ];
        records[2].morph_type = Some("Sb".to_string());
        records[8].morph_type = Some("".to_string());
        records[3].object_type = Some(" G ".to_string());
        records
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let filtered = filter_catalog(&sample_catalog(), &SelectionCriteria::new(0.8, 1.3));
        let ids: Vec<u64> = filtered.galaxies.iter().map(|g| g.pgc).collect();
        assert_eq!(ids, vec![2, 3, 4, 9]);
        for galaxy in &filtered.galaxies {
            assert!(0.8 < galaxy.log_d25 && galaxy.log_d25 < 1.3);
        }
    }

    #[test]
    fn test_summary_counts() {
        let records = sample_catalog();
        let filtered = filter_catalog(&records, &SelectionCriteria::new(0.8, 1.3));
        assert_eq!(
            filtered.summary,
            FilterSummary {
                ingested: 9,
                selected: 4,
                with_morphology: 1,
            }
        );
        assert!(filtered.summary.selected <= filtered.summary.ingested);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample_catalog();
        let criteria = SelectionCriteria::new(0.8, 1.3);
        let once = filter_catalog(&records, &criteria);

        let survivors: Vec<CatalogRecord> = records
            .iter()
            .filter(|r| once.galaxies.iter().any(|g| g.pgc == r.pgc))
            .cloned()
            .collect();
        let twice = filter_catalog(&survivors, &criteria);

        assert_eq!(once.galaxies, twice.galaxies);
    }

    #[test]
    fn test_object_type_must_match() {
        let criteria = SelectionCriteria::new(0.0, 2.0);
        let mut record = catalog_record(10, Some(1.0), "G");
        assert!(criteria.matches(&record));

        record.object_type = Some("M".to_string());
        assert!(!criteria.matches(&record));

        record.object_type = None;
        assert!(!criteria.matches(&record));
    }

    #[test]
    fn test_empty_catalog() {
        let filtered = filter_catalog(&[], &SelectionCriteria::default());
        assert!(filtered.galaxies.is_empty());
        assert_eq!(filtered.summary, FilterSummary::default());
    }
}
