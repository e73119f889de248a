//! CSV persistence for the catalog.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::{CatalogError, CatalogRecord, CatalogTable};

/// Writes a raw table (header plus all rows) to a CSV file.
pub fn write_table(path: &Path, table: &CatalogTable) -> Result<(), CatalogError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    debug!(rows = table.len(), path = %path.display(), "Wrote catalog table");
    Ok(())
}

/// Writes typed records to a CSV file with the standard catalog header.
pub fn write_records(path: &Path, records: &[CatalogRecord]) -> Result<(), CatalogError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads the persisted catalog into memory.
///
/// Extra columns are ignored and empty cells become `None`. Fails if a PGC
/// identifier appears more than once.
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogRecord>, CatalogError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let record: CatalogRecord = result?;
        if !seen.insert(record.pgc) {
            return Err(CatalogError::DuplicateIdentifier(record.pgc));
        }
        records.push(record);
    }

    debug!(rows = records.len(), path = %path.display(), "Read catalog");
    Ok(records)
}
