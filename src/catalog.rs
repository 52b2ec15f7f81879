use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::UpdateError;
use crate::types::ServiceCatalogEntry;

/// Lê o catálogo de serviços (`Department,Service,Target`).
pub fn load_catalog(path: &Path) -> Result<Vec<ServiceCatalogEntry>, UpdateError> {
    let reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| UpdateError::data_source("service catalog", e))?;
    read_catalog(reader)
}

fn read_catalog<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<ServiceCatalogEntry>, UpdateError> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    for row in reader.deserialize() {
        let entry: ServiceCatalogEntry =
            row.map_err(|e| UpdateError::data_source("service catalog", e))?;
        if !seen.insert(entry.service.clone()) {
            return Err(UpdateError::data_source(
                "service catalog",
                format!("duplicate service {:?}", entry.service),
            ));
        }
        entries.push(entry);
    }
    if entries.is_empty() {
        return Err(UpdateError::data_source("service catalog", "no services listed"));
    }
    Ok(entries)
}
