// 📥 CSV Import - bulk load people and artifacts
//
// Rows go through the same drafts and catalog calls as the HTTP API, so an
// import can never store something the API would reject.

use crate::catalog::{Catalog, CatalogError};
use crate::entities::{ArtifactDraft, PersonDraft};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    /// (CSV line number, reason)
    pub rejected: Vec<(u64, String)>,
}

/// Rows with headers `first,last,title`
pub fn import_people(catalog: &Catalog, csv_path: &Path) -> Result<ImportReport> {
    import_rows(csv_path, |draft: PersonDraft| catalog.add_person(draft).map(|_| ()))
}

/// Rows with headers `name,shiny`
pub fn import_artifacts(catalog: &Catalog, csv_path: &Path) -> Result<ImportReport> {
    import_rows(csv_path, |draft: ArtifactDraft| catalog.create_artifact(draft).map(|_| ()))
}

fn import_rows<D, F>(csv_path: &Path, mut insert: F) -> Result<ImportReport>
where
    D: DeserializeOwned,
    F: FnMut(D) -> Result<(), CatalogError>,
{
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut report = ImportReport::default();

    for (index, result) in rdr.deserialize::<D>().enumerate() {
        // header is line 1
        let line = index as u64 + 2;

        let draft = match result {
            Ok(draft) => draft,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable row");
                report.rejected.push((line, e.to_string()));
                continue;
            }
        };

        match insert(draft) {
            Ok(()) => report.inserted += 1,
            Err(CatalogError::Validation(errors)) => {
                warn!(line, %errors, "skipping invalid row");
                report.rejected.push((line, errors.to_string()));
            }
            Err(other) => return Err(other).context("Import aborted by storage failure"),
        }
    }

    info!(
        inserted = report.inserted,
        rejected = report.rejected.len(),
        "import finished from {}",
        csv_path.display()
    );

    Ok(report)
}
