mod parser;

use crate::analytics::ServiceRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Importer for flat service-record tables exported by the source system.
///
/// Field-level problems (unparseable dates, non-numeric costs, stray result
/// labels) degrade to absent values so the calculators can score imperfect
/// data; only unreadable input or structurally invalid CSV fails the import.
pub struct ServiceRecordImporter;

impl ServiceRecordImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ServiceRecord>, ImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ServiceRecord>, ImportError> {
        parser::parse_records(reader).map_err(ImportError::from)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read service-record export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid service-record CSV data: {0}")]
    Csv(#[from] csv::Error),
}
