use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MerkleTreeError;

/// One row of the whitelist CSV: hex address, decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvEntry {
    pub address: String,
    pub amount: String,
}

impl CsvEntry {
    pub fn new_from_file(path: &Path) -> Result<Vec<Self>, MerkleTreeError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut entries = Vec::new();
        // Malformed rows are errors, never skipped.
        for record in reader.deserialize() {
            let entry: CsvEntry = record?;
            entries.push(entry);
        }
        Ok(entries)
    }
}
