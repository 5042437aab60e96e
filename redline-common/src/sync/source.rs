//! Catalog source loader
//!
//! Reads the external CSV source of truth into an ordered sequence of
//! candidate catalog entries. No side effects beyond reading the file.
//!
//! Expected format: UTF-8, comma-delimited, header row required with at
//! least the columns `project`, `device`, `page_name`, `page_path`. Column
//! order is irrelevant; extra columns are ignored.

use crate::db::wireframes::IdentityKey;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Columns the source header must provide
const REQUIRED_COLUMNS: [&str; 4] = ["project", "device", "page_name", "page_path"];

/// One row decoded from the catalog source.
///
/// Same four fields as the catalog identity tuple, no guid yet. Empty
/// strings are valid field values, not missing data.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    pub project: String,
    pub device: String,
    pub page_name: String,
    pub page_path: String,
}

impl SourceRecord {
    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            project: self.project.clone(),
            device: self.device.clone(),
            page_name: self.page_name.clone(),
            page_path: self.page_path.clone(),
        }
    }
}

/// Load the catalog source, preserving row order.
///
/// Errors: `SourceNotFound` when the file is missing, `SourceMalformed`
/// when the header lacks a required column or a row fails to decode.
pub fn load_source(path: &Path) -> Result<Vec<SourceRecord>> {
    if !path.exists() {
        return Err(Error::SourceNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::SourceMalformed(e.to_string()))?;

    // Validate the header up front so a missing column reports once,
    // not per row
    let headers = reader
        .headers()
        .map_err(|e| Error::SourceMalformed(e.to_string()))?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::SourceMalformed(format!(
                "header is missing required column '{}'",
                column
            )));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<SourceRecord>() {
        let record = row.map_err(|e| Error::SourceMalformed(e.to_string()))?;
        records.push(record);
    }

    Ok(records)
}
