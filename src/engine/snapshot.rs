//! Durable catalog snapshots for GrainDB
//!
//! The whole table map is serialized with bincode; the tagged serde derives
//! on `Value` keep every variant's discriminant, so a reload produces the
//! same variant that was written.

use crate::catalog::Table;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Write the full catalog to the snapshot file
pub fn save(path: &Path, tables: &HashMap<String, Table>) -> Result<()> {
    let data = bincode::serialize(tables).map_err(|e| Error::Serialization(e.to_string()))?;
    fs::write(path, data)?;
    Ok(())
}

/// Load the catalog from the snapshot file
///
/// A missing file yields `None` (fresh database); any other I/O error
/// propagates.
pub fn load(path: &Path) -> Result<Option<HashMap<String, Table>>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let tables = bincode::deserialize(&data).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(Some(tables))
}
