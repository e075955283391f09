//! Mapping export for inspection and reuse.
//!
//! Each department's key-to-supplier view is written as a JSON file named
//! `{DEPARTMENT}_supplier_mapping.json`:
//!
//! ```json
//! {
//!   "department": "BAKERY",
//!   "generated_at": "2024-03-01T09:30:00Z",
//!   "entries": { "Flour 1kg": { "supplier_code": "S1", ... } }
//! }
//! ```
//!
//! Entries are keyed exactly as the index keys them and sorted, so two
//! exports of the same CSV diff cleanly.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use prodtrace_model::{DepartmentCode, SupplierRecord};

use crate::error::{MapError, Result};
use crate::index::SupplierMappingIndex;

/// Serialized form of one department's mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingExport {
    pub department: DepartmentCode,
    pub generated_at: DateTime<Utc>,
    pub entries: BTreeMap<String, SupplierRecord>,
}

impl MappingExport {
    pub fn from_index(index: &SupplierMappingIndex) -> Self {
        Self {
            department: index.department().clone(),
            generated_at: Utc::now(),
            entries: index
                .entries()
                .map(|(key, record)| (key.to_string(), record.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File name used for a department's export.
pub fn export_filename(department: &DepartmentCode) -> String {
    format!("{}_supplier_mapping.json", department.as_str())
}

/// Writes and reads mapping exports under one directory.
#[derive(Debug, Clone)]
pub struct MappingExportWriter {
    base_dir: PathBuf,
}

impl MappingExportWriter {
    /// Create a writer for `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|source| MapError::Io {
            operation: "create export directory",
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_for(&self, department: &DepartmentCode) -> PathBuf {
        self.base_dir.join(export_filename(department))
    }

    /// Write the export, replacing any previous file for the department.
    pub fn write(&self, export: &MappingExport) -> Result<PathBuf> {
        let path = self.path_for(&export.department);
        let json = serde_json::to_string_pretty(export).map_err(|source| MapError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| MapError::Io {
            operation: "write mapping export",
            path: path.clone(),
            source,
        })?;
        info!(
            department = %export.department,
            entries = export.len(),
            path = %path.display(),
            "mapping export written"
        );
        Ok(path)
    }

    /// Load a department's export. Returns `None` if none was written.
    pub fn load(&self, department: &DepartmentCode) -> Result<Option<MappingExport>> {
        let path = self.path_for(department);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(|source| MapError::Io {
            operation: "read mapping export",
            path: path.clone(),
            source,
        })?;
        let export = serde_json::from_str(&contents)
            .map_err(|source| MapError::Json { path, source })?;
        Ok(Some(export))
    }
}
