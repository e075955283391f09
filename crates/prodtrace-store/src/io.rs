//! Reading and atomically rewriting the store document.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use prodtrace_model::{AuditRecord, Recipe, ScheduledProductionItem};

use crate::error::{Result, StoreError};

/// On-disk layout: one JSON object holding each collection.
///
/// Collections this crate does not know are kept in `other` and written back
/// unchanged. Audit records stay raw here and are parsed one at a time by
/// [`split_audits`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoreDocument {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default, rename = "productionSchedules")]
    pub schedules: Vec<ScheduledProductionItem>,
    #[serde(default)]
    pub audits: Vec<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A stored audit record that does not parse as an [`AuditRecord`].
///
/// It is kept verbatim and written back on save at its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreadableAudit {
    /// Index in the stored `audits` array.
    pub position: usize,
    /// The record's `uid`, when it has a string one.
    pub uid: Option<String>,
    pub error: String,
    raw: Value,
}

impl UnreadableAudit {
    /// The uid, or `audits[<position>]` for records without one.
    pub fn label(&self) -> String {
        self.uid
            .clone()
            .unwrap_or_else(|| format!("audits[{}]", self.position))
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub(crate) fn schedule_id(&self) -> Option<&str> {
        self.raw
            .get("originalScheduleId")
            .and_then(Value::as_str)
            .map(str::trim)
    }
}

/// Parse each stored audit on its own; failures are set aside, not fatal.
pub(crate) fn split_audits(values: Vec<Value>) -> (Vec<AuditRecord>, Vec<UnreadableAudit>) {
    let mut records = Vec::with_capacity(values.len());
    let mut unreadable = Vec::new();
    for (position, raw) in values.into_iter().enumerate() {
        match AuditRecord::deserialize(&raw) {
            Ok(record) => records.push(record),
            Err(error) => unreadable.push(UnreadableAudit {
                position,
                uid: raw.get("uid").and_then(Value::as_str).map(str::to_string),
                error: error.to_string(),
                raw,
            }),
        }
    }
    (records, unreadable)
}

/// Serialize parsed records and put unreadable ones back where they were.
pub(crate) fn merge_audits(
    path: &Path,
    records: &[AuditRecord],
    unreadable: &[UnreadableAudit],
) -> Result<Vec<Value>> {
    let mut values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<serde_json::Result<Vec<_>>>()
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    for entry in unreadable {
        let at = entry.position.min(values.len());
        values.insert(at, entry.raw.clone());
    }
    Ok(values)
}

/// Read the document at `path`. A missing or blank file is an empty store.
pub(crate) fn read_document(path: &Path) -> Result<StoreDocument> {
    if !path.exists() {
        return Ok(StoreDocument::default());
    }
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(StoreDocument::default());
    }
    serde_json::from_str(&contents).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the document with temp file + `sync_all` + rename.
pub(crate) fn write_document(path: &Path, document: &StoreDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = temp_file_path(path);
    let mut file = File::create(&temp_path).map_err(|source| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(json.as_bytes()).map_err(|source| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source,
    })?;
    file.sync_all().map_err(|source| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn temp_file_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audit_json(uid: &str) -> Value {
        serde_json::json!({
            "uid": uid,
            "department": "BAKERY",
            "date": "2024-03-05",
            "department_manager": "Alex",
            "food_handler_responsible": "Sam",
            "planned_qty": 10,
            "ingredient_list": ["Flour 1kg"],
            "supplier_name": ["Unknown"]
        })
    }

    #[test]
    fn bad_audits_are_set_aside_and_restored_in_place() {
        let mut bad = audit_json("u2");
        bad["department"] = Value::from("");
        let mut no_uid = audit_json("u3");
        no_uid.as_object_mut().unwrap().remove("uid");
        let values = vec![audit_json("u1"), bad.clone(), audit_json("u4"), no_uid];

        let (records, unreadable) = split_audits(values.clone());
        assert_eq!(records.len(), 2);
        assert_eq!(unreadable.len(), 2);
        assert_eq!(unreadable[0].position, 1);
        assert_eq!(unreadable[0].label(), "u2");
        assert_eq!(unreadable[1].label(), "audits[3]");
        assert_eq!(unreadable[0].raw(), &bad);

        let merged = merge_audits(Path::new("db.json"), &records, &unreadable).unwrap();
        let uids: Vec<Option<&str>> = merged.iter().map(|v| v["uid"].as_str()).collect();
        assert_eq!(uids, vec![Some("u1"), Some("u2"), Some("u4"), None]);
        assert_eq!(merged[1], bad);
    }

    #[test]
    fn unknown_collections_survive_a_round_trip() {
        let json = r#"{"recipes": [], "users": [{"name": "Alex"}], "audits": []}"#;
        let document: StoreDocument = serde_json::from_str(json).unwrap();
        assert!(document.schedules.is_empty());
        assert!(document.other.contains_key("users"));
        let back = serde_json::to_value(&document).unwrap();
        assert_eq!(back["users"][0]["name"], "Alex");
        assert!(back["productionSchedules"].as_array().unwrap().is_empty());
    }
}
