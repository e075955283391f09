//! Department export discovery.

use std::path::{Path, PathBuf};

use prodtrace_model::DepartmentCode;

use crate::error::{IngestError, Result};

const DEPARTMENT_SUFFIXES: &[&str] = &["_SUPPLIERS", "-SUPPLIERS", "_SUPPLIER", "-SUPPLIER"];

/// A supplier export and the department it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentFile {
    pub department: DepartmentCode,
    pub path: PathBuf,
}

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Derive a department code from an export's file stem.
///
/// `bakery_suppliers.csv` and `Bakery.csv` both map to `BAKERY`.
pub fn department_from_path(path: &Path) -> Result<DepartmentCode> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .trim()
        .to_uppercase();
    let base = DEPARTMENT_SUFFIXES
        .iter()
        .find_map(|suffix| stem.strip_suffix(suffix))
        .unwrap_or(&stem);
    let code: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    DepartmentCode::new(code).map_err(|source| IngestError::Department {
        path: path.to_path_buf(),
        source,
    })
}

/// Lists the supplier exports in a directory, one per department.
pub fn discover_department_files(dir: &Path) -> Result<Vec<DepartmentFile>> {
    list_csv_files(dir)?
        .into_iter()
        .map(|path| {
            let department = department_from_path(&path)?;
            Ok(DepartmentFile { department, path })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_csv_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("bakery.csv");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_csv_files(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_department_from_path() {
        let code = department_from_path(Path::new("/x/bakery_suppliers.csv")).unwrap();
        assert_eq!(code.as_str(), "BAKERY");
        let code = department_from_path(Path::new("HMR.CSV")).unwrap();
        assert_eq!(code.as_str(), "HMR");
        let code = department_from_path(Path::new("hot food-suppliers.csv")).unwrap();
        assert_eq!(code.as_str(), "HOT_FOOD");
    }

    #[test]
    fn test_department_from_bare_suffix_fails() {
        assert!(department_from_path(Path::new("_suppliers.csv")).is_err());
    }
}
