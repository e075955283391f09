//! Supplier CSV loading.
//!
//! Loading never aborts on bad content: unreadable records and rows without
//! a supplier or product key are skipped and counted. A file that cannot be
//! read at all degrades to an empty load with a warning, so a missing
//! department export means "no suppliers known" rather than a failure.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use prodtrace_model::{DepartmentCode, SupplierRow};

use crate::error::{IngestError, Result};

use super::header::{ColumnMap, normalize_cell};

/// How the columns of a load were resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLayout {
    /// A header row was recognised.
    Named(ColumnMap),
    /// No header row; fixed column positions were used.
    Positional,
    /// Nothing to read.
    Empty,
}

/// Result of loading one department's supplier export.
#[derive(Debug, Clone)]
pub struct SupplierLoad {
    pub department: DepartmentCode,
    pub source: Option<PathBuf>,
    pub layout: HeaderLayout,
    /// Accepted rows in file order.
    pub rows: Vec<SupplierRow>,
    /// Rows dropped as malformed.
    pub skipped: usize,
}

impl SupplierLoad {
    pub fn empty(department: &DepartmentCode) -> Self {
        Self {
            department: department.clone(),
            source: None,
            layout: HeaderLayout::Empty,
            rows: Vec::new(),
            skipped: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum SkipReason {
    Unreadable,
    MissingSupplier,
    NoProductKey,
}

/// Load a supplier export from a file, degrading read failures to an empty load.
pub fn load_supplier_csv(department: &DepartmentCode, path: &Path) -> SupplierLoad {
    match read_supplier_csv(department, path) {
        Ok(load) => load,
        Err(error) => {
            warn!(
                department = %department,
                path = %path.display(),
                %error,
                "supplier export unreadable; continuing with no suppliers"
            );
            let mut load = SupplierLoad::empty(department);
            load.source = Some(path.to_path_buf());
            load
        }
    }
}

/// Load a supplier export from a file, reporting I/O failures.
pub fn read_supplier_csv(department: &DepartmentCode, path: &Path) -> Result<SupplierLoad> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                department = %department,
                path = %path.display(),
                "supplier export is not UTF-8; invalid bytes replaced"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    let mut load = load_supplier_csv_str(department, &text);
    load.source = Some(path.to_path_buf());
    Ok(load)
}

/// Load a supplier export from raw CSV text.
pub fn load_supplier_csv_str(department: &DepartmentCode, text: &str) -> SupplierLoad {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut load = SupplierLoad::empty(department);
    let mut columns: Option<ColumnMap> = None;

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                skip(&mut load, line, SkipReason::Unreadable);
                debug!(department = %department, line, %error, "unreadable CSV record");
                continue;
            }
        };
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }

        if matches!(load.layout, HeaderLayout::Empty) {
            if let Some(map) = ColumnMap::from_headers(&cells) {
                debug!(department = %department, ?map, "header row recognised");
                load.layout = HeaderLayout::Named(map.clone());
                columns = Some(map);
                continue;
            }
            debug!(department = %department, "no header row; using positional columns");
            load.layout = HeaderLayout::Positional;
        }

        let row = match &columns {
            Some(map) => map.extract(&cells),
            None => ColumnMap::positional(cells.len()).extract(&cells),
        };

        if row.supplier_code.is_empty() || row.supplier_name.is_empty() {
            skip(&mut load, line, SkipReason::MissingSupplier);
            continue;
        }
        if row.prod_code().is_none() && row.description().is_none() {
            skip(&mut load, line, SkipReason::NoProductKey);
            continue;
        }
        load.rows.push(row);
    }

    if load.skipped > 0 {
        warn!(
            department = %department,
            skipped = load.skipped,
            accepted = load.rows.len(),
            "skipped malformed supplier rows"
        );
    }
    load
}

fn skip(load: &mut SupplierLoad, line: usize, reason: SkipReason) {
    load.skipped += 1;
    debug!(department = %load.department, line, ?reason, "skipping supplier row");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bakery() -> DepartmentCode {
        DepartmentCode::new("BAKERY").unwrap()
    }

    #[test]
    fn test_named_layout_is_detected() {
        let text = "supplier_code,supplier_name,prod_code,product_description\nS1,Acme,P100,Flour 1kg\n";
        let load = load_supplier_csv_str(&bakery(), text);
        assert!(matches!(load.layout, HeaderLayout::Named(_)));
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.rows[0].prod_code, "P100");
    }

    #[test]
    fn test_blank_lines_are_ignored_without_counting() {
        let text = "\n,,,\nsupplier_code,supplier_name,prod_code\n,,\nS1,Acme,P100\n";
        let load = load_supplier_csv_str(&bakery(), text);
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.skipped, 0);
    }

    #[test]
    fn test_empty_text() {
        let load = load_supplier_csv_str(&bakery(), "");
        assert_eq!(load.layout, HeaderLayout::Empty);
        assert!(load.is_empty());
    }
}
