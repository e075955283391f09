//! Supplier data ingestion.
//!
//! This crate turns per-department supplier exports into canonical
//! [`SupplierRow`](prodtrace_model::SupplierRow)s.
//!
//! # Features
//!
//! - **Header tolerance**: `ing.prod_code`, `prod_code` and `product_code`
//!   (in that priority) all resolve to the product-code column; headers are
//!   matched case- and whitespace-insensitively
//! - **Headerless exports**: fixed column positions when no header row is found
//! - **Silent degradation**: unreadable files load as empty with a warning;
//!   malformed rows are skipped and counted
//! - **Discovery**: find department exports in a folder
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use prodtrace_ingest::{discover_department_files, load_supplier_csv};
//!
//! for file in discover_department_files(Path::new("data/suppliers"))? {
//!     let load = load_supplier_csv(&file.department, &file.path);
//!     println!("{}: {} rows", file.department, load.rows.len());
//! }
//! ```

mod loader;
mod discovery;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use loader::{
    Column, ColumnMap, HeaderLayout, SupplierLoad, load_supplier_csv, load_supplier_csv_str,
    normalize_cell, normalize_header, read_supplier_csv,
};

// === File Discovery ===
pub use discovery::{
    DepartmentFile, department_from_path, discover_department_files, list_csv_files,
};
