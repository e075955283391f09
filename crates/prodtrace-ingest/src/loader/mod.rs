//! Supplier export loading.

mod header;
mod reader;

pub use header::{Column, ColumnMap, normalize_cell, normalize_header};
pub use reader::{
    HeaderLayout, SupplierLoad, load_supplier_csv, load_supplier_csv_str, read_supplier_csv,
};
