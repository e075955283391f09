//! Supplier rows and records.
//!
//! A [`SupplierRow`] is one cleaned line from a department's supplier export,
//! with canonical column names regardless of the header variant the file used.
//! A [`SupplierRecord`] is the same data bound to the department it was loaded
//! for; records are immutable for the lifetime of a load cycle.

use serde::{Deserialize, Serialize};

use crate::ids::DepartmentCode;

/// One supplier line with canonical field names. Empty strings mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRow {
    pub supplier_code: String,
    pub supplier_name: String,
    pub supplier_product_code: String,
    pub prod_code: String,
    pub ean: String,
    pub product_description: String,
    pub pack_size: String,
    pub supplier_address: String,
}

impl SupplierRow {
    /// Trimmed product code, if any.
    pub fn prod_code(&self) -> Option<&str> {
        non_blank(&self.prod_code)
    }

    /// Trimmed product description, if any.
    pub fn description(&self) -> Option<&str> {
        non_blank(&self.product_description)
    }
}

/// A supplier for one product, scoped to the department whose export listed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub supplier_code: String,
    pub supplier_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_address: Option<String>,
    pub department: DepartmentCode,
}

impl SupplierRecord {
    pub fn from_row(row: &SupplierRow, department: &DepartmentCode) -> Self {
        Self {
            supplier_code: row.supplier_code.trim().to_string(),
            supplier_name: row.supplier_name.trim().to_string(),
            supplier_product_code: optional(&row.supplier_product_code),
            prod_code: optional(&row.prod_code),
            ean: optional(&row.ean),
            pack_size: optional(&row.pack_size),
            product_description: optional(&row.product_description),
            supplier_address: optional(&row.supplier_address),
            department: department.clone(),
        }
    }

    /// One-line supplier detail string used in audit records.
    ///
    /// Joins the supplier code with whichever of supplier product code,
    /// pack size, and EAN are present.
    pub fn details(&self) -> String {
        let mut parts = vec![self.supplier_code.as_str()];
        for part in [&self.supplier_product_code, &self.pack_size, &self.ean]
            .into_iter()
            .flatten()
        {
            parts.push(part.as_str());
        }
        parts.join(" | ")
    }

    /// True when both records describe the same supplier product.
    pub fn same_source(&self, other: &Self) -> bool {
        self.supplier_code == other.supplier_code
            && self.supplier_product_code == other.supplier_product_code
            && self.prod_code == other.prod_code
            && self.product_description == other.product_description
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn optional(value: &str) -> Option<String> {
    non_blank(value).map(str::to_string)
}
