//! The compliance audit record.
//!
//! An audit record is a denormalized document: every array-valued field is
//! positionally aligned with `ingredient_list`, so entry `i` of
//! `supplier_name`, `batch_code`, etc. describes ingredient `i`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::DepartmentCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub uid: String,
    pub department: DepartmentCode,
    pub date: NaiveDate,
    pub department_manager: String,
    pub food_handler_responsible: String,
    pub planned_qty: f64,
    #[serde(default)]
    pub recipe_code: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(
        rename = "originalScheduleId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_schedule_id: Option<String>,
    #[serde(default)]
    pub product_name: Vec<String>,
    #[serde(default)]
    pub ingredient_list: Vec<String>,
    #[serde(default)]
    pub supplier_name: Vec<String>,
    #[serde(default)]
    pub supplier_details: Vec<String>,
    #[serde(default)]
    pub address_of_supplier: Vec<String>,
    #[serde(default)]
    pub batch_code: Vec<String>,
    #[serde(default)]
    pub sell_by_date: Vec<String>,
    #[serde(default)]
    pub receiving_date: Vec<String>,
    #[serde(default)]
    pub country_of_origin: Vec<String>,
    /// Fields written by other tools (json-server's `id`, for one), kept
    /// so a rewrite of the record does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A positional field whose length disagrees with `ingredient_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misalignment {
    pub field: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl AuditRecord {
    /// Every positional array, paired with its serialized field name.
    pub fn aligned_fields(&self) -> [(&'static str, &Vec<String>); 9] {
        [
            ("product_name", &self.product_name),
            ("supplier_name", &self.supplier_name),
            ("supplier_details", &self.supplier_details),
            ("address_of_supplier", &self.address_of_supplier),
            ("batch_code", &self.batch_code),
            ("sell_by_date", &self.sell_by_date),
            ("receiving_date", &self.receiving_date),
            ("country_of_origin", &self.country_of_origin),
            ("ingredient_list", &self.ingredient_list),
        ]
    }

    fn aligned_fields_mut(&mut self) -> [&mut Vec<String>; 8] {
        [
            &mut self.product_name,
            &mut self.supplier_name,
            &mut self.supplier_details,
            &mut self.address_of_supplier,
            &mut self.batch_code,
            &mut self.sell_by_date,
            &mut self.receiving_date,
            &mut self.country_of_origin,
        ]
    }

    /// First field whose length differs from `ingredient_list`, if any.
    pub fn check_alignment(&self) -> std::result::Result<(), Misalignment> {
        let expected = self.ingredient_list.len();
        for (field, values) in self.aligned_fields() {
            if values.len() != expected {
                return Err(Misalignment {
                    field,
                    expected,
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }

    /// Pad short positional arrays with blanks up to the ingredient count.
    ///
    /// Returns the number of slots added. Arrays longer than the ingredient
    /// list are left alone; they still fail [`Self::check_alignment`].
    pub fn pad_to_ingredients(&mut self) -> usize {
        let expected = self.ingredient_list.len();
        let mut added = 0;
        for values in self.aligned_fields_mut() {
            if values.len() < expected {
                added += expected - values.len();
                values.resize(expected, String::new());
            }
        }
        added
    }
}
