//! Audit record derivation at schedule confirmation.
//!
//! The builder turns a confirmed production run into the denormalized audit
//! document. Every positional array is emitted in recipe order, one entry per
//! ingredient. Supplier names come from the user's per-ingredient selection
//! when present; otherwise the department-scoped index is consulted, and
//! anything other than a definite supplier is written as the unknown marker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use prodtrace_map::SupplierDirectory;
use prodtrace_model::{
    AuditRecord, DepartmentCode, Recipe, RecipeIngredient, ScheduleId, ScheduledProductionItem,
    SupplierRecord, audit_uid,
};

use crate::error::{AuditError, Result};

/// Per-ingredient traceability details captured at confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientConfirmation {
    #[serde(default)]
    pub batch_code: String,
    #[serde(default)]
    pub sell_by_date: String,
    #[serde(default)]
    pub receiving_date: String,
    #[serde(default)]
    pub country_of_origin: String,
}

/// Who confirmed the run, when, and the ingredient details they entered.
///
/// `ingredient_details` is positionally aligned with the recipe's
/// ingredients; an empty list means no details were entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationContext {
    pub department_manager: String,
    /// Falls back to the run's handler when blank.
    pub food_handler: String,
    pub confirmed_on: NaiveDate,
    pub ingredient_details: Vec<IngredientConfirmation>,
}

impl ConfirmationContext {
    pub fn new(
        department_manager: impl Into<String>,
        food_handler: impl Into<String>,
        confirmed_on: NaiveDate,
    ) -> Self {
        Self {
            department_manager: department_manager.into(),
            food_handler: food_handler.into(),
            confirmed_on,
            ingredient_details: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ingredient_details(mut self, details: Vec<IngredientConfirmation>) -> Self {
        self.ingredient_details = details;
        self
    }
}

pub struct AuditEntryBuilder<'a> {
    directory: &'a SupplierDirectory,
    unknown_supplier: String,
}

impl<'a> AuditEntryBuilder<'a> {
    pub fn new(directory: &'a SupplierDirectory) -> Self {
        Self {
            directory,
            unknown_supplier: String::new(),
        }
    }

    /// Marker written when no definite supplier exists (default: empty).
    #[must_use]
    pub fn with_unknown_marker(mut self, marker: impl Into<String>) -> Self {
        self.unknown_supplier = marker.into();
        self
    }

    pub fn build(
        &self,
        item: &ScheduledProductionItem,
        recipe: &Recipe,
        ctx: &ConfirmationContext,
    ) -> Result<AuditRecord> {
        ScheduleId::parse(&item.id)?;
        if item.recipe_code.trim() != recipe.code.trim() {
            return Err(AuditError::RecipeMismatch {
                schedule: item.id.clone(),
                expected: recipe.code.clone(),
                actual: item.recipe_code.clone(),
            });
        }
        let expected = recipe.ingredients.len();
        check_positional("ingredient_suppliers", expected, item.ingredient_suppliers.len())?;
        check_positional("ingredient_details", expected, ctx.ingredient_details.len())?;

        let food_handler = if ctx.food_handler.trim().is_empty() {
            item.handler_name.clone()
        } else {
            ctx.food_handler.clone()
        };

        let mut record = AuditRecord {
            uid: audit_uid(&item.id, ctx.confirmed_on),
            department: item.department.clone(),
            date: item.date,
            department_manager: ctx.department_manager.clone(),
            food_handler_responsible: food_handler,
            planned_qty: item.planned_qty,
            recipe_code: recipe.code.clone(),
            product_description: recipe.description.clone(),
            original_schedule_id: Some(item.id.clone()),
            product_name: Vec::with_capacity(expected),
            ingredient_list: Vec::with_capacity(expected),
            supplier_name: Vec::with_capacity(expected),
            supplier_details: Vec::with_capacity(expected),
            address_of_supplier: Vec::with_capacity(expected),
            batch_code: Vec::with_capacity(expected),
            sell_by_date: Vec::with_capacity(expected),
            receiving_date: Vec::with_capacity(expected),
            country_of_origin: Vec::with_capacity(expected),
            extra: Default::default(),
        };

        for (i, ingredient) in recipe.ingredients.iter().enumerate() {
            let (name, source) = self.supplier_for(&item.department, ingredient, item, i);
            record.ingredient_list.push(ingredient.description.clone());
            record.supplier_name.push(name);
            record.product_name.push(
                source
                    .and_then(|s| s.product_description.clone())
                    .unwrap_or_default(),
            );
            record
                .supplier_details
                .push(source.map(SupplierRecord::details).unwrap_or_default());
            record.address_of_supplier.push(
                source
                    .and_then(|s| s.supplier_address.clone())
                    .unwrap_or_default(),
            );

            let details = ctx.ingredient_details.get(i).cloned().unwrap_or_default();
            record.batch_code.push(details.batch_code);
            record.sell_by_date.push(details.sell_by_date);
            record.receiving_date.push(details.receiving_date);
            record.country_of_origin.push(details.country_of_origin);
        }

        record.check_alignment()?;
        debug!(
            audit_uid = %record.uid,
            schedule = %item.id,
            ingredients = expected,
            "audit record built"
        );
        Ok(record)
    }

    /// Supplier name for ingredient `i`, with the record it came from when known.
    fn supplier_for(
        &self,
        department: &DepartmentCode,
        ingredient: &RecipeIngredient,
        item: &ScheduledProductionItem,
        i: usize,
    ) -> (String, Option<&'a SupplierRecord>) {
        let directory: &'a SupplierDirectory = self.directory;
        if let Some(confirmed) = item.confirmed_supplier(i) {
            let source = directory.get(department).and_then(|index| {
                index
                    .candidates(ingredient)
                    .into_iter()
                    .find(|record| record.supplier_name.eq_ignore_ascii_case(confirmed))
            });
            return (confirmed.to_string(), source);
        }
        let resolution = directory.resolve(department, ingredient);
        match resolution.supplier_name() {
            Some(name) => {
                trace!(
                    department = %department,
                    ingredient = %ingredient.description,
                    supplier = name,
                    "supplier resolved"
                );
                (name.to_string(), resolution.candidates().first().copied())
            }
            None => {
                debug!(
                    department = %department,
                    ingredient = %ingredient.description,
                    candidates = resolution.candidates().len(),
                    "supplier not determined"
                );
                (self.unknown_supplier.clone(), None)
            }
        }
    }
}

fn check_positional(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual != 0 && actual != expected {
        return Err(AuditError::Misaligned {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
