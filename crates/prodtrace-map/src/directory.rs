//! The set of per-department indexes.
//!
//! Each department's index is built once and is read-only afterwards, so a
//! shared `&SupplierDirectory` can serve concurrent lookups without locking.
//! Lookups are department-scoped unless the caller explicitly asks for the
//! unscoped fallback, which applies a [`CrossDepartmentPolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use prodtrace_model::{DepartmentCode, RecipeIngredient};

use crate::index::{Resolution, SupplierMappingIndex, push_distinct, shared_supplier};

/// How an unscoped lookup settles matches found in several departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossDepartmentPolicy {
    /// Accept only when every matching department names the same supplier;
    /// disagreement is returned as [`Resolution::Ambiguous`].
    #[default]
    Unanimous,
    /// The first department, in directory order, with a unique match wins.
    DepartmentOrder,
}

impl fmt::Display for CrossDepartmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unanimous => "unanimous",
            Self::DepartmentOrder => "department_order",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SupplierDirectory {
    indexes: Vec<SupplierMappingIndex>,
}

impl SupplierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a department index. Replaces an existing index for the same
    /// department in place, keeping its position in the lookup order.
    pub fn insert(&mut self, index: SupplierMappingIndex) {
        match self
            .indexes
            .iter_mut()
            .find(|existing| existing.department() == index.department())
        {
            Some(slot) => *slot = index,
            None => self.indexes.push(index),
        }
    }

    #[must_use]
    pub fn with_index(mut self, index: SupplierMappingIndex) -> Self {
        self.insert(index);
        self
    }

    pub fn get(&self, department: &DepartmentCode) -> Option<&SupplierMappingIndex> {
        self.indexes.iter().find(|i| i.department() == department)
    }

    pub fn indexes(&self) -> &[SupplierMappingIndex] {
        &self.indexes
    }

    pub fn departments(&self) -> impl Iterator<Item = &DepartmentCode> {
        self.indexes.iter().map(SupplierMappingIndex::department)
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Department-scoped resolution. Unknown departments resolve to `None`.
    pub fn resolve(
        &self,
        department: &DepartmentCode,
        ingredient: &RecipeIngredient,
    ) -> Resolution<'_> {
        match self.get(department) {
            Some(index) => index.resolve(ingredient),
            None => {
                debug!(department = %department, "no supplier index for department");
                Resolution::None
            }
        }
    }

    /// Unscoped resolution across every department.
    pub fn resolve_any(
        &self,
        ingredient: &RecipeIngredient,
        policy: CrossDepartmentPolicy,
    ) -> Resolution<'_> {
        let per_department: Vec<Resolution<'_>> = self
            .indexes
            .iter()
            .map(|index| index.resolve(ingredient))
            .filter(|resolution| !resolution.is_none())
            .collect();

        if policy == CrossDepartmentPolicy::DepartmentOrder
            && let Some(record) = per_department.iter().find_map(Resolution::unique)
        {
            return Resolution::Unique(record);
        }

        let mut candidates = Vec::new();
        for resolution in &per_department {
            for record in resolution.candidates() {
                push_distinct(&mut candidates, record);
            }
        }
        if candidates.len() > 1
            && let Some(first) = shared_supplier(&candidates)
        {
            return Resolution::Unique(first);
        }
        Resolution::from_candidates(candidates)
    }
}
