//! Ordered supplier matching for record repair.
//!
//! Backfilling old audit records uses a longer, looser chain than
//! interactive resolution: exact keys, the normalized scan, a substring
//! search over product descriptions and, last, an unscoped lookup across all
//! departments. The chain is data cleaning, not a correctness guarantee:
//! substring hits are reported as such so callers can count or review them.

use std::fmt;

use serde::{Deserialize, Serialize};

use prodtrace_model::{DepartmentCode, RecipeIngredient, SupplierRecord};

use crate::directory::{CrossDepartmentPolicy, SupplierDirectory};
use crate::index::{Resolution, shared_supplier};

/// Default minimum needle length for substring matching.
pub const DEFAULT_MIN_SUBSTRING_LEN: usize = 4;

/// Tuning for the matching chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Try a substring search over product descriptions.
    pub substring: bool,
    /// Shortest description accepted as a substring needle.
    pub min_substring_len: usize,
    /// Fall back to an unscoped lookup over every department.
    pub cross_department: bool,
    pub cross_department_policy: CrossDepartmentPolicy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            substring: true,
            min_substring_len: DEFAULT_MIN_SUBSTRING_LEN,
            cross_department: true,
            cross_department_policy: CrossDepartmentPolicy::default(),
        }
    }
}

impl MatchOptions {
    /// Exact and normalized department-scoped steps only.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            substring: false,
            cross_department: false,
            ..Self::default()
        }
    }

    /// The steps these options enable, in the order they are tried.
    pub fn steps(&self) -> Vec<MatchStep> {
        let mut steps = vec![
            MatchStep::ProdCode,
            MatchStep::Description,
            MatchStep::NormalizedScan,
        ];
        if self.substring {
            steps.push(MatchStep::Substring);
        }
        if self.cross_department {
            steps.push(MatchStep::CrossDepartment);
        }
        steps
    }
}

/// One step of the matching chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStep {
    ProdCode,
    Description,
    NormalizedScan,
    Substring,
    CrossDepartment,
}

impl MatchStep {
    /// Steps that can produce false positives.
    pub const fn is_fuzzy(&self) -> bool {
        matches!(self, Self::Substring)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::ProdCode => "prod_code",
            Self::Description => "description",
            Self::NormalizedScan => "normalized",
            Self::Substring => "substring",
            Self::CrossDepartment => "cross_department",
        }
    }
}

impl fmt::Display for MatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of running the chain for one ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
    /// A supplier was found by `step`.
    Matched {
        record: &'a SupplierRecord,
        step: MatchStep,
    },
    /// `step` found several suppliers that disagree; the chain stops here.
    Ambiguous {
        candidates: Vec<&'a SupplierRecord>,
        step: MatchStep,
    },
    /// No step found anything.
    Unmatched,
}

impl<'a> MatchOutcome<'a> {
    pub fn record(&self) -> Option<&'a SupplierRecord> {
        match *self {
            Self::Matched { record, .. } => Some(record),
            _ => None,
        }
    }
}

pub struct BackfillMatcher<'a> {
    directory: &'a SupplierDirectory,
    options: MatchOptions,
    steps: Vec<MatchStep>,
}

impl<'a> BackfillMatcher<'a> {
    pub fn new(directory: &'a SupplierDirectory, options: MatchOptions) -> Self {
        let steps = options.steps();
        Self {
            directory,
            options,
            steps,
        }
    }

    pub fn steps(&self) -> &[MatchStep] {
        &self.steps
    }

    /// Run the chain for one ingredient of a record owned by `department`.
    pub fn match_ingredient(
        &self,
        department: &DepartmentCode,
        ingredient: &RecipeIngredient,
    ) -> MatchOutcome<'a> {
        for &step in &self.steps {
            match self.run_step(step, department, ingredient) {
                Resolution::Unique(record) => return MatchOutcome::Matched { record, step },
                Resolution::Ambiguous(candidates) => {
                    return match shared_supplier(&candidates) {
                        Some(record) => MatchOutcome::Matched { record, step },
                        None => MatchOutcome::Ambiguous { candidates, step },
                    };
                }
                Resolution::None => {}
            }
        }
        MatchOutcome::Unmatched
    }

    fn run_step(
        &self,
        step: MatchStep,
        department: &DepartmentCode,
        ingredient: &RecipeIngredient,
    ) -> Resolution<'a> {
        let directory: &'a SupplierDirectory = self.directory;
        if step == MatchStep::CrossDepartment {
            return directory.resolve_any(ingredient, self.options.cross_department_policy);
        }
        let Some(index) = directory.get(department) else {
            return Resolution::None;
        };
        let exact = |key: &str| {
            let key = key.trim();
            if key.is_empty() {
                return Resolution::None;
            }
            index.get(key).map_or(Resolution::None, Resolution::Unique)
        };
        match step {
            MatchStep::ProdCode => exact(&ingredient.prod_code),
            MatchStep::Description => exact(&ingredient.description),
            MatchStep::NormalizedScan => {
                let mut candidates = index.scan(&ingredient.prod_code);
                for record in index.scan(&ingredient.description) {
                    crate::index::push_distinct(&mut candidates, record);
                }
                Resolution::from_candidates(candidates)
            }
            MatchStep::Substring => Resolution::from_candidates(
                index.substring(&ingredient.description, self.options.min_substring_len),
            ),
            MatchStep::CrossDepartment => Resolution::None,
        }
    }
}
