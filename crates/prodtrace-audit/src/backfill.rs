//! Retroactive supplier repair for persisted audit records.
//!
//! The job walks every record, recovers its department and recipe from the
//! record's own fields and runs the [`BackfillMatcher`] chain for each
//! ingredient slot whose supplier is blank or an unknown marker. Slots that
//! already carry a supplier are left as they are, which makes the job safe to
//! rerun: a second pass over its own output changes nothing.
//!
//! Per-record failures (an unparseable `originalScheduleId`, arrays longer
//! than the ingredient list) skip that record and are listed in the
//! [`BackfillReport`]; they never abort the batch. Records the store could
//! not parse at all are added with [`BackfillReport::skip_unreadable`].

use std::time::Instant;

use tracing::{debug, info, info_span, trace, warn};

use prodtrace_map::{BackfillMatcher, MatchOptions, MatchOutcome, SupplierDirectory};
use prodtrace_model::{AuditRecord, Recipe, RecipeIngredient, ScheduleId};

use crate::error::{AuditError, Result};
use crate::lookup::RecipeLookup;

/// Supplier values treated as "not known" by default.
pub const DEFAULT_UNKNOWN_MARKERS: &[&str] = &["", "Unknown"];

/// A record the job could not process.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub uid: String,
    pub reason: AuditError,
}

/// What a backfill run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackfillReport {
    pub scanned: usize,
    pub updated_records: usize,
    /// Supplier name slots filled in.
    pub filled_slots: usize,
    /// Slots still without a supplier after the run.
    pub unresolved_slots: usize,
    /// Filled slots whose match came from a fuzzy step.
    pub fuzzy_matches: usize,
    /// Blank entries added to short positional arrays.
    pub padded_slots: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl BackfillReport {
    pub fn has_changes(&self) -> bool {
        self.updated_records > 0
    }

    /// Count a record that never reached the job because it could not be parsed.
    pub fn skip_unreadable(&mut self, uid: impl Into<String>, error: impl Into<String>) {
        self.scanned += 1;
        self.skipped.push(SkippedRecord {
            uid: uid.into(),
            reason: AuditError::Unreadable(error.into()),
        });
    }
}

pub struct AuditBackfillJob<'a> {
    matcher: BackfillMatcher<'a>,
    recipes: &'a dyn RecipeLookup,
    unknown_markers: Vec<String>,
}

impl<'a> AuditBackfillJob<'a> {
    pub fn new(
        directory: &'a SupplierDirectory,
        recipes: &'a dyn RecipeLookup,
        options: MatchOptions,
    ) -> Self {
        Self {
            matcher: BackfillMatcher::new(directory, options),
            recipes,
            unknown_markers: DEFAULT_UNKNOWN_MARKERS
                .iter()
                .map(|marker| (*marker).to_string())
                .collect(),
        }
    }

    /// Replace the supplier values treated as unknown (compared case-insensitively).
    /// The blank value is always treated as unknown.
    #[must_use]
    pub fn with_unknown_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unknown_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    fn is_unknown(&self, value: &str) -> bool {
        let value = value.trim();
        value.is_empty()
            || self
                .unknown_markers
                .iter()
                .any(|marker| marker.trim().eq_ignore_ascii_case(value))
    }

    pub fn run(&self, records: &mut [AuditRecord]) -> BackfillReport {
        let span = info_span!("backfill", records = records.len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut report = BackfillReport::default();
        for record in records.iter_mut() {
            report.scanned += 1;
            match self.repair(record, &mut report) {
                Ok(true) => report.updated_records += 1,
                Ok(false) => {}
                Err(reason) => {
                    warn!(audit_uid = %record.uid, error = %reason, "skipping audit record");
                    report.skipped.push(SkippedRecord {
                        uid: record.uid.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            scanned = report.scanned,
            updated = report.updated_records,
            filled = report.filled_slots,
            unresolved = report.unresolved_slots,
            fuzzy = report.fuzzy_matches,
            skipped = report.skipped.len(),
            duration_ms = start.elapsed().as_millis(),
            "backfill complete"
        );
        report
    }

    /// Repair one record in place. Returns whether anything changed.
    fn repair(&self, record: &mut AuditRecord, report: &mut BackfillReport) -> Result<bool> {
        let recipe = self.recipe_for(record)?;

        // Validate before touching the record so a skipped record stays as it was.
        let expected = record.ingredient_list.len();
        if let Some((field, values)) = record
            .aligned_fields()
            .into_iter()
            .find(|(_, values)| values.len() > expected)
        {
            return Err(AuditError::Misaligned {
                field,
                expected,
                actual: values.len(),
            });
        }

        let padded = record.pad_to_ingredients();
        report.padded_slots += padded;
        let mut changed = padded > 0;

        for i in 0..record.ingredient_list.len() {
            let ingredient = ingredient_for_slot(recipe, &record.ingredient_list[i], i);
            changed |= self.repair_slot(record, i, &ingredient, report);
        }
        record.check_alignment()?;
        Ok(changed)
    }

    /// The record's recipe. Records whose recipe is no longer known are
    /// still repaired from their ingredient descriptions.
    fn recipe_for(&self, record: &AuditRecord) -> Result<Option<&'a Recipe>> {
        let code = match record.original_schedule_id.as_deref() {
            Some(id) if !id.trim().is_empty() => ScheduleId::parse(id)?.recipe_code,
            _ => record.recipe_code.trim().to_string(),
        };
        let recipes: &'a dyn RecipeLookup = self.recipes;
        let recipe = recipes.recipe(&code);
        if recipe.is_none() {
            debug!(
                audit_uid = %record.uid,
                recipe = %code,
                "recipe not found; matching by description"
            );
        }
        Ok(recipe)
    }

    fn repair_slot(
        &self,
        record: &mut AuditRecord,
        i: usize,
        ingredient: &RecipeIngredient,
        report: &mut BackfillReport,
    ) -> bool {
        let supplier_known = !self.is_unknown(&record.supplier_name[i]);
        let details_complete = !self.is_unknown(&record.address_of_supplier[i])
            && !self.is_unknown(&record.supplier_details[i])
            && !self.is_unknown(&record.product_name[i]);
        if supplier_known && details_complete {
            return false;
        }

        let outcome = self.matcher.match_ingredient(&record.department, ingredient);
        trace!(
            audit_uid = %record.uid,
            slot = i,
            ingredient = %ingredient.description,
            supplier = ?outcome.record().map(|source| source.supplier_name.as_str()),
            "slot matched"
        );
        let (source, step) = match outcome {
            // A supplier row named with an unknown marker resolves nothing.
            MatchOutcome::Matched { record: source, step }
                if !self.is_unknown(&source.supplier_name) =>
            {
                (source, step)
            }
            outcome => {
                if !supplier_known {
                    report.unresolved_slots += 1;
                    debug!(
                        audit_uid = %record.uid,
                        ingredient = %ingredient.description,
                        ambiguous = matches!(outcome, MatchOutcome::Ambiguous { .. }),
                        "supplier still unknown"
                    );
                }
                return false;
            }
        };

        if supplier_known {
            // Only complete details for the supplier that is already recorded.
            if !source
                .supplier_name
                .eq_ignore_ascii_case(record.supplier_name[i].trim())
            {
                return false;
            }
        } else {
            record.supplier_name[i] = source.supplier_name.clone();
            report.filled_slots += 1;
            if step.is_fuzzy() {
                report.fuzzy_matches += 1;
            }
            debug!(
                audit_uid = %record.uid,
                ingredient = %ingredient.description,
                supplier = %source.supplier_name,
                step = %step,
                "supplier filled"
            );
        }

        let mut changed = !supplier_known;
        changed |= self.fill_blank(
            &mut record.address_of_supplier[i],
            source.supplier_address.as_deref(),
        );
        changed |= self.fill_blank(&mut record.supplier_details[i], Some(&source.details()));
        changed |= self.fill_blank(
            &mut record.product_name[i],
            source.product_description.as_deref(),
        );
        changed
    }

    fn fill_blank(&self, slot: &mut String, value: Option<&str>) -> bool {
        match value.map(str::trim) {
            Some(value) if !value.is_empty() && self.is_unknown(slot) && *slot != value => {
                *slot = value.to_string();
                true
            }
            _ => false,
        }
    }
}

/// The recipe ingredient behind audit slot `i`.
///
/// Prefers the ingredient at the same position when its description agrees,
/// then any ingredient with that description; otherwise the slot's own
/// description is used on its own.
fn ingredient_for_slot(recipe: Option<&Recipe>, description: &str, i: usize) -> RecipeIngredient {
    let wanted = description.trim();
    let ingredients = recipe.map_or(&[][..], |recipe| recipe.ingredients.as_slice());
    let same = |candidate: &&RecipeIngredient| {
        candidate.description.trim().eq_ignore_ascii_case(wanted)
    };
    ingredients
        .get(i)
        .filter(same)
        .or_else(|| ingredients.iter().find(same))
        .cloned()
        .unwrap_or_else(|| RecipeIngredient {
            description: wanted.to_string(),
            prod_code: String::new(),
            recipe_use: 0.0,
            unit: None,
        })
}
