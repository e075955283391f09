//! Command workflows shared by the binary and its tests.
//!
//! Each function takes the loaded [`AppConfig`] explicitly. Anything that
//! writes the record store opens it with the store lock held for the whole
//! read-modify-write cycle.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::{info, info_span};

use prodtrace_audit::{
    AuditBackfillJob, AuditEntryBuilder, AuditError, BackfillReport, ConfirmationContext,
    IngredientConfirmation, IngredientUsage, scaled_usage,
};
use prodtrace_ingest::{SupplierLoad, load_supplier_csv};
use prodtrace_map::{
    BuildStats, MappingExport, MappingExportWriter, SupplierDirectory, SupplierMappingIndex,
};
use prodtrace_model::{
    AuditRecord, DepartmentCode, Recipe, ScheduleStatus, ScheduledProductionItem,
};
use prodtrace_store::RecordStore;

use crate::config::{AppConfig, DepartmentConfig};

/// What was loaded for one configured department.
#[derive(Debug, Clone)]
pub struct DepartmentLoad {
    pub department: DepartmentCode,
    pub name: String,
    pub csv: PathBuf,
    pub csv_found: bool,
    /// Rows dropped by the loader as malformed.
    pub skipped: usize,
    pub stats: BuildStats,
}

/// The supplier directory plus per-department load details.
#[derive(Debug, Clone, Default)]
pub struct LoadedDirectory {
    pub directory: SupplierDirectory,
    pub loads: Vec<DepartmentLoad>,
}

/// Load every configured department export and build its index.
///
/// Unreadable exports load as empty (the loader logs why), so this never fails.
pub fn load_directory(config: &AppConfig) -> LoadedDirectory {
    let span = info_span!("load_suppliers", departments = config.departments.len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut loaded = LoadedDirectory::default();
    for department in &config.departments {
        let (load, index) = load_index(department);
        loaded.loads.push(DepartmentLoad {
            department: department.code.clone(),
            name: department.display_name().to_string(),
            csv: department.csv.clone(),
            csv_found: load.source.is_some(),
            skipped: load.skipped,
            stats: index.stats(),
        });
        loaded.directory.insert(index);
    }

    info!(
        departments = loaded.loads.len(),
        duration_ms = start.elapsed().as_millis(),
        "supplier indexes built"
    );
    loaded
}

/// Load and index a single configured department.
pub fn load_department(
    config: &AppConfig,
    code: &DepartmentCode,
) -> Result<(SupplierLoad, SupplierMappingIndex)> {
    let department = config
        .department(code)
        .with_context(|| format!("department {code} is not configured"))?;
    Ok(load_index(department))
}

fn load_index(department: &DepartmentConfig) -> (SupplierLoad, SupplierMappingIndex) {
    let load = load_supplier_csv(&department.code, &department.csv);
    let index = SupplierMappingIndex::build(&department.code, &load.rows);
    (load, index)
}

/// Write `{DEPARTMENT}_supplier_mapping.json` files, for one department or all.
pub fn export_mappings(
    directory: &SupplierDirectory,
    output_dir: &Path,
    only: Option<&DepartmentCode>,
) -> Result<Vec<(DepartmentCode, PathBuf, usize)>> {
    let writer = MappingExportWriter::new(output_dir)
        .with_context(|| format!("failed to prepare {}", output_dir.display()))?;
    if let Some(code) = only
        && directory.get(code).is_none()
    {
        bail!("department {code} is not configured");
    }

    let mut written = Vec::new();
    for index in directory.indexes() {
        if only.is_some_and(|code| code != index.department()) {
            continue;
        }
        let export = MappingExport::from_index(index);
        let path = writer
            .write(&export)
            .with_context(|| format!("failed to export {}", index.department()))?;
        written.push((index.department().clone(), path, export.len()));
    }
    Ok(written)
}

/// A schedule with its recipe and scaled quantities.
#[derive(Debug, Clone)]
pub struct ScheduleUsage {
    pub item: ScheduledProductionItem,
    pub recipe: Recipe,
    pub usage: Vec<IngredientUsage>,
}

pub fn schedule_usage(config: &AppConfig, schedule_id: &str) -> Result<ScheduleUsage> {
    let store = open_store(config)?;
    let (item, recipe) = schedule_and_recipe(&store, schedule_id)?;
    let usage = scaled_usage(&recipe, item.planned_qty);
    Ok(ScheduleUsage {
        item,
        recipe,
        usage,
    })
}

/// Inputs for confirming a scheduled run.
#[derive(Debug, Clone)]
pub struct ConfirmRequest {
    pub schedule_id: String,
    pub manager: String,
    /// Defaults to the scheduled handler.
    pub handler: Option<String>,
    pub confirmed_on: NaiveDate,
    /// One entry per recipe ingredient, or empty when none were entered.
    pub ingredient_details: Vec<IngredientConfirmation>,
    pub dry_run: bool,
}

/// Read per-ingredient confirmation details from a JSON array.
pub fn read_ingredient_details(path: &Path) -> Result<Vec<IngredientConfirmation>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read ingredient details {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid ingredient details {}", path.display()))
}

#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub record: AuditRecord,
    /// The schedule moved from `Planned` to `Scheduled`.
    pub status_changed: bool,
    pub saved: bool,
}

/// Build the audit record for a schedule and append it to the store.
pub fn confirm_schedule(
    config: &AppConfig,
    directory: &SupplierDirectory,
    request: &ConfirmRequest,
) -> Result<ConfirmOutcome> {
    let mut store = open_store_locked(config)?;
    let (mut item, recipe) = schedule_and_recipe(&store, &request.schedule_id)?;
    if item.status.is_terminal() {
        bail!("schedule {} is {} and cannot be confirmed", item.id, item.status);
    }

    let ctx = ConfirmationContext::new(
        request.manager.as_str(),
        request.handler.clone().unwrap_or_default(),
        request.confirmed_on,
    )
    .with_ingredient_details(request.ingredient_details.clone());
    let record = AuditEntryBuilder::new(directory)
        .with_unknown_marker(config.audit.unknown_supplier.as_str())
        .build(&item, &recipe, &ctx)
        .with_context(|| format!("failed to build audit record for {}", item.id))?;

    let status_changed = item.status == ScheduleStatus::Planned;
    if status_changed {
        item.transition(ScheduleStatus::Scheduled)?;
    }
    store.append_audit(record.clone())?;
    store.upsert_schedule(item);

    let saved = !request.dry_run;
    if saved {
        store.save()?;
    }
    info!(
        audit_uid = %record.uid,
        schedule = %request.schedule_id,
        dry_run = request.dry_run,
        "schedule confirmed"
    );
    Ok(ConfirmOutcome {
        record,
        status_changed,
        saved,
    })
}

#[derive(Debug, Clone)]
pub struct BackfillOutcome {
    pub report: BackfillReport,
    pub saved: bool,
}

/// Re-resolve unknown suppliers on every stored audit record.
///
/// Records the store could not parse are listed as skipped and written back
/// unchanged.
pub fn backfill_store(
    config: &AppConfig,
    directory: &SupplierDirectory,
    dry_run: bool,
) -> Result<BackfillOutcome> {
    let mut store = open_store_locked(config)?;
    let mut report = {
        let (audits, recipes) = store.audits_with_recipes();
        AuditBackfillJob::new(directory, recipes, config.matching.options.clone())
            .with_unknown_markers(config.matching.unknown_markers.iter().cloned())
            .run(audits)
    };
    for entry in store.unreadable_audits() {
        report.skip_unreadable(entry.label(), entry.error.as_str());
    }

    let saved = report.has_changes() && !dry_run;
    if saved {
        store.save()?;
    }
    Ok(BackfillOutcome { report, saved })
}

/// Delete every audit record tied to a schedule. Returns the count deleted.
pub fn purge_audits(config: &AppConfig, schedule_id: &str, dry_run: bool) -> Result<usize> {
    let mut store = open_store_locked(config)?;
    let deleted = store.delete_audits_for_schedule(schedule_id);
    if deleted > 0 && !dry_run {
        store.save()?;
    }
    info!(schedule = schedule_id, deleted, dry_run, "audit records purged");
    Ok(deleted)
}

fn open_store(config: &AppConfig) -> Result<RecordStore> {
    RecordStore::open(&config.store)
        .with_context(|| format!("failed to open record store {}", config.store.display()))
}

fn open_store_locked(config: &AppConfig) -> Result<RecordStore> {
    RecordStore::open_locked(&config.store)
        .with_context(|| format!("failed to open record store {}", config.store.display()))
}

fn schedule_and_recipe(
    store: &RecordStore,
    schedule_id: &str,
) -> Result<(ScheduledProductionItem, Recipe)> {
    let item = store
        .schedule(schedule_id)
        .cloned()
        .with_context(|| format!("schedule {} not found", schedule_id.trim()))?;
    let recipe = store
        .recipe(&item.recipe_code)
        .cloned()
        .ok_or_else(|| AuditError::UnknownRecipe(item.recipe_code.clone()))?;
    Ok((item, recipe))
}
