use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Local;
use tracing::{debug, info_span};

use prodtrace_cli::config::{AppConfig, config_path};
use prodtrace_cli::workflow::{
    ConfirmRequest, backfill_store, confirm_schedule, export_mappings, load_department,
    load_directory, purge_audits, read_ingredient_details, schedule_usage,
};
use prodtrace_model::{DepartmentCode, RecipeIngredient};

use crate::cli::{ConfirmArgs, ExportArgs, ResolveArgs};
use crate::summary::{
    print_audit_record, print_backfill_report, print_departments, print_exports,
    print_resolution, print_suppliers, print_usage,
};

pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = config_path(explicit);
    AppConfig::load(&path)
}

pub fn run_departments(config: &AppConfig) -> Result<()> {
    let loaded = load_directory(config);
    if loaded.loads.is_empty() {
        println!("No departments configured");
        return Ok(());
    }
    print_departments(&loaded.loads);
    Ok(())
}

pub fn run_suppliers(config: &AppConfig, department: &DepartmentCode) -> Result<()> {
    let span = info_span!("suppliers", department = %department);
    let _guard = span.enter();
    let (load, index) = load_department(config, department)?;
    if load.source.is_none() {
        eprintln!("warning: supplier export for {department} could not be read");
    }
    print_suppliers(index.records());
    Ok(())
}

pub fn run_resolve(config: &AppConfig, args: &ResolveArgs) -> Result<()> {
    let prod_code = args.prod_code.clone().unwrap_or_default();
    let description = args.description.clone().unwrap_or_default();
    if prod_code.trim().is_empty() && description.trim().is_empty() {
        bail!("give --prod-code or --description");
    }
    let ingredient = RecipeIngredient {
        description,
        prod_code,
        recipe_use: 0.0,
        unit: None,
    };

    let loaded = load_directory(config);
    if loaded.directory.get(&args.department).is_none() {
        bail!("department {} is not configured", args.department);
    }
    let mut resolution = loaded.directory.resolve(&args.department, &ingredient);
    if resolution.is_none() && args.any_department {
        debug!(
            policy = %config.matching.options.cross_department_policy,
            "falling back to every department"
        );
        resolution = loaded
            .directory
            .resolve_any(&ingredient, config.matching.options.cross_department_policy);
    }
    print_resolution(&resolution);
    Ok(())
}

pub fn run_export_mapping(config: &AppConfig, args: &ExportArgs) -> Result<()> {
    let loaded = load_directory(config);
    let written = export_mappings(
        &loaded.directory,
        &args.output_dir,
        args.department.as_ref(),
    )?;
    print_exports(&written);
    Ok(())
}

pub fn run_usage(config: &AppConfig, schedule_id: &str) -> Result<()> {
    let usage = schedule_usage(config, schedule_id)?;
    print_usage(&usage);
    Ok(())
}

pub fn run_confirm(config: &AppConfig, args: &ConfirmArgs) -> Result<()> {
    let span = info_span!("confirm", schedule = %args.schedule_id);
    let _guard = span.enter();
    let ingredient_details = match &args.details {
        Some(path) => read_ingredient_details(path)?,
        None => Vec::new(),
    };
    let loaded = load_directory(config);
    let request = ConfirmRequest {
        schedule_id: args.schedule_id.clone(),
        manager: args.manager.clone(),
        handler: args.handler.clone(),
        confirmed_on: args.date.unwrap_or_else(|| Local::now().date_naive()),
        ingredient_details,
        dry_run: args.dry_run,
    };
    let outcome = confirm_schedule(config, &loaded.directory, &request)
        .with_context(|| format!("confirm {}", args.schedule_id))?;
    print_audit_record(&outcome.record);
    if outcome.status_changed {
        println!("Schedule status: Scheduled");
    }
    if !outcome.saved {
        println!("Dry run: record store not modified");
    }
    Ok(())
}

pub fn run_backfill(config: &AppConfig, dry_run: bool) -> Result<()> {
    let loaded = load_directory(config);
    let outcome = backfill_store(config, &loaded.directory, dry_run)?;
    print_backfill_report(&outcome.report);
    if dry_run && outcome.report.has_changes() {
        println!("Dry run: record store not modified");
    }
    Ok(())
}

pub fn run_purge_audits(config: &AppConfig, schedule_id: &str, dry_run: bool) -> Result<()> {
    let deleted = purge_audits(config, schedule_id, dry_run)?;
    if dry_run {
        println!("Would delete {deleted} audit records for {schedule_id}");
    } else {
        println!("Deleted {deleted} audit records for {schedule_id}");
    }
    Ok(())
}
