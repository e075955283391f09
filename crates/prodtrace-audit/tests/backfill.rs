//! Backfill of unknown suppliers on stored audit records.

mod common;

use std::collections::HashMap;

use prodtrace_audit::{AuditBackfillJob, AuditError, RecipeLookup};
use prodtrace_map::{MatchOptions, SupplierDirectory};
use prodtrace_model::{AuditRecord, Recipe};

use common::{date, dept, directory, ingredient, white_loaf};

fn recipes() -> HashMap<String, Recipe> {
    let mut recipes = HashMap::new();
    let loaf = white_loaf();
    recipes.insert(loaf.code.clone(), loaf);
    let stew = Recipe {
        code: "HMR-STEW".to_string(),
        description: "Chicken stew".to_string(),
        department: dept("HMR"),
        yield_qty: None,
        ingredients: vec![
            ingredient("Chicken Breast", "P200", 0.4),
            ingredient("Flour 1kg", "P100", 0.05),
        ],
        extra: Default::default(),
    };
    recipes.insert(stew.code.clone(), stew);
    recipes
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// A record written before the supplier mapping knew anything.
fn stale_record(uid: &str, schedule_id: &str, department: &str, ingredients: &[&str]) -> AuditRecord {
    let blanks = vec![String::new(); ingredients.len()];
    AuditRecord {
        uid: uid.to_string(),
        department: dept(department),
        date: date(2024, 3, 5),
        department_manager: "Alex".to_string(),
        food_handler_responsible: "Sam".to_string(),
        planned_qty: 10.0,
        recipe_code: String::new(),
        product_description: String::new(),
        original_schedule_id: Some(schedule_id.to_string()),
        product_name: blanks.clone(),
        ingredient_list: strings(ingredients),
        supplier_name: blanks.clone(),
        supplier_details: blanks.clone(),
        address_of_supplier: blanks.clone(),
        batch_code: blanks.clone(),
        sell_by_date: blanks.clone(),
        receiving_date: blanks.clone(),
        country_of_origin: blanks,
        extra: Default::default(),
    }
}

#[test]
fn fills_unknown_suppliers_and_their_details() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    let mut records = vec![stale_record(
        "a1",
        "2024-03-05-R100-0",
        "BAKERY",
        &["Flour 1kg", "Cocoa", "Salt"],
    )];
    records[0].supplier_name[1] = "unknown".to_string();

    let report = job.run(&mut records);

    let record = &records[0];
    assert_eq!(record.supplier_name, strings(&["Acme", "unknown", ""]));
    assert_eq!(record.address_of_supplier[0], "1 Mill Lane");
    assert_eq!(record.supplier_details[0], "S1 | AC-77 | 10x1kg");
    assert_eq!(record.product_name[0], "Flour 1kg");
    assert_eq!(report.scanned, 1);
    assert_eq!(report.updated_records, 1);
    assert_eq!(report.filled_slots, 1);
    assert_eq!(report.unresolved_slots, 2);
    assert!(report.skipped.is_empty());
}

#[test]
fn confirmed_suppliers_are_never_overwritten() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    let mut records = vec![stale_record(
        "a1",
        "2024-03-05-R100-0",
        "BAKERY",
        &["Flour 1kg", "Cocoa", "Salt"],
    )];
    records[0].supplier_name[0] = "Millers".to_string();

    let report = job.run(&mut records);
    assert_eq!(records[0].supplier_name[0], "Millers");
    assert_eq!(records[0].address_of_supplier[0], "");
    assert_eq!(report.filled_slots, 0);
    assert!(!report.has_changes());
}

#[test]
fn second_run_changes_nothing() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    let mut short = stale_record("a2", "2024-03-05-HMR-STEW-1", "HMR", &["Chicken Breast", "Flour 1kg"]);
    short.batch_code.clear();
    short.country_of_origin.truncate(1);
    let mut records = vec![
        stale_record("a1", "2024-03-05-R100-0", "BAKERY", &["Flour 1kg", "Cocoa", "Salt"]),
        short,
        stale_record("a3", "garbage", "BAKERY", &["Flour 1kg"]),
    ];

    let first = job.run(&mut records);
    assert!(first.has_changes());
    assert_eq!(first.padded_slots, 3);
    let after_first = records.clone();

    let second = job.run(&mut records);
    assert_eq!(records, after_first);
    assert_eq!(second.updated_records, 0);
    assert_eq!(second.filled_slots, 0);
    assert_eq!(second.padded_slots, 0);
}

#[test]
fn dashed_recipe_codes_are_recovered_from_the_schedule_id() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    let mut records = vec![stale_record(
        "a2",
        "2024-03-05-HMR-STEW-1",
        "HMR",
        &["Chicken Breast", "Flour 1kg"],
    )];

    let report = job.run(&mut records);
    // Flour is not listed for HMR; it is found through the BAKERY export.
    assert_eq!(records[0].supplier_name, strings(&["Freshfoods", "Acme"]));
    assert_eq!(records[0].address_of_supplier[0], "9 Farm Road");
    assert_eq!(report.filled_slots, 2);
    assert_eq!(report.fuzzy_matches, 0);
}

#[test]
fn unparseable_schedule_ids_are_skipped_without_aborting() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    let mut records = vec![
        stale_record("bad", "R100", "BAKERY", &["Flour 1kg"]),
        stale_record("good", "2024-03-05-R100-0", "BAKERY", &["Flour 1kg"]),
    ];

    let report = job.run(&mut records);
    assert_eq!(report.scanned, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].uid, "bad");
    assert!(matches!(report.skipped[0].reason, AuditError::InvalidScheduleId(_)));
    assert_eq!(records[0].supplier_name, strings(&[""]));
    assert_eq!(records[1].supplier_name, strings(&["Acme"]));
}

#[test]
fn overlong_arrays_are_skipped_untouched() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    let mut record = stale_record("a1", "2024-03-05-R100-0", "BAKERY", &["Flour 1kg"]);
    record.batch_code = strings(&["B1", "B2"]);
    let mut records = vec![record.clone()];

    let report = job.run(&mut records);
    assert_eq!(records[0], record);
    assert_eq!(
        report.skipped[0].reason,
        AuditError::Misaligned {
            field: "batch_code",
            expected: 1,
            actual: 2,
        }
    );
}

#[test]
fn fuzzy_fills_are_counted() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    // "Caster Sugar" only matches "Caster Sugar 2kg" as a substring.
    let mut records = vec![stale_record("a1", "", "BAKERY", &["Caster Sugar"])];
    records[0].recipe_code = "R-GONE".to_string();

    let report = job.run(&mut records);
    assert_eq!(records[0].supplier_name, strings(&["Sugar Co"]));
    assert_eq!(report.fuzzy_matches, 1);

    let strict = AuditBackfillJob::new(&directory, &recipes, MatchOptions::strict());
    let mut records = vec![stale_record("a1", "", "BAKERY", &["Caster Sugar"])];
    let report = strict.run(&mut records);
    assert_eq!(records[0].supplier_name, strings(&[""]));
    assert_eq!(report.unresolved_slots, 1);
}

#[test]
fn custom_unknown_markers_are_case_insensitive() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default())
        .with_unknown_markers(["N/A"]);
    let mut records = vec![stale_record("a1", "2024-03-05-R100-0", "BAKERY", &["Flour 1kg", "Salt"])];
    records[0].supplier_name = strings(&["n/a", "Unknown"]);

    job.run(&mut records);
    // "Unknown" is no longer a marker, so it is treated as a confirmed name.
    assert_eq!(records[0].supplier_name, strings(&["Acme", "Unknown"]));
}

#[test]
fn supplier_rows_named_unknown_do_not_count_as_fills() {
    let directory = SupplierDirectory::new().with_index(common::index(
        "BAKERY",
        "supplier_code,supplier_name,prod_code,product_description,supplier_address\n\
         S9,Unknown,P100,Flour 1kg,Back Yard\n",
    ));
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    let mut records = vec![stale_record("a1", "2024-03-05-R100-0", "BAKERY", &["Flour 1kg"])];
    records[0].supplier_name = strings(&["Unknown"]);
    let before = records.clone();

    for _ in 0..2 {
        let report = job.run(&mut records);
        assert!(!report.has_changes());
        assert_eq!(report.filled_slots, 0);
        assert_eq!(report.unresolved_slots, 1);
        assert_eq!(records, before);
    }
}

#[test]
fn unreadable_records_are_reported_as_skipped() {
    let directory = directory();
    let recipes = recipes();
    let job = AuditBackfillJob::new(&directory, &recipes, MatchOptions::default());
    let mut records = vec![stale_record("good", "2024-03-05-R100-0", "BAKERY", &["Flour 1kg"])];

    let mut report = job.run(&mut records);
    report.skip_unreadable("bad", "invalid department code");
    assert_eq!(report.scanned, 2);
    assert_eq!(report.filled_slots, 1);
    assert_eq!(report.skipped[0].uid, "bad");
    assert_eq!(
        report.skipped[0].reason,
        AuditError::Unreadable("invalid department code".to_string())
    );
}

#[test]
fn recipe_lookup_works_over_plain_collections() {
    let list = vec![white_loaf()];
    assert!(list.recipe(" R100 ").is_some());
    assert!(recipes().recipe("HMR-STEW").is_some());
    assert!(list.recipe("R404").is_none());
}
