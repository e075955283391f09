//! Resolution behaviour of the department index, the directory and the
//! backfill matcher.

use prodtrace_ingest::load_supplier_csv_str;
use prodtrace_map::{
    BackfillMatcher, CrossDepartmentPolicy, MatchOptions, MatchOutcome, MatchStep, Resolution,
    SupplierDirectory, SupplierMappingIndex,
};
use prodtrace_model::{DepartmentCode, IngredientKey, RecipeIngredient};

const BAKERY_CSV: &str = "supplier_code,supplier_name,prod_code,product_description,supplier_address\n\
                          S1,Acme,P100,Flour 1kg,1 Mill Lane\n\
                          S4,Sugar Co,P400,Caster Sugar 2kg,\n\
                          S5,Oilworks,,Sunflower Oil 5L,\n";

const HMR_CSV: &str = "supplier_code,supplier_name,prod_code,product_description\n\
                       S2,Freshfoods,P200,Chicken Breast\n\
                       S3,Acme,P100,Flour 1kg\n\
                       S6,Millers,P600,Cocoa Powder\n";

const BUTCHERY_CSV: &str = "supplier_code,supplier_name,prod_code,product_description\n\
                            S7,Chocolatiers,P700,Cocoa Powder\n";

fn dept(code: &str) -> DepartmentCode {
    DepartmentCode::new(code).unwrap()
}

fn index(code: &str, csv: &str) -> SupplierMappingIndex {
    let department = dept(code);
    let load = load_supplier_csv_str(&department, csv);
    SupplierMappingIndex::build(&department, &load.rows)
}

fn directory() -> SupplierDirectory {
    SupplierDirectory::new()
        .with_index(index("BAKERY", BAKERY_CSV))
        .with_index(index("HMR", HMR_CSV))
        .with_index(index("BUTCHERY", BUTCHERY_CSV))
}

fn ingredient(prod: &str, desc: &str) -> RecipeIngredient {
    RecipeIngredient {
        description: desc.to_string(),
        prod_code: prod.to_string(),
        recipe_use: 1.0,
        unit: None,
    }
}

#[test]
fn prod_code_and_description_resolve_to_the_same_record() {
    let bakery = index("BAKERY", BAKERY_CSV);

    let by_code = bakery
        .resolve_key(&IngredientKey::ProdCode("P100".to_string()))
        .unique()
        .unwrap();
    assert_eq!(by_code.supplier_code, "S1");
    assert_eq!(by_code.supplier_name, "Acme");

    let by_description = bakery
        .resolve_key(&IngredientKey::Description("Flour 1kg".to_string()))
        .unique()
        .unwrap();
    assert_eq!(by_code, by_description);
}

#[test]
fn unknown_prod_code_resolves_to_none_in_every_department() {
    let directory = directory();
    let missing = ingredient("P999", "");
    for department in directory.departments() {
        assert!(directory.resolve(department, &missing).is_none());
    }
    assert!(
        directory
            .resolve_any(&missing, CrossDepartmentPolicy::Unanimous)
            .is_none()
    );
}

#[test]
fn resolution_is_department_scoped() {
    let directory = directory();
    let chicken = ingredient("P200", "Chicken Breast");
    assert!(directory.resolve(&dept("BAKERY"), &chicken).is_none());
    assert_eq!(
        directory
            .resolve(&dept("HMR"), &chicken)
            .unique()
            .unwrap()
            .supplier_name,
        "Freshfoods"
    );
    assert!(directory.resolve(&dept("DAIRY"), &chicken).is_none());
}

#[test]
fn normalized_description_matches_when_exact_fails() {
    let bakery = index("BAKERY", BAKERY_CSV);
    let resolved = bakery.resolve(&ingredient("", "  caster SUGAR 2KG "));
    assert_eq!(resolved.unique().unwrap().supplier_code, "S4");
}

#[test]
fn unanimous_policy_accepts_agreeing_departments() {
    let directory = directory();
    let flour = ingredient("P100", "");
    let resolved = directory.resolve_any(&flour, CrossDepartmentPolicy::Unanimous);
    assert_eq!(resolved.unique().unwrap().supplier_name, "Acme");
}

#[test]
fn unanimous_policy_reports_disagreement() {
    let directory = directory();
    let cocoa = ingredient("", "Cocoa Powder");
    let resolved = directory.resolve_any(&cocoa, CrossDepartmentPolicy::Unanimous);
    match resolved {
        Resolution::Ambiguous(candidates) => {
            let names: Vec<&str> = candidates
                .iter()
                .map(|r| r.supplier_name.as_str())
                .collect();
            assert_eq!(names, vec!["Millers", "Chocolatiers"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert_eq!(
        directory
            .resolve_any(&cocoa, CrossDepartmentPolicy::Unanimous)
            .supplier_name(),
        None
    );
}

#[test]
fn department_order_policy_takes_first_unique_match() {
    let directory = directory();
    let cocoa = ingredient("", "Cocoa Powder");
    let resolved = directory.resolve_any(&cocoa, CrossDepartmentPolicy::DepartmentOrder);
    let record = resolved.unique().unwrap();
    assert_eq!(record.supplier_name, "Millers");
    assert_eq!(record.department, dept("HMR"));
}

#[test]
fn matcher_reports_the_step_that_matched() {
    let directory = directory();
    let matcher = BackfillMatcher::new(&directory, MatchOptions::default());
    let bakery = dept("BAKERY");

    let cases = [
        (ingredient("P100", "whatever"), MatchStep::ProdCode, "S1"),
        (ingredient("", "Flour 1kg"), MatchStep::Description, "S1"),
        (ingredient("p400", ""), MatchStep::NormalizedScan, "S4"),
        (ingredient("", "sunflower oil"), MatchStep::Substring, "S5"),
        (ingredient("P200", ""), MatchStep::CrossDepartment, "S2"),
    ];
    for (ingredient, expected_step, expected_code) in cases {
        match matcher.match_ingredient(&bakery, &ingredient) {
            MatchOutcome::Matched { record, step } => {
                assert_eq!(step, expected_step, "{ingredient:?}");
                assert_eq!(record.supplier_code, expected_code);
            }
            other => panic!("{ingredient:?}: expected a match, got {other:?}"),
        }
    }
}

#[test]
fn substring_matches_are_flagged_fuzzy_and_can_be_wrong() {
    // "Sugar" is a substring of "Caster Sugar 2kg", even if the recipe meant
    // icing sugar; the match is returned but tagged as fuzzy.
    let directory = SupplierDirectory::new().with_index(index("BAKERY", BAKERY_CSV));
    let matcher = BackfillMatcher::new(&directory, MatchOptions::default());
    let outcome = matcher.match_ingredient(&dept("BAKERY"), &ingredient("", "Sugar"));
    match outcome {
        MatchOutcome::Matched { record, step } => {
            assert!(step.is_fuzzy());
            assert_eq!(record.supplier_code, "S4");
        }
        other => panic!("expected a fuzzy match, got {other:?}"),
    }
}

#[test]
fn strict_options_skip_fuzzy_and_cross_department_steps() {
    let directory = directory();
    let matcher = BackfillMatcher::new(&directory, MatchOptions::strict());
    let bakery = dept("BAKERY");
    assert_eq!(
        matcher.match_ingredient(&bakery, &ingredient("", "Sugar")),
        MatchOutcome::Unmatched
    );
    assert_eq!(
        matcher.match_ingredient(&bakery, &ingredient("P200", "")),
        MatchOutcome::Unmatched
    );
}

#[test]
fn ambiguity_stops_the_chain() {
    let directory = directory();
    let matcher = BackfillMatcher::new(&directory, MatchOptions::default());
    // Not in BAKERY; the cross-department step finds two disagreeing suppliers.
    let outcome = matcher.match_ingredient(&dept("BAKERY"), &ingredient("", "Cocoa Powder"));
    assert_eq!(outcome.record(), None);
    match outcome {
        MatchOutcome::Ambiguous { candidates, step } => {
            assert_eq!(step, MatchStep::CrossDepartment);
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn short_substring_needles_never_match() {
    let directory = SupplierDirectory::new().with_index(index("BAKERY", BAKERY_CSV));
    let matcher = BackfillMatcher::new(&directory, MatchOptions::default());
    assert_eq!(
        matcher.match_ingredient(&dept("BAKERY"), &ingredient("", "Oil")),
        MatchOutcome::Unmatched
    );
}
