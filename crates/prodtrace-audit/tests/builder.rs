//! Audit record derivation at confirmation time.

mod common;

use proptest::prelude::*;

use prodtrace_audit::{AuditEntryBuilder, AuditError, ConfirmationContext, IngredientConfirmation};
use prodtrace_map::SupplierDirectory;
use prodtrace_model::{Recipe, audit_uid};

use common::{date, dept, directory, ingredient, planned_item, white_loaf};

fn context() -> ConfirmationContext {
    ConfirmationContext::new("Alex", "", date(2024, 3, 5))
}

#[test]
fn audit_record_shape() {
    let directory = directory();
    let mut item = planned_item("R100");
    item.ingredient_suppliers = vec![String::new(), String::new(), "Saltworks".to_string()];
    let ctx = context().with_ingredient_details(vec![
        IngredientConfirmation {
            batch_code: "B1".to_string(),
            sell_by_date: "2024-04-01".to_string(),
            receiving_date: "2024-03-01".to_string(),
            country_of_origin: "UK".to_string(),
        },
        IngredientConfirmation::default(),
        IngredientConfirmation::default(),
    ]);

    let record = AuditEntryBuilder::new(&directory)
        .build(&item, &white_loaf(), &ctx)
        .unwrap();

    insta::assert_snapshot!(serde_json::to_string_pretty(&record).unwrap(), @r#"
    {
      "uid": "32c78c066e8ce81ffb7f7834b9181797",
      "department": "BAKERY",
      "date": "2024-03-05",
      "department_manager": "Alex",
      "food_handler_responsible": "Sam",
      "planned_qty": 40.0,
      "recipe_code": "R100",
      "product_description": "White loaf",
      "originalScheduleId": "2024-03-05-R100-0",
      "product_name": [
        "Flour 1kg",
        "",
        ""
      ],
      "ingredient_list": [
        "Flour 1kg",
        "Cocoa",
        "Salt"
      ],
      "supplier_name": [
        "Acme",
        "",
        "Saltworks"
      ],
      "supplier_details": [
        "S1 | AC-77 | 10x1kg",
        "",
        ""
      ],
      "address_of_supplier": [
        "1 Mill Lane",
        "",
        ""
      ],
      "batch_code": [
        "B1",
        "",
        ""
      ],
      "sell_by_date": [
        "2024-04-01",
        "",
        ""
      ],
      "receiving_date": [
        "2024-03-01",
        "",
        ""
      ],
      "country_of_origin": [
        "UK",
        "",
        ""
      ]
    }
    "#);
}

#[test]
fn unknown_prod_code_is_written_as_the_unknown_marker() {
    let directory = directory();
    let item = planned_item("R100");

    let blank = AuditEntryBuilder::new(&directory)
        .build(&item, &white_loaf(), &context())
        .unwrap();
    assert_eq!(blank.supplier_name, vec!["Acme", "", ""]);

    let marked = AuditEntryBuilder::new(&directory)
        .with_unknown_marker("Unknown")
        .build(&item, &white_loaf(), &context())
        .unwrap();
    assert_eq!(marked.supplier_name, vec!["Acme", "Unknown", "Unknown"]);
}

#[test]
fn confirmed_supplier_wins_over_the_index() {
    let directory = directory();
    let mut item = planned_item("R100");
    item.ingredient_suppliers = vec!["Millers".to_string(), String::new(), String::new()];
    let record = AuditEntryBuilder::new(&directory)
        .build(&item, &white_loaf(), &context())
        .unwrap();
    assert_eq!(record.supplier_name[0], "Millers");
    // Millers is not a listed supplier for flour, so no details are invented.
    assert_eq!(record.supplier_details[0], "");
    assert_eq!(record.address_of_supplier[0], "");
}

#[test]
fn confirmed_supplier_picks_up_matching_details() {
    let directory = directory();
    let mut item = planned_item("R100");
    item.ingredient_suppliers = vec!["ACME".to_string(), String::new(), String::new()];
    let record = AuditEntryBuilder::new(&directory)
        .build(&item, &white_loaf(), &context())
        .unwrap();
    assert_eq!(record.supplier_name[0], "ACME");
    assert_eq!(record.address_of_supplier[0], "1 Mill Lane");
}

#[test]
fn handler_defaults_to_the_scheduled_handler() {
    let directory = directory();
    let item = planned_item("R100");
    let record = AuditEntryBuilder::new(&directory)
        .build(&item, &white_loaf(), &context())
        .unwrap();
    assert_eq!(record.food_handler_responsible, "Sam");

    let ctx = ConfirmationContext::new("Alex", "Jo", date(2024, 3, 6));
    let record = AuditEntryBuilder::new(&directory)
        .build(&item, &white_loaf(), &ctx)
        .unwrap();
    assert_eq!(record.food_handler_responsible, "Jo");
    assert_eq!(record.uid, audit_uid(&item.id, date(2024, 3, 6)));
    assert_eq!(record.date, date(2024, 3, 5));
}

#[test]
fn misaligned_supplier_selection_is_rejected() {
    let directory = directory();
    let mut item = planned_item("R100");
    item.ingredient_suppliers = vec!["Acme".to_string()];
    let err = AuditEntryBuilder::new(&directory)
        .build(&item, &white_loaf(), &context())
        .unwrap_err();
    assert_eq!(
        err,
        AuditError::Misaligned {
            field: "ingredient_suppliers",
            expected: 3,
            actual: 1,
        }
    );
}

#[test]
fn misaligned_ingredient_details_are_rejected() {
    let directory = directory();
    let ctx = context().with_ingredient_details(vec![IngredientConfirmation::default(); 4]);
    let err = AuditEntryBuilder::new(&directory)
        .build(&planned_item("R100"), &white_loaf(), &ctx)
        .unwrap_err();
    assert!(matches!(
        err,
        AuditError::Misaligned {
            field: "ingredient_details",
            expected: 3,
            actual: 4,
        }
    ));
}

#[test]
fn recipe_mismatch_is_rejected() {
    let directory = directory();
    let err = AuditEntryBuilder::new(&directory)
        .build(&planned_item("R200"), &white_loaf(), &context())
        .unwrap_err();
    assert!(matches!(err, AuditError::RecipeMismatch { .. }));
}

#[test]
fn malformed_schedule_id_is_rejected() {
    let directory = directory();
    let mut item = planned_item("R100");
    item.id = "R100".to_string();
    let err = AuditEntryBuilder::new(&directory)
        .build(&item, &white_loaf(), &context())
        .unwrap_err();
    assert!(matches!(err, AuditError::InvalidScheduleId(_)));
}

#[test]
fn ambiguous_resolution_is_not_guessed() {
    let directory = SupplierDirectory::new().with_index(common::index(
        "BAKERY",
        "supplier_code,supplier_name,product_description\n\
         S1,Acme,Oat Milk\n\
         S2,Dairyfree Ltd,oat  milk\n",
    ));
    let recipe = Recipe {
        code: "R300".to_string(),
        description: "Oat latte".to_string(),
        department: dept("BAKERY"),
        yield_qty: None,
        ingredients: vec![ingredient("OAT MILK", "", 0.3)],
        extra: Default::default(),
    };
    let record = AuditEntryBuilder::new(&directory)
        .build(&planned_item("R300"), &recipe, &context())
        .unwrap();
    assert_eq!(record.supplier_name, vec![""]);
}

fn recipe_with(descriptions: &[String]) -> Recipe {
    Recipe {
        code: "R100".to_string(),
        description: "Generated".to_string(),
        department: dept("BAKERY"),
        yield_qty: None,
        ingredients: descriptions
            .iter()
            .map(|description| ingredient(description, "", 1.0))
            .collect(),
        extra: Default::default(),
    }
}

proptest! {
    #[test]
    fn property_built_records_are_always_aligned(
        descriptions in proptest::collection::vec("[A-Za-z ]{0,12}", 0..12),
        with_suppliers in any::<bool>(),
        with_details in any::<bool>(),
    ) {
        let directory = directory();
        let recipe = recipe_with(&descriptions);
        let mut item = planned_item("R100");
        if with_suppliers {
            item.ingredient_suppliers = descriptions.iter().map(|d| d.trim().to_string()).collect();
        }
        let mut ctx = context();
        if with_details {
            ctx.ingredient_details = vec![IngredientConfirmation::default(); descriptions.len()];
        }

        let record = AuditEntryBuilder::new(&directory).build(&item, &recipe, &ctx).unwrap();
        prop_assert!(record.check_alignment().is_ok());
        for (_, values) in record.aligned_fields() {
            prop_assert_eq!(values.len(), descriptions.len());
        }
    }
}
