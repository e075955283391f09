#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};

use prodtrace_ingest::load_supplier_csv_str;
use prodtrace_map::{SupplierDirectory, SupplierMappingIndex};
use prodtrace_model::{DepartmentCode, Recipe, RecipeIngredient, ScheduledProductionItem};

pub const BAKERY_CSV: &str = "supplier_code,supplier_name,supplier_product_code,prod_code,ean,product_description,pack_size,supplier_address\n\
                              S1,Acme,AC-77,P100,,Flour 1kg,10x1kg,1 Mill Lane\n\
                              S4,Sugar Co,,P400,,Caster Sugar 2kg,,\n";

pub const HMR_CSV: &str = "supplier_code,supplier_name,prod_code,product_description,supplier_address\n\
                           S2,Freshfoods,P200,Chicken Breast,9 Farm Road\n";

pub fn dept(code: &str) -> DepartmentCode {
    DepartmentCode::new(code).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn index(code: &str, csv: &str) -> SupplierMappingIndex {
    let department = dept(code);
    let load = load_supplier_csv_str(&department, csv);
    SupplierMappingIndex::build(&department, &load.rows)
}

pub fn directory() -> SupplierDirectory {
    SupplierDirectory::new()
        .with_index(index("BAKERY", BAKERY_CSV))
        .with_index(index("HMR", HMR_CSV))
}

pub fn ingredient(description: &str, prod_code: &str, recipe_use: f64) -> RecipeIngredient {
    RecipeIngredient {
        description: description.to_string(),
        prod_code: prod_code.to_string(),
        recipe_use,
        unit: Some("kg".to_string()),
    }
}

/// White loaf: one resolvable ingredient, one unknown, one without a code.
pub fn white_loaf() -> Recipe {
    Recipe {
        code: "R100".to_string(),
        description: "White loaf".to_string(),
        department: dept("BAKERY"),
        yield_qty: Some(1.0),
        ingredients: vec![
            ingredient("Flour 1kg", "P100", 0.5),
            ingredient("Cocoa", "P999", 0.02),
            ingredient("Salt", "", 0.01),
        ],
        extra: Default::default(),
    }
}

pub fn planned_item(recipe_code: &str) -> ScheduledProductionItem {
    ScheduledProductionItem::new(
        date(2024, 3, 5),
        recipe_code,
        0,
        dept("BAKERY"),
        40.0,
        NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        "Sam",
    )
    .unwrap()
}
