use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use prodtrace_audit::BackfillReport;
use prodtrace_cli::workflow::{DepartmentLoad, ScheduleUsage};
use prodtrace_map::Resolution;
use prodtrace_model::{AuditRecord, DepartmentCode, SupplierRecord};

pub fn print_departments(loads: &[DepartmentLoad]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Department"),
        header_cell("Name"),
        header_cell("Supplier CSV"),
        header_cell("Rows"),
        header_cell("Skipped"),
        header_cell("Keys"),
        header_cell("Overwritten"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 3..=6 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for load in loads {
        let csv = if load.csv_found {
            Cell::new(load.csv.display())
        } else {
            Cell::new(format!("{} (missing)", load.csv.display())).fg(Color::Yellow)
        };
        table.add_row(vec![
            department_cell(&load.department),
            Cell::new(&load.name),
            csv,
            Cell::new(load.stats.rows),
            count_cell(load.skipped, Color::Yellow),
            Cell::new(load.stats.entries),
            count_cell(load.stats.overwritten, Color::Yellow),
        ]);
    }
    println!("{table}");
}

pub fn print_suppliers(records: &[SupplierRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Supplier"),
        header_cell("Prod code"),
        header_cell("Description"),
        header_cell("Pack"),
        header_cell("Address"),
    ]);
    apply_table_style(&mut table);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.supplier_code),
            Cell::new(&record.supplier_name).add_attribute(Attribute::Bold),
            optional_cell(record.prod_code.as_deref()),
            optional_cell(record.product_description.as_deref()),
            optional_cell(record.pack_size.as_deref()),
            optional_cell(record.supplier_address.as_deref()),
        ]);
    }
    println!("{table}");
    println!("{} supplier records", records.len());
}

pub fn print_resolution(resolution: &Resolution<'_>) {
    match resolution {
        Resolution::Unique(record) => {
            println!("Supplier: {}", record.supplier_name);
            print_suppliers(&[(*record).clone()]);
        }
        Resolution::Ambiguous(candidates) => {
            println!("Ambiguous: {} candidate suppliers", candidates.len());
            let records: Vec<SupplierRecord> =
                candidates.iter().map(|record| (*record).clone()).collect();
            print_suppliers(&records);
        }
        Resolution::None => println!("No supplier found"),
    }
}

pub fn print_exports(written: &[(DepartmentCode, PathBuf, usize)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Department"),
        header_cell("Entries"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (department, path, entries) in written {
        table.add_row(vec![
            department_cell(department),
            Cell::new(entries),
            Cell::new(path.display()),
        ]);
    }
    println!("{table}");
}

pub fn print_usage(usage: &ScheduleUsage) {
    println!(
        "{} {} on {} ({}), planned {}",
        usage.recipe.code,
        usage.recipe.description,
        usage.item.date,
        usage.item.status,
        usage.item.planned_qty
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Ingredient"),
        header_cell("Prod code"),
        header_cell("Per unit"),
        header_cell("Total"),
        header_cell("Unit"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for (position, ingredient) in usage.usage.iter().enumerate() {
        table.add_row(vec![
            dim_cell(position + 1),
            Cell::new(&ingredient.description),
            optional_cell(Some(ingredient.prod_code.as_str())),
            Cell::new(format!("{:.3}", ingredient.recipe_use)),
            Cell::new(format!("{:.3}", ingredient.scaled_qty)).add_attribute(Attribute::Bold),
            optional_cell(ingredient.unit.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_audit_record(record: &AuditRecord) {
    println!("Audit: {}", record.uid);
    println!(
        "Schedule: {}",
        record.original_schedule_id.as_deref().unwrap_or("-")
    );
    println!(
        "Recipe: {} {} ({}), planned {}",
        record.recipe_code, record.product_description, record.department, record.planned_qty
    );
    println!(
        "Manager: {}  Handler: {}",
        record.department_manager, record.food_handler_responsible
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Ingredient"),
        header_cell("Supplier"),
        header_cell("Address"),
        header_cell("Batch"),
        header_cell("Sell by"),
        header_cell("Origin"),
    ]);
    apply_table_style(&mut table);
    for (position, ingredient) in record.ingredient_list.iter().enumerate() {
        let slot = |values: &[String]| optional_cell(values.get(position).map(String::as_str));
        table.add_row(vec![
            Cell::new(ingredient),
            supplier_cell(record.supplier_name.get(position).map(String::as_str)),
            slot(&record.address_of_supplier),
            slot(&record.batch_code),
            slot(&record.sell_by_date),
            slot(&record.country_of_origin),
        ]);
    }
    println!("{table}");
}

pub fn print_backfill_report(report: &BackfillReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Backfill"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Records scanned"), Cell::new(report.scanned)]);
    table.add_row(vec![
        Cell::new("Records updated"),
        Cell::new(report.updated_records).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Suppliers filled"),
        count_cell(report.filled_slots, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Filled by substring match"),
        count_cell(report.fuzzy_matches, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Still unknown"),
        count_cell(report.unresolved_slots, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Slots padded"),
        count_cell(report.padded_slots, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Records skipped"),
        count_cell(report.skipped.len(), Color::Red),
    ]);
    println!("{table}");
    if !report.skipped.is_empty() {
        eprintln!("Skipped:");
        for skipped in &report.skipped {
            eprintln!("- {}: {}", skipped.uid, skipped.reason);
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn department_cell(code: &DepartmentCode) -> Cell {
    Cell::new(code)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn supplier_cell(name: Option<&str>) -> Cell {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Cell::new(name),
        _ => Cell::new("unknown").fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(0)
    } else {
        Cell::new(count).fg(color)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
