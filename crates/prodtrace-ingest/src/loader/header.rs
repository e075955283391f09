//! Header normalization and column resolution for supplier exports.
//!
//! Department exports disagree on header names (`prod_code`, `ing.prod_code`,
//! `product_code`, ...) and on column order. Columns are resolved by alias in
//! priority order; when no header row is recognisable, fixed positions apply.

use prodtrace_model::SupplierRow;

/// Canonical supplier columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    SupplierCode,
    SupplierName,
    SupplierProductCode,
    ProdCode,
    Ean,
    ProductDescription,
    PackSize,
    SupplierAddress,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::SupplierCode,
        Column::SupplierName,
        Column::SupplierProductCode,
        Column::ProdCode,
        Column::Ean,
        Column::ProductDescription,
        Column::PackSize,
        Column::SupplierAddress,
    ];

    /// Accepted header spellings, highest priority first.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::SupplierCode => &["supplier_code", "supplier code", "suppliercode"],
            Self::SupplierName => &["supplier_name", "supplier name", "supplier"],
            Self::SupplierProductCode => &["supplier_product_code", "supplier product code"],
            Self::ProdCode => &["ing.prod_code", "prod_code", "product_code"],
            Self::Ean => &["ean", "barcode"],
            Self::ProductDescription => {
                &["product_description", "description", "ing.description"]
            }
            Self::PackSize => &["pack_size", "pack size"],
            Self::SupplierAddress => &["supplier_address", "address"],
        }
    }
}

/// Column positions resolved for one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub supplier_code: Option<usize>,
    pub supplier_name: Option<usize>,
    pub supplier_product_code: Option<usize>,
    pub prod_code: Option<usize>,
    pub ean: Option<usize>,
    pub product_description: Option<usize>,
    pub pack_size: Option<usize>,
    pub supplier_address: Option<usize>,
}

const POSITIONAL_SUPPLIER_CODE: usize = 0;
const POSITIONAL_SUPPLIER_NAME: usize = 1;
const POSITIONAL_PROD_CODE: usize = 3;

impl ColumnMap {
    /// Resolve columns from a header row.
    ///
    /// Returns `None` when no cell matches any known alias, which means the
    /// row is data rather than a header.
    pub fn from_headers(headers: &[String]) -> Option<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut map = Self::default();
        let mut matched = false;
        for column in Column::ALL {
            let position = column
                .aliases()
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias));
            if position.is_some() {
                matched = true;
            }
            *map.slot_mut(column) = position;
        }
        matched.then_some(map)
    }

    /// Fixed layout for exports without a header row.
    ///
    /// Supplier code is column 0, supplier name column 1, product code
    /// column 3 and the description the last-but-one column. A description
    /// position that collides with one of the fixed columns is dropped.
    pub fn positional(width: usize) -> Self {
        let description = width
            .checked_sub(2)
            .filter(|idx| {
                ![
                    POSITIONAL_SUPPLIER_CODE,
                    POSITIONAL_SUPPLIER_NAME,
                    POSITIONAL_PROD_CODE,
                ]
                .contains(idx)
            });
        Self {
            supplier_code: Some(POSITIONAL_SUPPLIER_CODE),
            supplier_name: Some(POSITIONAL_SUPPLIER_NAME),
            prod_code: (width > POSITIONAL_PROD_CODE).then_some(POSITIONAL_PROD_CODE),
            product_description: description,
            ..Self::default()
        }
    }

    pub fn get(&self, column: Column) -> Option<usize> {
        match column {
            Column::SupplierCode => self.supplier_code,
            Column::SupplierName => self.supplier_name,
            Column::SupplierProductCode => self.supplier_product_code,
            Column::ProdCode => self.prod_code,
            Column::Ean => self.ean,
            Column::ProductDescription => self.product_description,
            Column::PackSize => self.pack_size,
            Column::SupplierAddress => self.supplier_address,
        }
    }

    fn slot_mut(&mut self, column: Column) -> &mut Option<usize> {
        match column {
            Column::SupplierCode => &mut self.supplier_code,
            Column::SupplierName => &mut self.supplier_name,
            Column::SupplierProductCode => &mut self.supplier_product_code,
            Column::ProdCode => &mut self.prod_code,
            Column::Ean => &mut self.ean,
            Column::ProductDescription => &mut self.product_description,
            Column::PackSize => &mut self.pack_size,
            Column::SupplierAddress => &mut self.supplier_address,
        }
    }

    /// Build a canonical row from one record's cells.
    pub fn extract(&self, record: &[String]) -> SupplierRow {
        let cell = |column: Column| {
            self.get(column)
                .and_then(|idx| record.get(idx))
                .map(|value| normalize_cell(value))
                .unwrap_or_default()
        };
        SupplierRow {
            supplier_code: cell(Column::SupplierCode),
            supplier_name: cell(Column::SupplierName),
            supplier_product_code: cell(Column::SupplierProductCode),
            prod_code: cell(Column::ProdCode),
            ean: cell(Column::Ean),
            product_description: cell(Column::ProductDescription),
            pack_size: cell(Column::PackSize),
            supplier_address: cell(Column::SupplierAddress),
        }
    }
}

/// Lower-cases a header and collapses internal whitespace.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trims a cell value, including a stray byte-order mark.
pub fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff} Supplier   Name "), "supplier name");
        assert_eq!(normalize_header("ING.PROD_CODE"), "ing.prod_code");
    }

    #[test]
    fn test_prod_code_alias_priority() {
        let map = ColumnMap::from_headers(&strings(&[
            "product_code",
            "prod_code",
            "ing.prod_code",
            "supplier_code",
        ]))
        .unwrap();
        assert_eq!(map.prod_code, Some(2));
        assert_eq!(map.supplier_code, Some(3));

        let map = ColumnMap::from_headers(&strings(&["product_code", "prod_code"])).unwrap();
        assert_eq!(map.prod_code, Some(1));
    }

    #[test]
    fn test_unrecognised_row_is_not_a_header() {
        assert!(ColumnMap::from_headers(&strings(&["S1", "Acme", "x", "P100"])).is_none());
    }

    #[test]
    fn test_positional_layout() {
        let map = ColumnMap::positional(7);
        assert_eq!(map.supplier_code, Some(0));
        assert_eq!(map.supplier_name, Some(1));
        assert_eq!(map.prod_code, Some(3));
        assert_eq!(map.product_description, Some(5));

        let narrow = ColumnMap::positional(5);
        assert_eq!(narrow.prod_code, Some(3));
        assert_eq!(narrow.product_description, None);

        let tiny = ColumnMap::positional(2);
        assert_eq!(tiny.prod_code, None);
        assert_eq!(tiny.product_description, None);
    }

    #[test]
    fn test_extract_trims_and_fills_missing() {
        let map = ColumnMap::from_headers(&strings(&["supplier_code", "supplier_name", "ean"]))
            .unwrap();
        let row = map.extract(&strings(&[" S1 ", "Acme "]));
        assert_eq!(row.supplier_code, "S1");
        assert_eq!(row.supplier_name, "Acme");
        assert_eq!(row.ean, "");
        assert_eq!(row.prod_code, "");
    }
}
