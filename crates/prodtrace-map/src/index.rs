//! Per-department supplier mapping index.
//!
//! The index maps lookup keys (product codes and product descriptions share
//! one key space) to the supplier record that listed them. A CSV row with both
//! a product code and a description yields two entries pointing at the same
//! record. When two rows share a key the later row wins; the overwrite is
//! counted in [`BuildStats`] but not deduplicated away.
//!
//! Resolution follows a fixed order:
//!
//! 1. exact match on the ingredient's product code
//! 2. exact match on the ingredient's description
//! 3. case/whitespace-insensitive scan; one distinct record is a unique
//!    match, several are returned as [`Resolution::Ambiguous`]
//! 4. [`Resolution::None`]; callers record the supplier as unknown

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use prodtrace_model::{DepartmentCode, IngredientKey, RecipeIngredient, SupplierRecord, SupplierRow};

use crate::utils::normalize_key;

/// Outcome of a supplier lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Exactly one supplier record applies.
    Unique(&'a SupplierRecord),
    /// Several records apply; the caller must choose.
    Ambiguous(Vec<&'a SupplierRecord>),
    /// Supplier unknown.
    None,
}

impl<'a> Resolution<'a> {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn unique(&self) -> Option<&'a SupplierRecord> {
        match *self {
            Self::Unique(record) => Some(record),
            _ => None,
        }
    }

    /// All records this resolution covers, in lookup order.
    pub fn candidates(&self) -> Vec<&'a SupplierRecord> {
        match self {
            Self::Unique(record) => vec![*record],
            Self::Ambiguous(records) => records.clone(),
            Self::None => Vec::new(),
        }
    }

    /// The supplier name, when it is not in doubt.
    ///
    /// An ambiguous set whose candidates all name the same supplier still
    /// has a definite supplier name (e.g. two pack sizes from one supplier).
    pub fn supplier_name(&self) -> Option<&'a str> {
        match self {
            Self::Unique(record) => Some(record.supplier_name.as_str()),
            Self::Ambiguous(records) => shared_supplier(records).map(|r| r.supplier_name.as_str()),
            Self::None => None,
        }
    }

    /// Collapse a candidate list into a resolution.
    pub(crate) fn from_candidates(candidates: Vec<&'a SupplierRecord>) -> Self {
        match candidates.len() {
            0 => Self::None,
            1 => Self::Unique(candidates[0]),
            _ => Self::Ambiguous(candidates),
        }
    }
}

/// First record, when every record names the same supplier.
pub(crate) fn shared_supplier<'a>(records: &[&'a SupplierRecord]) -> Option<&'a SupplierRecord> {
    let first = records.first()?;
    records
        .iter()
        .all(|r| r.supplier_name.eq_ignore_ascii_case(&first.supplier_name))
        .then_some(*first)
}

/// Push `record` unless an equivalent supplier product is already present.
pub(crate) fn push_distinct<'a>(out: &mut Vec<&'a SupplierRecord>, record: &'a SupplierRecord) {
    if !out.iter().any(|existing| existing.same_source(record)) {
        out.push(record);
    }
}

/// Counters collected while building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Rows turned into records.
    pub rows: usize,
    /// Distinct keys in the index.
    pub entries: usize,
    /// Key insertions that replaced an earlier record (last write wins).
    pub overwritten: usize,
}

#[derive(Debug, Clone)]
pub struct SupplierMappingIndex {
    department: DepartmentCode,
    records: Vec<SupplierRecord>,
    entries: BTreeMap<String, usize>,
    normalized: HashMap<String, Vec<usize>>,
    stats: BuildStats,
}

impl SupplierMappingIndex {
    /// Build a fresh index for one department from loaded rows.
    pub fn build<'r, I>(department: &DepartmentCode, rows: I) -> Self
    where
        I: IntoIterator<Item = &'r SupplierRow>,
    {
        let mut index = Self {
            department: department.clone(),
            records: Vec::new(),
            entries: BTreeMap::new(),
            normalized: HashMap::new(),
            stats: BuildStats::default(),
        };
        for row in rows {
            index.insert(SupplierRecord::from_row(row, department));
        }
        index.stats.entries = index.entries.len();
        debug!(
            department = %index.department,
            rows = index.stats.rows,
            entries = index.stats.entries,
            overwritten = index.stats.overwritten,
            "supplier index built"
        );
        index
    }

    fn insert(&mut self, record: SupplierRecord) {
        let position = self.records.len();
        let keys: Vec<String> = [&record.prod_code, &record.product_description]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        for key in keys {
            if let Some(previous) = self.entries.insert(key.clone(), position)
                && previous != position
            {
                self.stats.overwritten += 1;
                debug!(
                    department = %self.department,
                    key = %key,
                    replaced = %self.records[previous].supplier_code,
                    by = %record.supplier_code,
                    "duplicate supplier key; last row wins"
                );
            }
            let bucket = self.normalized.entry(normalize_key(&key)).or_default();
            if !bucket.contains(&position) {
                bucket.push(position);
            }
        }
        self.records.push(record);
        self.stats.rows += 1;
    }

    pub fn department(&self) -> &DepartmentCode {
        &self.department
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every record, in load order (including records whose keys were overwritten).
    pub fn records(&self) -> &[SupplierRecord] {
        &self.records
    }

    /// The plain key-to-record view, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &SupplierRecord)> {
        self.entries
            .iter()
            .map(|(key, &idx)| (key.as_str(), &self.records[idx]))
    }

    /// Exact lookup of a trimmed key.
    pub fn get(&self, key: &str) -> Option<&SupplierRecord> {
        self.entries.get(key.trim()).map(|&idx| &self.records[idx])
    }

    /// Records whose product code or description equals `key` after normalization.
    pub fn scan(&self, key: &str) -> Vec<&SupplierRecord> {
        let mut out = Vec::new();
        self.scan_into(key, &mut out);
        out
    }

    fn scan_into<'a>(&'a self, key: &str, out: &mut Vec<&'a SupplierRecord>) {
        let normalized = normalize_key(key);
        if normalized.is_empty() {
            return;
        }
        if let Some(bucket) = self.normalized.get(&normalized) {
            for &idx in bucket {
                push_distinct(out, &self.records[idx]);
            }
        }
    }

    /// Case-insensitive substring search over product descriptions.
    ///
    /// Needles shorter than `min_len` characters never match; short needles
    /// such as "oil" would otherwise hit unrelated products.
    pub fn substring(&self, needle: &str, min_len: usize) -> Vec<&SupplierRecord> {
        let needle = normalize_key(needle);
        if needle.is_empty() || needle.chars().count() < min_len {
            return Vec::new();
        }
        let mut out = Vec::new();
        for record in &self.records {
            let matches = record
                .product_description
                .as_deref()
                .is_some_and(|desc| normalize_key(desc).contains(&needle));
            if matches {
                push_distinct(&mut out, record);
            }
        }
        out
    }

    /// Resolve one key: exact entry first, then the normalized scan.
    pub fn resolve_key(&self, key: &IngredientKey) -> Resolution<'_> {
        if let Some(record) = self.get(key.as_str()) {
            return Resolution::Unique(record);
        }
        Resolution::from_candidates(self.scan(key.as_str()))
    }

    /// Resolve an ingredient with the ordered fallback described at module level.
    pub fn resolve(&self, ingredient: &RecipeIngredient) -> Resolution<'_> {
        let keys = ingredient.keys();
        for key in &keys {
            if let Some(record) = self.get(key.as_str()) {
                return Resolution::Unique(record);
            }
        }
        let mut candidates = Vec::new();
        for key in &keys {
            self.scan_into(key.as_str(), &mut candidates);
        }
        Resolution::from_candidates(candidates)
    }

    /// Dropdown candidates for the supplier selection UI.
    ///
    /// Exact hits first, then normalized hits, without duplicates.
    pub fn candidates(&self, ingredient: &RecipeIngredient) -> Vec<&SupplierRecord> {
        let keys = ingredient.keys();
        let mut out = Vec::new();
        for key in &keys {
            if let Some(record) = self.get(key.as_str()) {
                push_distinct(&mut out, record);
            }
        }
        for key in &keys {
            self.scan_into(key.as_str(), &mut out);
        }
        out
    }
}
