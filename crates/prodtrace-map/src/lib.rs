//! Ingredient-to-supplier mapping.
//!
//! A [`SupplierMappingIndex`] is built per department from loaded supplier
//! rows; the [`SupplierDirectory`] holds one index per department and is
//! shared read-only by the audit builder and the backfill job.
//!
//! - [`SupplierMappingIndex::resolve`]: exact product code, exact
//!   description, then a normalized scan that can report ambiguity
//! - [`SupplierDirectory::resolve_any`]: unscoped lookup with an explicit
//!   [`CrossDepartmentPolicy`]
//! - [`BackfillMatcher`]: the longer repair chain, including substring
//!   matching, with each hit tagged by the [`MatchStep`] that produced it
//! - [`MappingExportWriter`]: `{DEPARTMENT}_supplier_mapping.json` exports

#![deny(unsafe_code)]

mod directory;
mod error;
mod export;
mod index;
mod matcher;
mod utils;

pub use directory::{CrossDepartmentPolicy, SupplierDirectory};
pub use error::{MapError, Result};
pub use export::{MappingExport, MappingExportWriter, export_filename};
pub use index::{BuildStats, Resolution, SupplierMappingIndex};
pub use matcher::{
    BackfillMatcher, DEFAULT_MIN_SUBSTRING_LEN, MatchOptions, MatchOutcome, MatchStep,
};
pub use utils::normalize_key;
