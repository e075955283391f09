//! Data model for production scheduling and compliance audit trails.
//!
//! The types here are shared by the supplier loader, the mapping index, the
//! audit builder and the record store. They carry no I/O.

pub mod audit;
pub mod error;
pub mod ids;
pub mod recipe;
pub mod schedule;
pub mod supplier;

pub use audit::{AuditRecord, Misalignment};
pub use error::{ModelError, Result};
pub use ids::{DepartmentCode, ScheduleId, audit_uid};
pub use recipe::{IngredientKey, Recipe, RecipeIngredient};
pub use schedule::{ScheduleStatus, ScheduledProductionItem};
pub use supplier::{SupplierRecord, SupplierRow};
