//! Audit record derivation and repair.
//!
//! - [`AuditEntryBuilder`] produces the compliance record when a production
//!   run is confirmed. It fails rather than emit a record whose positional
//!   arrays disagree with its ingredient list.
//! - [`AuditBackfillJob`] re-resolves unknown suppliers on stored records
//!   after the supplier mapping changes. It is idempotent.
//! - [`scaled_usage`] derives per-ingredient quantities for a planned run.

#![deny(unsafe_code)]

mod backfill;
mod builder;
mod error;
mod lookup;
mod usage;

pub use backfill::{AuditBackfillJob, BackfillReport, DEFAULT_UNKNOWN_MARKERS, SkippedRecord};
pub use builder::{AuditEntryBuilder, ConfirmationContext, IngredientConfirmation};
pub use error::{AuditError, Result};
pub use lookup::RecipeLookup;
pub use usage::{IngredientUsage, scaled_usage};
