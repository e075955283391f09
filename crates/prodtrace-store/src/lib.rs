//! Flat JSON record store.
//!
//! The store is a single JSON document with `recipes`,
//! `productionSchedules` and `audits` collections. It is read whole, edited
//! in memory and written back atomically (temp file, `sync_all`, rename).
//! There is no row-level isolation: writers take the whole-file
//! [`StoreLock`] for the duration of their read-modify-write cycle.
//!
//! # Example
//!
//! ```ignore
//! use prodtrace_store::RecordStore;
//!
//! let mut store = RecordStore::open_locked("data/db.json")?;
//! let deleted = store.delete_audits_for_schedule("2024-03-05-R100-0");
//! store.save()?;
//! ```

#![deny(unsafe_code)]

mod error;
mod io;
mod lock;
mod store;

pub use error::{Result, StoreError};
pub use io::UnreadableAudit;
pub use lock::StoreLock;
pub use store::RecordStore;
