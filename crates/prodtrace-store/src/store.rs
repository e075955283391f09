//! The record store: recipes, production schedules and audit records.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use prodtrace_audit::RecipeLookup;
use prodtrace_model::{AuditRecord, Recipe, ScheduledProductionItem};

use crate::error::{Result, StoreError};
use crate::io::{
    StoreDocument, UnreadableAudit, merge_audits, read_document, split_audits, write_document,
};
use crate::lock::StoreLock;

/// In-memory view of the JSON store file.
///
/// Changes are kept in memory until [`RecordStore::save`]. Writers should
/// open the store with [`RecordStore::open_locked`] so the read-modify-write
/// cycle cannot interleave with another writer.
///
/// Audit records that fail to parse do not stop the store from opening.
/// They are listed by [`RecordStore::unreadable_audits`] and written back
/// untouched on save.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    /// Recipes, schedules and unknown collections. `document.audits` is
    /// always empty; audits live in the two fields below.
    document: StoreDocument,
    audits: Vec<AuditRecord>,
    unreadable: Vec<UnreadableAudit>,
    lock: Option<StoreLock>,
}

impl RecordStore {
    /// Open the store for reading. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut document = read_document(&path)?;
        let (audits, unreadable) = split_audits(std::mem::take(&mut document.audits));
        for entry in &unreadable {
            warn!(
                path = %path.display(),
                audit = %entry.label(),
                error = %entry.error,
                "unreadable audit record kept as is"
            );
        }
        debug!(
            path = %path.display(),
            recipes = document.recipes.len(),
            schedules = document.schedules.len(),
            audits = audits.len(),
            unreadable = unreadable.len(),
            "record store opened"
        );
        Ok(Self {
            path,
            document,
            audits,
            unreadable,
            lock: None,
        })
    }

    /// Take the store lock, then open. The lock is held until the store is dropped.
    pub fn open_locked(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lock = StoreLock::acquire(&path)?;
        let mut store = Self::open(path)?;
        store.lock = Some(lock);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Atomically write the store back to disk.
    pub fn save(&self) -> Result<()> {
        let mut document = self.document.clone();
        document.audits = merge_audits(&self.path, &self.audits, &self.unreadable)?;
        write_document(&self.path, &document)?;
        info!(
            path = %self.path.display(),
            audits = document.audits.len(),
            "record store saved"
        );
        Ok(())
    }

    // === Recipes ===

    pub fn recipes(&self) -> &[Recipe] {
        &self.document.recipes
    }

    pub fn recipe(&self, code: &str) -> Option<&Recipe> {
        self.document.recipes.recipe(code)
    }

    pub fn upsert_recipe(&mut self, recipe: Recipe) {
        match self
            .document
            .recipes
            .iter_mut()
            .find(|existing| existing.code == recipe.code)
        {
            Some(slot) => *slot = recipe,
            None => self.document.recipes.push(recipe),
        }
    }

    // === Schedules ===

    pub fn schedules(&self) -> &[ScheduledProductionItem] {
        &self.document.schedules
    }

    pub fn schedule(&self, id: &str) -> Option<&ScheduledProductionItem> {
        let id = id.trim();
        self.document.schedules.iter().find(|item| item.id == id)
    }

    /// Insert a schedule, or replace the one with the same id.
    pub fn upsert_schedule(&mut self, item: ScheduledProductionItem) {
        match self
            .document
            .schedules
            .iter_mut()
            .find(|existing| existing.id == item.id)
        {
            Some(slot) => *slot = item,
            None => self.document.schedules.push(item),
        }
    }

    /// Remove a schedule together with every audit record tied to it.
    ///
    /// Returns the removed schedule, if it existed, and the number of audit
    /// records deleted.
    pub fn remove_schedule(&mut self, id: &str) -> (Option<ScheduledProductionItem>, usize) {
        let id = id.trim();
        let position = self.document.schedules.iter().position(|item| item.id == id);
        let removed = position.map(|position| self.document.schedules.remove(position));
        let audits = self.delete_audits_for_schedule(id);
        (removed, audits)
    }

    // === Audits ===

    pub fn audits(&self) -> &[AuditRecord] {
        &self.audits
    }

    pub fn audit(&self, uid: &str) -> Option<&AuditRecord> {
        self.audits.iter().find(|record| record.uid == uid)
    }

    /// Stored audit records that could not be parsed.
    pub fn unreadable_audits(&self) -> &[UnreadableAudit] {
        &self.unreadable
    }

    /// Mutable access for in-place repair. Callers must keep records aligned.
    pub fn audits_mut(&mut self) -> &mut [AuditRecord] {
        &mut self.audits
    }

    /// Audits for in-place repair alongside the recipes needed to repair them.
    pub fn audits_with_recipes(&mut self) -> (&mut [AuditRecord], &Vec<Recipe>) {
        (&mut self.audits, &self.document.recipes)
    }

    /// Append a new audit record.
    ///
    /// Misaligned records and duplicate uids are refused; nothing is stored.
    pub fn append_audit(&mut self, record: AuditRecord) -> Result<()> {
        check_alignment(&record)?;
        let taken_by_unreadable = self
            .unreadable
            .iter()
            .any(|entry| entry.uid.as_deref() == Some(record.uid.as_str()));
        if taken_by_unreadable || self.audit(&record.uid).is_some() {
            return Err(StoreError::DuplicateAudit { uid: record.uid });
        }
        debug!(audit_uid = %record.uid, "audit record appended");
        self.audits.push(record);
        Ok(())
    }

    /// Replace the stored audit record with the same uid.
    pub fn update_audit(&mut self, record: AuditRecord) -> Result<()> {
        check_alignment(&record)?;
        let slot = self
            .audits
            .iter_mut()
            .find(|existing| existing.uid == record.uid)
            .ok_or_else(|| StoreError::UnknownAudit {
                uid: record.uid.clone(),
            })?;
        *slot = record;
        Ok(())
    }

    /// Delete every audit record matching `predicate`. Returns the count deleted.
    pub fn delete_audits_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&AuditRecord) -> bool,
    {
        let before = self.audits.len();
        self.audits.retain(|record| !predicate(record));
        let deleted = before - self.audits.len();
        if deleted > 0 {
            debug!(deleted, "audit records deleted");
        }
        deleted
    }

    /// Delete every audit tied to `schedule_id`, unreadable ones included.
    pub fn delete_audits_for_schedule(&mut self, schedule_id: &str) -> usize {
        let schedule_id = schedule_id.trim();
        let unreadable_before = self.unreadable.len();
        self.unreadable
            .retain(|entry| entry.schedule_id() != Some(schedule_id));
        let unreadable_deleted = unreadable_before - self.unreadable.len();
        unreadable_deleted
            + self.delete_audits_where(|record| {
                record
                    .original_schedule_id
                    .as_deref()
                    .is_some_and(|id| id.trim() == schedule_id)
            })
    }
}

impl RecipeLookup for RecordStore {
    fn recipe(&self, code: &str) -> Option<&Recipe> {
        Self::recipe(self, code)
    }
}

fn check_alignment(record: &AuditRecord) -> Result<()> {
    record
        .check_alignment()
        .map_err(|misalignment| StoreError::Misaligned {
            uid: record.uid.clone(),
            field: misalignment.field,
            expected: misalignment.expected,
            actual: misalignment.actual,
        })
}
