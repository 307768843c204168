//! The journal: sole owner of the bean and brew-record collections.
//!
//! Every mutation is applied in memory first and then written through to the
//! storage backend. A failed write never rolls the mutation back; it is
//! reported on the returned [`Outcome`] instead.

use crate::core::error::{BrewlogError, PersistenceError};
use crate::core::ids::{IdGenerator, UlidIds};
use crate::core::model::{BeanDraft, BeanId, BrewId, BrewRecord, BrewRecordDraft, CoffeeBean};
use crate::core::query::JournalView;
use crate::core::storage::{Collection, Storage, encode_collection, load_collection};
use crate::core::time::{Clock, SystemClock};
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

/// Attempts at drawing a fresh id before falling back to suffixing.
const MAX_ID_DRAWS: usize = 8;

/// Result of a mutation that was applied in memory.
#[must_use]
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    /// Set when the write-through save failed; the change may not survive a restart.
    pub persist_error: Option<PersistenceError>,
}

impl<T> Outcome<T> {
    pub fn is_durable(&self) -> bool {
        self.persist_error.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Treats a failed save as an error.
    pub fn into_result(self) -> Result<T, BrewlogError> {
        match self.persist_error {
            Some(err) => Err(BrewlogError::Persistence(err)),
            None => Ok(self.value),
        }
    }
}

/// What a bean deletion removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeanRemoval {
    pub bean: Option<CoffeeBean>,
    pub brew_records: Vec<BrewRecord>,
}

#[derive(Debug, Default, Clone, Copy)]
struct StoredKeys {
    beans: bool,
    brew_records: bool,
}

impl StoredKeys {
    fn get(&self, collection: Collection) -> bool {
        match collection {
            Collection::Beans => self.beans,
            Collection::BrewRecords => self.brew_records,
        }
    }

    fn mark(&mut self, collection: Collection) {
        match collection {
            Collection::Beans => self.beans = true,
            Collection::BrewRecords => self.brew_records = true,
        }
    }
}

pub struct Journal<S: Storage> {
    storage: S,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    beans: Vec<CoffeeBean>,
    brew_records: Vec<BrewRecord>,
    stored: StoredKeys,
    load_warning: Option<PersistenceError>,
    /// After a failed load, or a load that dropped orphaned records, the next
    /// save rewrites both collections.
    resync_pending: bool,
}

impl<S: Storage> Journal<S> {
    /// Opens a journal with ULID ids and the system clock.
    pub fn open(storage: S) -> Self {
        Self::with_parts(storage, Box::new(UlidIds::new()), Box::new(SystemClock))
    }

    /// Opens a journal with explicit id and clock strategies.
    ///
    /// A load failure is not fatal: the journal starts empty and the failure
    /// is kept in [`Journal::load_warning`].
    pub fn with_parts(storage: S, ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        let mut journal = Self {
            storage,
            ids,
            clock,
            beans: Vec::new(),
            brew_records: Vec::new(),
            stored: StoredKeys::default(),
            load_warning: None,
            resync_pending: false,
        };
        if let Err(err) = journal.load() {
            warn!(
                storage = %journal.storage.describe(),
                error = %err,
                "journal could not be loaded; starting empty"
            );
            journal.stored = StoredKeys {
                beans: true,
                brew_records: true,
            };
            journal.resync_pending = true;
            journal.load_warning = Some(err);
        }
        journal
    }

    fn load(&mut self) -> Result<(), PersistenceError> {
        // Decode both before installing either so a corrupt collection
        // never leaves the other half-loaded.
        let beans: Option<Vec<CoffeeBean>> =
            load_collection(&self.storage, Collection::Beans.name())?;
        let brew_records: Option<Vec<BrewRecord>> =
            load_collection(&self.storage, Collection::BrewRecords.name())?;

        self.stored = StoredKeys {
            beans: beans.is_some(),
            brew_records: brew_records.is_some(),
        };
        let beans = beans.unwrap_or_default();
        let mut brew_records = brew_records.unwrap_or_default();

        // Records whose bean is gone (a concurrent writer, an old export)
        // are dropped here and the cleaned list is written on the next save.
        let live: FxHashSet<&BeanId> = beans.iter().map(|bean| &bean.id).collect();
        let before = brew_records.len();
        brew_records.retain(|record| {
            let keep = live.contains(&record.coffee_bean_id);
            if !keep {
                warn!(
                    record = %record.id,
                    bean = %record.coffee_bean_id,
                    "dropping brew record that references a missing bean"
                );
            }
            keep
        });
        if brew_records.len() != before {
            self.resync_pending = true;
        }

        self.beans = beans;
        self.brew_records = brew_records;
        info!(
            storage = %self.storage.describe(),
            beans = self.beans.len(),
            brew_records = self.brew_records.len(),
            "journal loaded"
        );
        Ok(())
    }

    pub fn load_warning(&self) -> Option<&PersistenceError> {
        self.load_warning.as_ref()
    }

    pub fn take_load_warning(&mut self) -> Option<PersistenceError> {
        self.load_warning.take()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn beans(&self) -> &[CoffeeBean] {
        &self.beans
    }

    pub fn brew_records(&self) -> &[BrewRecord] {
        &self.brew_records
    }

    /// Read-only query surface over the current state.
    pub fn view(&self) -> JournalView<'_> {
        JournalView::new(&self.beans, &self.brew_records)
    }

    pub fn create_bean(&mut self, draft: BeanDraft) -> Outcome<CoffeeBean> {
        let beans = &self.beans;
        let id = fresh_id(self.ids.as_mut(), |candidate| {
            beans.iter().any(|b| b.id.as_str() == candidate)
        });
        let bean = draft.into_bean(BeanId::new(id), self.clock.now());
        debug!(bean_id = %bean.id, origin = %bean.origin, "bean created");
        self.beans.push(bean.clone());

        let persist_error = self.persist(&[Collection::Beans]);
        Outcome {
            value: bean,
            persist_error,
        }
    }

    /// Replaces every mutable field of the bean; `id` and `createdAt` are kept.
    pub fn update_bean(
        &mut self,
        id: &BeanId,
        draft: BeanDraft,
    ) -> Result<Outcome<CoffeeBean>, BrewlogError> {
        let bean = self
            .beans
            .iter_mut()
            .find(|b| b.id == *id)
            .ok_or_else(|| BrewlogError::NotFound(format!("bean '{}'", id)))?;
        let updated = draft.into_bean(bean.id.clone(), bean.created_at);
        *bean = updated.clone();
        debug!(bean_id = %id, "bean updated");

        let persist_error = self.persist(&[Collection::Beans]);
        Ok(Outcome {
            value: updated,
            persist_error,
        })
    }

    /// Removes the bean and every brew record that references it. An absent
    /// id removes nothing and is not an error.
    pub fn delete_bean(&mut self, id: &BeanId) -> Outcome<BeanRemoval> {
        let bean = self
            .beans
            .iter()
            .position(|b| b.id == *id)
            .map(|idx| self.beans.remove(idx));
        let (removed, kept): (Vec<BrewRecord>, Vec<BrewRecord>) =
            std::mem::take(&mut self.brew_records)
                .into_iter()
                .partition(|r| r.coffee_bean_id == *id);
        self.brew_records = kept;
        debug!(
            bean_id = %id,
            found = bean.is_some(),
            cascaded = removed.len(),
            "bean deleted"
        );

        // Records before beans: an interrupted batch may strand a bean, never a record.
        let persist_error = self.persist(&[Collection::BrewRecords, Collection::Beans]);
        Outcome {
            value: BeanRemoval {
                bean,
                brew_records: removed,
            },
            persist_error,
        }
    }

    pub fn create_brew_record(
        &mut self,
        bean_id: &BeanId,
        draft: BrewRecordDraft,
    ) -> Result<Outcome<BrewRecord>, BrewlogError> {
        if !self.beans.iter().any(|b| b.id == *bean_id) {
            return Err(BrewlogError::InvalidReference(format!(
                "bean '{}' does not exist",
                bean_id
            )));
        }
        draft.validate()?;

        let records = &self.brew_records;
        let id = fresh_id(self.ids.as_mut(), |candidate| {
            records.iter().any(|r| r.id.as_str() == candidate)
        });
        let record = draft.into_record(BrewId::new(id), bean_id.clone(), self.clock.now());
        debug!(brew_id = %record.id, bean_id = %bean_id, "brew record created");
        self.brew_records.push(record.clone());

        let persist_error = self.persist(&[Collection::BrewRecords]);
        Ok(Outcome {
            value: record,
            persist_error,
        })
    }

    /// Removes the record if present; an absent id is not an error.
    pub fn delete_brew_record(&mut self, id: &BrewId) -> Outcome<Option<BrewRecord>> {
        let removed = self
            .brew_records
            .iter()
            .position(|r| r.id == *id)
            .map(|idx| self.brew_records.remove(idx));
        debug!(brew_id = %id, found = removed.is_some(), "brew record deleted");

        let persist_error = self.persist(&[Collection::BrewRecords]);
        Outcome {
            value: removed,
            persist_error,
        }
    }

    fn is_empty(&self, collection: Collection) -> bool {
        match collection {
            Collection::Beans => self.beans.is_empty(),
            Collection::BrewRecords => self.brew_records.is_empty(),
        }
    }

    fn encode(&self, collection: Collection) -> Result<String, PersistenceError> {
        match collection {
            Collection::Beans => encode_collection(collection.name(), &self.beans),
            Collection::BrewRecords => encode_collection(collection.name(), &self.brew_records),
        }
    }

    /// Writes the given collections as one batch, in order. A collection that
    /// was never stored and is still empty is skipped.
    fn persist(&mut self, targets: &[Collection]) -> Option<PersistenceError> {
        let targets: &[Collection] = if self.resync_pending {
            &[Collection::BrewRecords, Collection::Beans]
        } else {
            targets
        };

        let mut written = Vec::with_capacity(targets.len());
        let mut writes = Vec::with_capacity(targets.len());
        for &collection in targets {
            if !self.stored.get(collection) && self.is_empty(collection) {
                debug!(collection = collection.name(), "skipping save of empty, unsaved collection");
                continue;
            }
            match self.encode(collection) {
                Ok(payload) => {
                    written.push(collection);
                    writes.push((collection.name(), payload));
                }
                Err(err) => {
                    warn!(collection = collection.name(), error = %err, "collection encode failed");
                    return Some(err);
                }
            }
        }
        if writes.is_empty() {
            return None;
        }

        match self.storage.save_batch(&writes) {
            Ok(()) => {
                for collection in written {
                    self.stored.mark(collection);
                }
                self.resync_pending = false;
                None
            }
            Err(err) => {
                warn!(
                    storage = %self.storage.describe(),
                    error = %err,
                    "journal save failed; change kept in memory only"
                );
                Some(err)
            }
        }
    }
}

/// Draws ids until one is not `taken`; a generator that keeps repeating
/// itself gets a numeric suffix.
fn fresh_id(ids: &mut dyn IdGenerator, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = String::new();
    for _ in 0..MAX_ID_DRAWS {
        candidate = ids.next_id();
        if !candidate.is_empty() && !taken(&candidate) {
            return candidate;
        }
        debug!(candidate = %candidate, "generated id collides; drawing again");
    }
    if candidate.is_empty() {
        candidate.push_str("id");
    }
    let mut suffix = 1u64;
    loop {
        let suffixed = format!("{}-{}", candidate, suffix);
        if !taken(&suffixed) {
            return suffixed;
        }
        suffix += 1;
    }
}
