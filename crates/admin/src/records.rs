//! Loaded admin collections and two-phase inline edits.
//!
//! An inline edit is applied to the local copy first ([`RecordList::apply`])
//! and then either kept ([`RecordList::commit`]) once the server accepts it,
//! or rolled back ([`RecordList::revert`]) to the value captured at apply
//! time. Only one edit per record may be outstanding.

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;

use shopfront_core::{ListQuery, Order, Searchable, User};
use shopfront_storefront::http::{ApiClient, Method};

use crate::error::{AdminError, Result};

/// A record with a stable string id.
pub trait AdminRecord: Searchable + Clone + Send + Sync + 'static {
    fn record_id(&self) -> &str;
}

impl AdminRecord for Order {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl AdminRecord for User {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// An applied but unsettled edit. Holds the record as it was before.
///
/// Dropping it without [`RecordList::commit`] or [`RecordList::revert`]
/// rolls the record back, so an abandoned request never leaves an
/// unconfirmed value behind or the record locked against further edits.
#[must_use = "an applied edit must be committed or reverted"]
pub struct PendingEdit<'a, T: AdminRecord> {
    list: &'a RecordList<T>,
    id: String,
    original: T,
    settled: bool,
}

impl<T: AdminRecord> PendingEdit<'_, T> {
    /// Id of the edited record.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The record before the edit.
    #[must_use]
    pub const fn original(&self) -> &T {
        &self.original
    }

    fn settle(&mut self, keep: bool) {
        if self.settled {
            return;
        }
        self.settled = true;
        if !keep {
            self.list.restore(&self.id, self.original.clone());
        }
        self.list.editing.lock().remove(&self.id);
    }
}

impl<T: AdminRecord> Drop for PendingEdit<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(record_id = %self.id, "Inline edit abandoned, reverting");
            self.settle(false);
        }
    }
}

impl<T: AdminRecord + std::fmt::Debug> std::fmt::Debug for PendingEdit<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingEdit")
            .field("id", &self.id)
            .field("original", &self.original)
            .field("settled", &self.settled)
            .finish_non_exhaustive()
    }
}

/// A loaded admin collection.
pub struct RecordList<T> {
    records: watch::Sender<Vec<T>>,
    editing: Mutex<HashSet<String>>,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        let (records, _) = watch::channel(Vec::new());
        Self {
            records,
            editing: Mutex::new(HashSet::new()),
        }
    }
}

impl<T: AdminRecord> RecordList<T> {
    /// Replace the collection.
    pub fn replace(&self, records: Vec<T>) {
        self.records.send_replace(records);
    }

    /// Snapshot of every record.
    #[must_use]
    pub fn all(&self) -> Vec<T> {
        self.records.borrow().clone()
    }

    /// Subscribe to changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.records.subscribe()
    }

    /// Records matching `query`, in load order.
    #[must_use]
    pub fn filter(&self, query: &ListQuery<T::Category>) -> Vec<T> {
        let records = self.records.borrow();
        query.apply(&records).into_iter().cloned().collect()
    }

    /// One record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<T> {
        let records = self.records.borrow();
        records.iter().find(|r| r.record_id() == id).cloned()
    }

    /// Apply `edit` to the local copy and return the pending edit.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an unknown id and
    /// [`AdminError::EditInProgress`] if the record already has an
    /// unsettled edit.
    pub fn apply(&self, id: &str, edit: impl FnOnce(&mut T)) -> Result<PendingEdit<'_, T>> {
        let mut editing = self.editing.lock();
        if editing.contains(id) {
            return Err(AdminError::EditInProgress(id.to_string()));
        }

        let mut original = None;
        self.records.send_if_modified(|records| {
            let Some(record) = records.iter_mut().find(|r| r.record_id() == id) else {
                return false;
            };
            original = Some(record.clone());
            edit(record);
            true
        });

        let original = original.ok_or_else(|| AdminError::NotFound(id.to_string()))?;
        editing.insert(id.to_string());
        Ok(PendingEdit {
            list: self,
            id: id.to_string(),
            original,
            settled: false,
        })
    }

    /// Keep the edited value. Returns the record as it now stands.
    pub fn commit(&self, mut edit: PendingEdit<'_, T>) -> Option<T> {
        edit.settle(true);
        self.get(&edit.id)
    }

    /// Restore the value captured when the edit was applied.
    pub fn revert(&self, mut edit: PendingEdit<'_, T>) {
        edit.settle(false);
    }

    fn restore(&self, id: &str, original: T) {
        self.records.send_if_modified(|records| {
            match records.iter_mut().find(|r| r.record_id() == id) {
                Some(record) => {
                    *record = original;
                    true
                }
                None => false,
            }
        });
    }
}

/// Apply `edit` locally, `PATCH` it to `path`, then commit or revert.
///
/// The caller gets the remote error back for a blocking notification. The
/// list is not re-fetched either way.
pub(crate) async fn patch_inline<T, B>(
    list: &RecordList<T>,
    client: &ApiClient,
    id: &str,
    path: &str,
    body: &B,
    edit: impl FnOnce(&mut T),
) -> Result<T>
where
    T: AdminRecord,
    B: Serialize + Sync,
{
    let pending = list.apply(id, edit)?;
    match client.submit(Method::Patch, path, body).await {
        Ok(()) => list
            .commit(pending)
            .ok_or_else(|| AdminError::NotFound(id.to_string())),
        Err(e) => {
            warn!(record_id = %id, error = %e, "Inline edit rejected, reverting");
            list.revert(pending);
            Err(e.into())
        }
    }
}
