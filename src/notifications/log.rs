//! The persisted, most-recent-first notification log.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::models::Notification;
use crate::store::{KeyValueStore, NOTIFICATIONS_KEY};

/// Ordered notification records, newest first, mirrored to a [`KeyValueStore`].
///
/// Every mutation is read-modify-write against the store: the stored log is
/// re-read, changed, and written back before the in-memory view is replaced.
/// A failed read or write leaves the previous view untouched.
pub struct NotificationLog {
    store: Arc<dyn KeyValueStore>,
    records: Vec<Notification>,
}

impl NotificationLog {
    /// Load the log from the store. Absent or corrupt data yields an empty log.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let records = match store.get(NOTIFICATIONS_KEY) {
            Ok(raw) => decode_stored(raw),
            Err(e) => {
                warn!("Failed to read stored notifications, starting empty: {:#}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} notifications", records.len());
        Self { store, records }
    }

    pub fn records(&self) -> &[Notification] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Prepend a record. Duplicate ids are kept as separate entries.
    pub fn append(&mut self, notification: Notification) -> Result<()> {
        self.mutate(|records| {
            records.insert(0, notification);
            true
        })?;
        Ok(())
    }

    /// Remove every record with this id. Returns how many were removed.
    pub fn remove_by_id(&mut self, id: &str) -> Result<usize> {
        self.remove_where(|n| n.id == id)
    }

    /// Remove every record matching `predicate`. Returns how many were removed.
    pub fn remove_where<F>(&mut self, predicate: F) -> Result<usize>
    where
        F: Fn(&Notification) -> bool,
    {
        let mut removed = 0;
        self.mutate(|records| {
            let before = records.len();
            records.retain(|n| !predicate(n));
            removed = before - records.len();
            removed > 0
        })?;
        Ok(removed)
    }

    /// Apply `change` to the stored log. `change` returns false when it left
    /// the records untouched, in which case nothing is written.
    fn mutate<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Notification>) -> bool,
    {
        // A failed read aborts the mutation; only undecodable data counts as empty.
        let raw = self
            .store
            .get(NOTIFICATIONS_KEY)
            .context("Failed to read stored notifications")?;
        let mut records = decode_stored(raw);

        if !change(&mut records) {
            self.records = records;
            return Ok(());
        }

        let encoded =
            serde_json::to_string(&records).context("Failed to encode notifications")?;
        self.store
            .set(NOTIFICATIONS_KEY, &encoded)
            .context("Failed to persist notifications")?;
        self.records = records;
        Ok(())
    }
}

fn decode_stored(raw: Option<String>) -> Vec<Notification> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Stored notifications are not valid, treating as empty: {}", e);
        Vec::new()
    })
}
