// Favorites and cached parameter bindings
// Author: Gabriel Demetrios Lafis

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use super::{KeyValueStore, StorageError};
use crate::report::{ParameterBinding, ReportSummary};

/// Key holding the favorite report identifiers
pub const FAVORITES_KEY: &str = "favorites";

/// Key holding the last binding of every report
pub const BINDINGS_KEY: &str = "parameter_bindings";

/// Set of reports the user has marked.
///
/// The set is read from the store once on load and written back after
/// every change.
pub struct FavoritesStore<S: KeyValueStore> {
    store: S,
    ids: BTreeSet<String>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Load the persisted set. Unreadable data is replaced by an empty set.
    pub fn load(store: S) -> Result<Self, StorageError> {
        let ids = match store.get(FAVORITES_KEY)? {
            None => BTreeSet::new(),
            Some(raw) => match serde_json::from_str::<BTreeSet<String>>(&raw) {
                Ok(ids) => ids,
                Err(err) => {
                    warn!("Resetting malformed favorites ({})", err);
                    store.set(FAVORITES_KEY, "[]")?;
                    BTreeSet::new()
                }
            },
        };

        debug!("Loaded {} favorite reports", ids.len());
        Ok(FavoritesStore { store, ids })
    }

    pub fn contains(&self, report_id: &str) -> bool {
        self.ids.contains(report_id)
    }

    /// Mark a report. Returns whether the set changed.
    pub fn add(&mut self, report_id: &str) -> Result<bool, StorageError> {
        if self.contains(report_id) {
            return Ok(false);
        }
        let mut ids = self.ids.clone();
        ids.insert(report_id.to_string());
        self.commit(ids)?;
        Ok(true)
    }

    /// Unmark a report. Returns whether the set changed.
    pub fn remove(&mut self, report_id: &str) -> Result<bool, StorageError> {
        if !self.contains(report_id) {
            return Ok(false);
        }
        let mut ids = self.ids.clone();
        ids.remove(report_id);
        self.commit(ids)?;
        Ok(true)
    }

    /// Flip membership and return the new state
    pub fn toggle(&mut self, report_id: &str) -> Result<bool, StorageError> {
        if self.contains(report_id) {
            self.remove(report_id)?;
            Ok(false)
        } else {
            self.add(report_id)?;
            Ok(true)
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Reports matching `search`, optionally only the favorites
    pub fn filter_reports<'a>(
        &self,
        reports: &'a [ReportSummary],
        favorites_only: bool,
        search: &str,
    ) -> Vec<&'a ReportSummary> {
        reports
            .iter()
            .filter(|r| !favorites_only || self.contains(&r.report_name))
            .filter(|r| r.matches_search(search))
            .collect()
    }

    /// Release the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Write `ids` to the store, then adopt them. A failed write leaves
    /// the current set untouched.
    fn commit(&mut self, ids: BTreeSet<String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&ids)?;
        self.store.set(FAVORITES_KEY, &raw)?;
        self.ids = ids;
        Ok(())
    }
}

/// Last binding used for each report
pub struct BindingCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> BindingCache<S> {
    pub fn new(store: S) -> Self {
        BindingCache { store }
    }

    /// Cached binding for a report, if any
    pub fn get(&self, report_id: &str) -> Result<Option<ParameterBinding>, StorageError> {
        Ok(self.load()?.remove(report_id))
    }

    /// Remember the binding of a report
    pub fn set(&self, report_id: &str, binding: &ParameterBinding) -> Result<(), StorageError> {
        let mut all = self.load()?;
        all.insert(report_id.to_string(), binding.clone());
        self.store.set(BINDINGS_KEY, &serde_json::to_string(&all)?)
    }

    /// Forget the binding of a report
    pub fn remove(&self, report_id: &str) -> Result<(), StorageError> {
        let mut all = self.load()?;
        if all.remove(report_id).is_some() {
            self.store.set(BINDINGS_KEY, &serde_json::to_string(&all)?)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, ParameterBinding>, StorageError> {
        let raw = match self.store.get(BINDINGS_KEY)? {
            Some(raw) => raw,
            None => return Ok(BTreeMap::new()),
        };

        match serde_json::from_str(&raw) {
            Ok(all) => Ok(all),
            Err(err) => {
                warn!("Discarding malformed parameter cache ({})", err);
                self.store.remove(BINDINGS_KEY)?;
                Ok(BTreeMap::new())
            }
        }
    }
}
