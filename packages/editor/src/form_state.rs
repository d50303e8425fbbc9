//! # Form State
//!
//! Current form values plus the snapshot last written by a successful save.
//! Dirty state is a diff between the two.

use lexform_template::{FieldValue, FormData};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    data: FormData,
    persisted: FormData,
}

impl FormState {
    /// Start from values that are already persisted
    pub fn from_persisted(data: FormData) -> Self {
        Self {
            persisted: data.clone(),
            data,
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.data.get(key)
    }

    /// Set a value; returns true if it changed
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) -> bool {
        let key = key.into();
        if self.data.get(&key) == Some(&value) {
            return false;
        }
        self.data.insert(key, value);
        true
    }

    /// Remove a value; returns true if it was present
    pub fn remove(&mut self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.data != self.persisted
    }

    /// Keys whose value differs from the persisted snapshot, sorted
    pub fn dirty_fields(&self) -> Vec<String> {
        let changed = self
            .data
            .iter()
            .filter(|(key, value)| self.persisted.get(*key) != Some(*value))
            .map(|(key, _)| key.clone());
        let removed = self
            .persisted
            .keys()
            .filter(|key| !self.data.contains_key(*key))
            .cloned();

        let mut keys: Vec<String> = changed.chain(removed).collect();
        keys.sort();
        keys
    }

    /// Record `saved` as the persisted snapshot
    ///
    /// `saved` may be older than the current data when edits landed while
    /// the save was in flight; those edits stay dirty.
    pub fn mark_persisted(&mut self, saved: FormData) {
        self.persisted = saved;
    }
}
