//! The locally persisted overlay.
//!
//! The overlay is an ordered list of user records stored as one JSON array
//! under a single storage key. It is always decoded and re-encoded as a whole;
//! there is no versioning and no incremental format.

use crate::{UserFields, UserId, UserRecord};
use serde::{Deserialize, Serialize};

/// An ordered sequence of locally held user records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overlay {
    records: Vec<UserRecord>,
}

impl Overlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a persisted blob.
    ///
    /// A missing slot, an empty string or anything that is not a JSON array of
    /// user records yields an empty overlay.
    pub fn decode(blob: Option<&str>) -> Self {
        let Some(blob) = blob.filter(|b| !b.trim().is_empty()) else {
            return Self::new();
        };

        match serde_json::from_str(blob) {
            Ok(overlay) => overlay,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed overlay");
                Self::new()
            }
        }
    }

    /// Encode as a compact JSON array.
    pub fn encode(&self) -> String {
        // A Vec of plain structs with string and integer fields always serializes.
        serde_json::to_string(&self.records).unwrap_or_else(|_| "[]".to_string())
    }

    /// Find a record by id.
    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Append a record at the end.
    pub fn push(&mut self, record: UserRecord) {
        self.records.push(record);
    }

    /// Replace every record with a matching id by `fields` under that id.
    ///
    /// Returns the number of records replaced.
    pub fn replace(&mut self, id: UserId, fields: &UserFields) -> usize {
        let mut replaced = 0;
        for record in self.records.iter_mut().filter(|r| r.id == id) {
            *record = UserRecord::from_fields(id, fields.clone());
            replaced += 1;
        }
        replaced
    }

    /// Remove every record with a matching id.
    ///
    /// Returns the number of records removed.
    pub fn remove(&mut self, id: UserId) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        before - self.records.len()
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remote records followed by this overlay's records.
    pub fn combine(&self, remote: Vec<UserRecord>) -> Vec<UserRecord> {
        let mut combined = remote;
        combined.extend(self.records.iter().cloned());
        combined
    }
}

impl From<Vec<UserRecord>> for Overlay {
    fn from(records: Vec<UserRecord>) -> Self {
        Self { records }
    }
}
