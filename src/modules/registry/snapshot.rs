use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::identity::Identity;
use super::store::MemoryStore;

/// Flat export of the admin set and its count
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub admins: Vec<Identity>,
    pub admin_count: u32,
}

/// Reasons a snapshot cannot be restored
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("identity {0} appears more than once")]
    DuplicateAdmin(Identity),
    #[error("admin count {recorded} does not match {actual} listed admins")]
    CountMismatch { recorded: u32, actual: usize },
}

impl MemoryStore {
    /// Rebuild a store from a snapshot, refusing anything that breaks the
    /// count invariant.
    pub fn restore(snapshot: RegistrySnapshot) -> Result<Self, SnapshotError> {
        let mut admins = HashSet::with_capacity(snapshot.admins.len());
        for identity in snapshot.admins {
            if admins.contains(&identity) {
                return Err(SnapshotError::DuplicateAdmin(identity));
            }
            admins.insert(identity);
        }

        if snapshot.admin_count as usize != admins.len() {
            return Err(SnapshotError::CountMismatch {
                recorded: snapshot.admin_count,
                actual: admins.len(),
            });
        }

        Ok(MemoryStore::from_parts(admins, snapshot.admin_count))
    }
}
