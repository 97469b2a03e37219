use std::collections::HashSet;

use super::identity::Identity;

/// A single membership change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Grant(Identity),
    Revoke(Identity),
}

/// A membership change paired with the admin count it produces.
///
/// Only the registry builds transitions, and it only does so after every
/// precondition has passed, so the count always agrees with the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    change: Change,
    admin_count: u32,
}

impl Transition {
    pub(crate) fn grant(target: Identity, current_count: u32) -> Self {
        Self {
            change: Change::Grant(target),
            admin_count: current_count + 1,
        }
    }

    pub(crate) fn revoke(target: Identity, current_count: u32) -> Self {
        Self {
            change: Change::Revoke(target),
            admin_count: current_count - 1,
        }
    }

    pub fn change(&self) -> &Change {
        &self.change
    }

    /// Count the store must hold once the change is applied
    pub fn admin_count(&self) -> u32 {
        self.admin_count
    }

    pub fn into_parts(self) -> (Change, u32) {
        (self.change, self.admin_count)
    }
}

/// Storage supplied by the host environment.
///
/// `commit` must apply the membership change and the new count together:
/// either both become visible or neither does. This also holds when `commit`
/// panics: a panicking commit must leave the store unchanged.
pub trait AdminStore {
    /// Whether `identity` is currently in the admin set
    fn contains(&self, identity: &Identity) -> bool;

    /// The persisted admin count
    fn admin_count(&self) -> u32;

    /// Every identity in the admin set, in no particular order
    fn members(&self) -> Vec<Identity>;

    /// Apply a transition atomically
    fn commit(&mut self, transition: Transition);
}

/// In-process store backed by a hash set and a counter
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    admins: HashSet<Identity>,
    admin_count: u32,
}

impl MemoryStore {
    /// Create an empty store in the genesis state (count 0)
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn from_parts(admins: HashSet<Identity>, admin_count: u32) -> Self {
        Self {
            admins,
            admin_count,
        }
    }
}

impl AdminStore for MemoryStore {
    fn contains(&self, identity: &Identity) -> bool {
        self.admins.contains(identity)
    }

    fn admin_count(&self) -> u32 {
        self.admin_count
    }

    fn members(&self) -> Vec<Identity> {
        self.admins.iter().cloned().collect()
    }

    fn commit(&mut self, transition: Transition) {
        let (change, admin_count) = transition.into_parts();
        match change {
            Change::Grant(identity) => {
                self.admins.insert(identity);
            }
            Change::Revoke(identity) => {
                self.admins.remove(&identity);
            }
        }
        self.admin_count = admin_count;

        debug_assert_eq!(self.admin_count as usize, self.admins.len());
    }
}
