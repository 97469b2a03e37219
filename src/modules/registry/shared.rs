use std::sync::{Arc, Mutex, MutexGuard};

use super::error::RegistryResult;
use super::identity::Identity;
use super::operations::AdminRegistry;
use super::store::{AdminStore, MemoryStore};

/// Cloneable handle for hosts that call the registry from several threads.
///
/// Each operation holds the lock for its whole check-then-commit step, so two
/// racing `initialize` calls resolve to exactly one winner.
#[derive(Debug)]
pub struct SharedRegistry<S: AdminStore = MemoryStore> {
    inner: Arc<Mutex<AdminRegistry<S>>>,
}

impl<S: AdminStore> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AdminStore> SharedRegistry<S> {
    pub fn new(registry: AdminRegistry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    // Checks never mutate and `AdminStore::commit` is all-or-nothing even
    // when it panics, so a poisoned registry is still consistent.
    fn lock(&self) -> MutexGuard<'_, AdminRegistry<S>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_admin(&self, identity: &Identity) -> bool {
        self.lock().is_admin(identity)
    }

    pub fn admin_count(&self) -> u32 {
        self.lock().admin_count()
    }

    pub fn admins(&self) -> Vec<Identity> {
        self.lock().admins()
    }

    pub fn initialize(&self, caller: &Identity) -> RegistryResult {
        self.lock().initialize(caller)
    }

    pub fn add_admin(&self, caller: &Identity, target: &Identity) -> RegistryResult {
        self.lock().add_admin(caller, target)
    }

    pub fn remove_admin(&self, caller: &Identity, target: &Identity) -> RegistryResult {
        self.lock().remove_admin(caller, target)
    }
}

impl<S: AdminStore> From<AdminRegistry<S>> for SharedRegistry<S> {
    fn from(registry: AdminRegistry<S>) -> Self {
        Self::new(registry)
    }
}
