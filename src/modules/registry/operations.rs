use itertools::Itertools;
use log::{debug, trace};

use super::error::{RegistryError, RegistryResult};
use super::identity::Identity;
use super::snapshot::RegistrySnapshot;
use super::store::{AdminStore, MemoryStore, Transition};
use crate::modules::config::RegistryConfig;
use crate::modules::utils::logging::log_registry_event;

/// Admin allowlist with a quorum floor of one.
///
/// Every mutating operation takes the caller explicitly, checks all of its
/// preconditions against the store, and only then commits a single
/// [`Transition`]. A rejected call never reaches the store.
#[derive(Debug, Clone)]
pub struct AdminRegistry<S: AdminStore = MemoryStore> {
    store: S,
    redact_identities: bool,
}

impl AdminRegistry<MemoryStore> {
    /// Create a registry over an empty in-memory store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for AdminRegistry<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AdminStore> AdminRegistry<S> {
    pub fn with_store(store: S) -> Self {
        Self::with_config(store, &RegistryConfig::default())
    }

    pub fn with_config(store: S, config: &RegistryConfig) -> Self {
        Self {
            store,
            redact_identities: config.redact_identities,
        }
    }

    /// Whether `identity` currently holds admin privilege
    pub fn is_admin(&self, identity: &Identity) -> bool {
        let admin = self.store.contains(identity);
        trace!("is-admin check: admin={}", admin);
        admin
    }

    pub fn admin_count(&self) -> u32 {
        self.store.admin_count()
    }

    /// Whether the bootstrap admin has been established
    pub fn is_initialized(&self) -> bool {
        self.store.admin_count() != 0
    }

    /// Current admins in ascending order
    pub fn admins(&self) -> Vec<Identity> {
        self.store.members().into_iter().sorted().collect()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            admins: self.admins(),
            admin_count: self.store.admin_count(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Make `caller` the first admin of an untouched registry.
    ///
    /// There is no access check: whoever calls this first on a fresh
    /// registry becomes its sole admin.
    pub fn initialize(&mut self, caller: &Identity) -> RegistryResult {
        let result = self.try_initialize(caller);
        log_registry_event("initialize", caller, None, &result, self.redact_identities);
        result
    }

    fn try_initialize(&mut self, caller: &Identity) -> RegistryResult {
        let count = self.store.admin_count();
        if count != 0 {
            return Err(RegistryError::AlreadyInitialized);
        }

        self.store.commit(Transition::grant(caller.clone(), count));
        Ok(true)
    }

    /// Grant admin privilege to `target`
    pub fn add_admin(&mut self, caller: &Identity, target: &Identity) -> RegistryResult {
        let result = self.try_add_admin(caller, target);
        log_registry_event(
            "add-admin",
            caller,
            Some(target),
            &result,
            self.redact_identities,
        );
        result
    }

    fn try_add_admin(&mut self, caller: &Identity, target: &Identity) -> RegistryResult {
        if !self.store.contains(caller) {
            return Err(RegistryError::Forbidden);
        }
        if self.store.contains(target) {
            return Err(RegistryError::AlreadyAdmin);
        }

        let count = self.store.admin_count();
        self.store.commit(Transition::grant(target.clone(), count));
        debug!("admin count now {}", count + 1);
        Ok(true)
    }

    /// Revoke admin privilege from `target`, never dropping below one admin
    pub fn remove_admin(&mut self, caller: &Identity, target: &Identity) -> RegistryResult {
        let result = self.try_remove_admin(caller, target);
        log_registry_event(
            "remove-admin",
            caller,
            Some(target),
            &result,
            self.redact_identities,
        );
        result
    }

    fn try_remove_admin(&mut self, caller: &Identity, target: &Identity) -> RegistryResult {
        if !self.store.contains(caller) {
            return Err(RegistryError::Forbidden);
        }
        if !self.store.contains(target) {
            return Err(RegistryError::NotAdmin);
        }

        let count = self.store.admin_count();
        if count <= 1 {
            return Err(RegistryError::LastAdmin);
        }

        self.store.commit(Transition::revoke(target.clone(), count));
        debug!("admin count now {}", count - 1);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn alice() -> Identity {
        Identity::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM")
    }

    fn bob() -> Identity {
        Identity::new("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG")
    }

    fn carol() -> Identity {
        Identity::new("ST3NBRSFKX28FQ2ZJ1MAKX58HKHSDGNV5N7R21XCP")
    }

    fn initialized_registry() -> AdminRegistry {
        let mut registry = AdminRegistry::new();
        registry.initialize(&alice()).unwrap();
        registry
    }

    fn assert_invariant(registry: &AdminRegistry) {
        assert_eq!(
            registry.admin_count() as usize,
            registry.store().members().len()
        );
    }

    #[test]
    fn test_is_admin() {
        let registry = initialized_registry();
        assert!(registry.is_admin(&alice()));
        assert!(!registry.is_admin(&bob()));

        // Repeated queries agree
        assert_eq!(registry.is_admin(&bob()), registry.is_admin(&bob()));
        assert_eq!(registry.is_admin(&alice()), registry.is_admin(&alice()));
    }

    #[test]
    fn test_initialize_once() {
        let mut registry = AdminRegistry::new();
        assert!(!registry.is_initialized());
        assert_eq!(registry.admin_count(), 0);

        assert_eq!(registry.initialize(&alice()), Ok(true));
        assert!(registry.is_initialized());
        assert!(registry.is_admin(&alice()));
        assert_eq!(registry.admin_count(), 1);

        // Neither the first admin nor a stranger can bootstrap again
        assert_eq!(
            registry.initialize(&alice()),
            Err(RegistryError::AlreadyInitialized)
        );
        let result = registry.initialize(&bob());
        assert_eq!(result, Err(RegistryError::AlreadyInitialized));
        assert_eq!(result.unwrap_err().code(), 409);
        assert!(!registry.is_admin(&bob()));
        assert_eq!(registry.admin_count(), 1);
    }

    #[test]
    fn test_add_admin() {
        let mut registry = initialized_registry();

        assert_eq!(registry.add_admin(&alice(), &bob()), Ok(true));
        assert!(registry.is_admin(&bob()));
        assert_eq!(registry.admin_count(), 2);
        assert_invariant(&registry);
    }

    #[test]
    fn test_add_admin_by_non_admin() {
        let mut registry = initialized_registry();
        let before = registry.snapshot();

        let result = registry.add_admin(&bob(), &carol());
        assert_eq!(result, Err(RegistryError::Forbidden));
        assert_eq!(result.unwrap_err().code(), 403);
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_add_existing_admin() {
        let mut registry = initialized_registry();
        registry.add_admin(&alice(), &bob()).unwrap();
        let before = registry.snapshot();

        assert_eq!(
            registry.add_admin(&alice(), &bob()),
            Err(RegistryError::AlreadyAdmin)
        );
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_forbidden_checked_before_already_admin() {
        let mut registry = initialized_registry();

        // Target is an admin, but the caller is not: the caller check wins
        assert_eq!(
            registry.add_admin(&bob(), &alice()),
            Err(RegistryError::Forbidden)
        );
        assert_eq!(
            registry.remove_admin(&bob(), &carol()),
            Err(RegistryError::Forbidden)
        );
    }

    #[test]
    fn test_remove_admin() {
        let mut registry = initialized_registry();
        registry.add_admin(&alice(), &bob()).unwrap();

        assert_eq!(registry.remove_admin(&alice(), &bob()), Ok(true));
        assert!(!registry.is_admin(&bob()));
        assert_eq!(registry.admin_count(), 1);
        assert_invariant(&registry);
    }

    #[test]
    fn test_remove_non_admin_target() {
        let mut registry = initialized_registry();
        registry.add_admin(&alice(), &bob()).unwrap();
        let before = registry.snapshot();

        let result = registry.remove_admin(&alice(), &carol());
        assert_eq!(result, Err(RegistryError::NotAdmin));
        assert_eq!(result.unwrap_err().code(), 404);
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_not_admin_checked_before_last_admin() {
        let mut registry = initialized_registry();
        let before = registry.snapshot();

        // Only one admin remains, but the target was never an admin
        let result = registry.remove_admin(&alice(), &bob());
        assert_eq!(result, Err(RegistryError::NotAdmin));
        assert_eq!(result.unwrap_err().code(), 404);
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_last_admin_protection() {
        let mut registry = initialized_registry();
        let before = registry.snapshot();

        let result = registry.remove_admin(&alice(), &alice());
        assert_eq!(result, Err(RegistryError::LastAdmin));
        assert_eq!(result.unwrap_err().code(), 400);
        assert_eq!(registry.snapshot(), before);
        assert!(registry.is_admin(&alice()));
    }

    #[test]
    fn test_admin_may_remove_self_when_others_remain() {
        let mut registry = initialized_registry();
        registry.add_admin(&alice(), &bob()).unwrap();

        assert_eq!(registry.remove_admin(&alice(), &alice()), Ok(true));
        assert!(!registry.is_admin(&alice()));
        assert_eq!(
            registry.add_admin(&alice(), &carol()),
            Err(RegistryError::Forbidden)
        );
    }

    #[test]
    fn test_mutations_before_initialize_are_forbidden() {
        let mut registry = AdminRegistry::new();
        assert_eq!(
            registry.add_admin(&alice(), &bob()),
            Err(RegistryError::Forbidden)
        );
        assert_eq!(
            registry.remove_admin(&alice(), &alice()),
            Err(RegistryError::Forbidden)
        );
        assert_eq!(registry.admin_count(), 0);
    }

    #[test]
    fn test_add_remove_round_trip() {
        let mut registry = initialized_registry();
        registry.add_admin(&alice(), &carol()).unwrap();
        let count = registry.admin_count();

        registry.add_admin(&alice(), &bob()).unwrap();
        assert!(registry.is_admin(&bob()));
        assert_eq!(registry.admin_count(), count + 1);

        registry.remove_admin(&alice(), &bob()).unwrap();
        assert!(!registry.is_admin(&bob()));
        assert_eq!(registry.admin_count(), count);
    }

    #[test]
    fn test_walkthrough_scenario() {
        let mut registry = AdminRegistry::new();
        assert_eq!(registry.admin_count(), 0);

        assert_eq!(registry.initialize(&alice()), Ok(true));
        assert!(registry.is_admin(&alice()));
        assert_eq!(registry.admin_count(), 1);

        assert_eq!(registry.add_admin(&alice(), &bob()), Ok(true));
        assert_eq!(registry.admin_count(), 2);

        assert_eq!(
            registry.add_admin(&alice(), &bob()).map_err(|e| e.code()),
            Err(409)
        );
        assert_eq!(registry.admin_count(), 2);

        assert_eq!(registry.remove_admin(&bob(), &alice()), Ok(true));
        assert_eq!(registry.admin_count(), 1);
        assert!(!registry.is_admin(&alice()));

        assert_eq!(
            registry.remove_admin(&bob(), &bob()).map_err(|e| e.code()),
            Err(400)
        );
        assert_eq!(registry.admin_count(), 1);
        assert_eq!(registry.admins(), vec![bob()]);
    }

    #[test]
    fn test_admins_sorted() {
        let mut registry = AdminRegistry::new();
        registry.initialize(&carol()).unwrap();
        registry.add_admin(&carol(), &alice()).unwrap();
        registry.add_admin(&carol(), &bob()).unwrap();

        assert_eq!(registry.admins(), vec![alice(), bob(), carol()]);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut registry = initialized_registry();
        registry.add_admin(&alice(), &bob()).unwrap();

        let json = serde_json::to_string(&registry.snapshot()).unwrap();
        let snapshot: RegistrySnapshot = serde_json::from_str(&json).unwrap();
        let mut restored = AdminRegistry::with_store(MemoryStore::restore(snapshot).unwrap());

        assert_eq!(restored.admins(), registry.admins());
        assert_eq!(restored.admin_count(), 2);
        assert_eq!(
            restored.initialize(&carol()),
            Err(RegistryError::AlreadyInitialized)
        );
        assert_eq!(restored.remove_admin(&bob(), &alice()), Ok(true));
    }

    #[test]
    fn test_with_config_over_custom_store() {
        let config = RegistryConfig {
            redact_identities: false,
            ..RegistryConfig::default()
        };
        let mut registry = AdminRegistry::with_config(MemoryStore::new(), &config);
        registry.initialize(&bob()).unwrap();

        let store = registry.into_store();
        assert!(store.contains(&bob()));
        assert_eq!(store.admin_count(), 1);
    }

    #[test]
    fn test_random_operations_preserve_invariant() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let pool: Vec<Identity> = (0..6)
            .map(|i| Identity::from_public_key(format!("key-{}", i).as_bytes()))
            .collect();

        let mut registry = AdminRegistry::new();
        registry.initialize(&pool[0]).unwrap();

        for _ in 0..500 {
            let caller = pool.choose(&mut rng).unwrap();
            let target = pool.choose(&mut rng).unwrap();
            let before = registry.snapshot();

            let result = match rng.gen_range(0..3) {
                0 => registry.add_admin(caller, target),
                1 => registry.remove_admin(caller, target),
                _ => registry.initialize(caller),
            };

            if result.is_err() {
                assert_eq!(registry.snapshot(), before);
            }
            assert_invariant(&registry);
            assert!(registry.admin_count() >= 1);
        }
    }
}
