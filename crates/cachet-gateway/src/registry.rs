//! Engine registry: one protocol engine per registered username
//!
//! An explicit store in place of any process-global map. Lifecycle is
//! create-on-register, never removed — an engine lives as long as the
//! registry that owns it. Plain struct over a `HashMap`; the gateway
//! provides locking.

use std::{collections::HashMap, sync::Arc};

use cachet_core::ParticipantEngine;

/// Registry of live participant engines, keyed by username.
#[derive(Debug, Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<ParticipantEngine>>,
}

impl EngineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine for `username`.
    ///
    /// Returns `false` (and leaves the registry unchanged) if the username
    /// is already registered.
    pub fn register(&mut self, username: &str, engine: Arc<ParticipantEngine>) -> bool {
        if self.engines.contains_key(username) {
            return false;
        }
        self.engines.insert(username.to_string(), engine);
        true
    }

    /// Engine for a username. `None` if unregistered.
    pub fn get(&self, username: &str) -> Option<Arc<ParticipantEngine>> {
        self.engines.get(username).map(Arc::clone)
    }

    /// Check whether a username has a registered engine.
    pub fn contains(&self, username: &str) -> bool {
        self.engines.contains_key(username)
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// True if no engine has been registered.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cachet_crypto::{OsPrimitives, Primitives};

    use super::*;

    fn test_engine() -> Arc<ParticipantEngine> {
        let primitives: Arc<dyn Primitives> = Arc::new(OsPrimitives);
        let ca = cachet_core::CertificateAuthority::new(Arc::clone(&primitives));
        let escrow = cachet_core::EscrowAuthority::new(Arc::clone(&primitives));
        Arc::new(ParticipantEngine::new(ca.verifying_key(), escrow.public_key(), primitives))
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = EngineRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register("alice", test_engine()));

        assert!(registry.contains("alice"));
        assert!(!registry.contains("bob"));
        assert!(registry.get("alice").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = EngineRegistry::new();
        let original = test_engine();

        assert!(registry.register("alice", Arc::clone(&original)));
        assert!(!registry.register("alice", test_engine()));

        // The original engine is still the registered one
        let registered = registry.get("alice").map(|engine| Arc::ptr_eq(&engine, &original));
        assert_eq!(registered, Some(true));
    }

    #[test]
    fn lookups_share_the_same_engine() {
        let mut registry = EngineRegistry::new();
        registry.register("alice", test_engine());

        let first = registry.get("alice");
        let second = registry.get("alice");
        let same = match (first, second) {
            (Some(a), Some(b)) => Arc::ptr_eq(&a, &b),
            _ => false,
        };
        assert!(same);
    }
}
