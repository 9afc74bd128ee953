//! Snapshot swapping for long-lived callers
//!
//! Snapshots are never edited in place. A refresh builds a new one and
//! swaps the whole `Arc`, so a reader either sees the old snapshot or the
//! new one, never a mix.

use std::sync::{Arc, RwLock};

use crate::resolver::PermissionResolver;
use crate::snapshot::PrincipalPermissionSnapshot;

/// Holder for the current snapshot of one principal
#[derive(Debug, Default)]
pub struct SharedSnapshot {
    current: RwLock<Arc<PrincipalPermissionSnapshot>>,
}

impl SharedSnapshot {
    pub fn new(snapshot: PrincipalPermissionSnapshot) -> Self {
        SharedSnapshot { current: RwLock::new(Arc::new(snapshot)) }
    }

    /// Snapshot to resolve against. Keep the returned `Arc` for the whole
    /// request so every check sees the same data.
    pub fn current(&self) -> Arc<PrincipalPermissionSnapshot> {
        let guard = self.current.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a freshly fetched snapshot, returning the one it replaces
    pub fn replace(&self, snapshot: PrincipalPermissionSnapshot) -> Arc<PrincipalPermissionSnapshot> {
        let mut guard = self.current.write().unwrap_or_else(|p| p.into_inner());
        let old = std::mem::replace(&mut *guard, Arc::new(snapshot));
        tracing::debug!(had_data = old.has_capability_data(), "permission snapshot replaced");
        old
    }

    /// Drop back to the anonymous snapshot (logout)
    pub fn clear(&self) -> Arc<PrincipalPermissionSnapshot> {
        self.replace(PrincipalPermissionSnapshot::anonymous())
    }

    /// Run `f` against a resolver over the current snapshot
    pub fn with_resolver<T>(&self, f: impl FnOnce(PermissionResolver<'_>) -> T) -> T {
        let snapshot = self.current();
        f(PermissionResolver::new(&snapshot))
    }
}
