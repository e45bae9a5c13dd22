//! Per-client subscription registry
//!
//! Maps each category kind to the cancellation token of the subscription
//! currently serving it. At most one token per kind is ever registered.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::subscription::CategoryKind;
use crate::utils::CancelToken;

#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: Mutex<HashMap<CategoryKind, CancelToken>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh token for `kind`, cancelling the one it replaces
    pub fn register_and_supersede(&self, kind: CategoryKind) -> CancelToken {
        let token = CancelToken::new();
        let previous = self.entries.lock().insert(kind, token.clone());
        if let Some(previous) = previous {
            previous.cancel();
            tracing::debug!(?kind, "subscription superseded");
        }
        token
    }

    /// Cancel the subscription for `kind`; returns false if there was none
    pub fn cancel(&self, kind: CategoryKind) -> bool {
        let removed = self.entries.lock().remove(&kind);
        match removed {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every subscription; returns how many were live
    pub fn teardown_all(&self) -> usize {
        let drained: Vec<CancelToken> = self.entries.lock().drain().map(|(_, t)| t).collect();
        for token in &drained {
            token.cancel();
        }
        drained.len()
    }

    /// Forget `token` if it is still the one registered under `kind`
    ///
    /// Used by a subscription that ended on its own; a newer registration
    /// under the same kind is left untouched.
    pub fn release(&self, kind: CategoryKind, token: &CancelToken) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(&kind) {
            Some(current) if current.same_as(token) => {
                entries.remove(&kind);
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self, kind: CategoryKind) -> bool {
        self.entries.lock().contains_key(&kind)
    }

    /// Number of live subscriptions
    pub fn active(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_register_supersedes_same_kind_only() {
        let registry = SubscriptionRegistry::new();
        let users = registry.register_and_supersede(CategoryKind::User);
        let first = registry.register_and_supersede(CategoryKind::Message);
        let second = registry.register_and_supersede(CategoryKind::Message);

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!users.is_cancelled());
        assert_eq!(registry.active(), 2);
    }

    #[test]
    fn test_cancel_without_subscription_is_noop() {
        let registry = SubscriptionRegistry::new();
        assert!(!registry.cancel(CategoryKind::Channel));
        assert!(!registry.cancel(CategoryKind::Channel));
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn test_cancel_signals_and_removes() {
        let registry = SubscriptionRegistry::new();
        let token = registry.register_and_supersede(CategoryKind::Channel);
        assert!(registry.cancel(CategoryKind::Channel));
        assert!(token.is_cancelled());
        assert!(!registry.is_active(CategoryKind::Channel));
    }

    #[test]
    fn test_teardown_all() {
        let registry = SubscriptionRegistry::new();
        let tokens: Vec<CancelToken> = [CategoryKind::Channel, CategoryKind::User, CategoryKind::Message]
            .into_iter()
            .map(|kind| registry.register_and_supersede(kind))
            .collect();

        assert_eq!(registry.teardown_all(), 3);
        assert!(tokens.iter().all(CancelToken::is_cancelled));
        assert_eq!(registry.teardown_all(), 0);
    }

    #[test]
    fn test_release_keeps_newer_registration() {
        let registry = SubscriptionRegistry::new();
        let old = registry.register_and_supersede(CategoryKind::User);
        let new = registry.register_and_supersede(CategoryKind::User);

        assert!(!registry.release(CategoryKind::User, &old));
        assert!(registry.is_active(CategoryKind::User));
        assert!(registry.release(CategoryKind::User, &new));
        assert!(!registry.is_active(CategoryKind::User));
    }

    #[test]
    fn test_concurrent_registration_leaves_one_live_token() {
        let registry = Arc::new(SubscriptionRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    (0..100)
                        .map(|_| registry.register_and_supersede(CategoryKind::Message))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let tokens: Vec<CancelToken> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let live = tokens.iter().filter(|t| !t.is_cancelled()).count();
        assert_eq!(live, 1);
        assert_eq!(registry.active(), 1);
    }
}
