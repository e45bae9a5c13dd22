//! One-shot cancellation token
//!
//! A token starts live and can be cancelled exactly once; cancellation is
//! never revoked. Any number of tasks may await `cancelled()` concurrently,
//! including tasks that start waiting after the token was cancelled.

use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable handle to a shared cancellation flag
#[derive(Clone, Debug)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Signal cancellation; calling it again has no effect
    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolve once the token has been cancelled
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives as long as `self`, so wait_for cannot fail here
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Whether both handles refer to the same token
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.flag, &other.flag)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wakes_waiter() {
        let token = CancelToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };

        tokio::task::yield_now().await;
        assert!(!token.is_cancelled());
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_the_fact() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();

        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .expect("already cancelled token resolves immediately");
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_same_as() {
        let a = CancelToken::new();
        let b = a.clone();
        let c = CancelToken::new();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
    }
}
