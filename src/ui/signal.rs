use tokio::sync::watch;

/// One-shot completion signal for a form.
///
/// Resolves exactly once with "did the form time out?". Later resolutions are
/// ignored, and every waiter, early or late, observes the same value.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: watch::Sender<Option<bool>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Returns `false` if the signal had already been resolved.
    pub fn resolve(&self, timed_out: bool) -> bool {
        self.tx.send_if_modified(|value| {
            if value.is_some() {
                return false;
            }
            *value = Some(timed_out);
            true
        })
    }

    pub fn get(&self) -> Option<bool> {
        *self.tx.borrow()
    }

    pub fn is_resolved(&self) -> bool {
        self.get().is_some()
    }

    pub async fn wait(&self) -> bool {
        let mut rx = self.tx.subscribe();
        let timed_out = match rx.wait_for(Option::is_some).await {
            Ok(value) => (*value).unwrap_or(false),
            // The sender lives as long as `self`, so this cannot happen.
            Err(_) => false,
        };
        timed_out
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_resolution_wins() {
        let signal = CompletionSignal::new();
        assert!(!signal.is_resolved());
        assert!(signal.resolve(true));
        assert!(!signal.resolve(false));
        assert_eq!(signal.get(), Some(true));
    }

    #[tokio::test]
    async fn test_all_waiters_observe_same_value() {
        let signal = Arc::new(CompletionSignal::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                tokio::spawn(async move { signal.wait().await })
            })
            .collect();

        tokio::task::yield_now().await;
        signal.resolve(false);

        for waiter in waiters {
            assert!(!waiter.await.unwrap());
        }
        // Late waiters return immediately.
        assert!(!signal.wait().await);
    }

    #[tokio::test]
    async fn test_wait_after_timeout_resolution_returns_true() {
        let signal = CompletionSignal::new();
        signal.resolve(true);
        assert!(signal.wait().await);
    }
}
