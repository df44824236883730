//! Batch cancellation token.

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared cancellation signal for one batch.
///
/// Items check it between stages and race their wallet and gateway awaits
/// against [`CancelToken::cancelled`], so a prompt that never answers still
/// ends when the batch is cancelled.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    trigger: Arc<Mutex<Option<oneshot::Sender<()>>>>,
    signal: Shared<oneshot::Receiver<()>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (trigger, signal) = oneshot::channel();
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Mutex::new(Some(trigger))),
            signal: signal.shared(),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        if let Some(trigger) = self.trigger.lock().ok().and_then(|mut slot| slot.take()) {
            let _ = trigger.send(());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolves once [`CancelToken::cancel`] has been called.
    pub fn cancelled(&self) -> impl Future<Output = ()> + Unpin {
        self.signal.clone().map(|_| ())
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::poll;
    use std::task::Poll;

    #[test]
    fn test_clones_share_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiters() {
        let token = CancelToken::new();
        let mut first = token.cancelled();
        let mut second = token.clone().cancelled();
        assert_eq!(poll!(&mut first), Poll::Pending);
        assert_eq!(poll!(&mut second), Poll::Pending);

        token.cancel();
        token.cancel();
        assert_eq!(poll!(&mut first), Poll::Ready(()));
        assert_eq!(poll!(&mut second), Poll::Ready(()));
    }
}
