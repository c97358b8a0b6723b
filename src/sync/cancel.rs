//! Cooperative cancellation signal observed by suspending lock acquisition.
//!
//! 由挂起式加锁观察的协作式取消信号。

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use crate::shim::atomic::{AtomicBool, Ordering};
use crate::shim::sync::{self, Arc, Mutex};

/// A clonable cancellation signal
///
/// All clones share one flag. Once [`cancel`](Self::cancel) is called the flag
/// stays set and every registered waiter is woken.
///
/// 可克隆的取消信号
///
/// 所有克隆共享同一个标志。一旦调用 [`cancel`](Self::cancel)，标志将保持置位，
/// 并唤醒所有已注册的等待者。
///
/// ```
/// use crab::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// assert!(!observer.is_cancelled());
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

struct Inner {
    cancelled: AtomicBool,
    waiters: Mutex<Waiters>,
}

struct Waiters {
    entries: Vec<(u64, Waker)>,
    next_id: u64,
}

impl CancellationToken {
    /// Create a token that has not been cancelled
    ///
    /// 创建一个尚未取消的令牌
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                waiters: Mutex::new(Waiters {
                    entries: Vec::new(),
                    next_id: 0,
                }),
            }),
        }
    }

    /// Fire the signal and wake every registered waiter
    ///
    /// Calling it again has no effect.
    ///
    /// 触发信号并唤醒所有已注册的等待者。重复调用没有效果。
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        let entries = std::mem::take(&mut sync::lock(&self.inner.waiters).entries);
        tracing::trace!(waiters = entries.len(), "cancellation token fired");
        for (_, waker) in entries {
            waker.wake();
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Returns a future that completes once the token is cancelled
    ///
    /// 返回一个在令牌被取消后完成的 future
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            slot: None,
        }
    }

    /// Store `waker` under `slot`, allocating a slot on first use
    ///
    /// Callers must re-check [`is_cancelled`](Self::is_cancelled) afterwards:
    /// a waker registered after `cancel` has drained the list is never woken.
    pub(crate) fn register(&self, slot: &mut Option<u64>, waker: &Waker) {
        let mut waiters = sync::lock(&self.inner.waiters);

        if let Some(id) = *slot {
            if let Some((_, existing)) = waiters.entries.iter_mut().find(|(i, _)| *i == id) {
                if !existing.will_wake(waker) {
                    existing.clone_from(waker);
                }
                return;
            }
        }

        let id = waiters.next_id;
        waiters.next_id += 1;
        waiters.entries.push((id, waker.clone()));
        *slot = Some(id);
    }

    pub(crate) fn deregister(&self, slot: &mut Option<u64>) {
        if let Some(id) = slot.take() {
            sync::lock(&self.inner.waiters)
                .entries
                .retain(|(i, _)| *i != id);
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Future returned by [`CancellationToken::cancelled`]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    slot: Option<u64>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        if this.token.is_cancelled() {
            this.token.deregister(&mut this.slot);
            return Poll::Ready(());
        }

        this.token.register(&mut this.slot, cx.waker());

        if this.token.is_cancelled() {
            this.token.deregister(&mut this.slot);
            return Poll::Ready(());
        }

        Poll::Pending
    }
}

impl Drop for Cancelled<'_> {
    fn drop(&mut self) {
        self.token.deregister(&mut self.slot);
    }
}

impl fmt::Debug for Cancelled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancelled").finish_non_exhaustive()
    }
}
