//! Binary semaphore shared by blocking and suspending acquirers.
//!
//! 由阻塞与挂起两类获取者共享的二元信号量。
//!
//! State machine: `Free -> Held -> Free`. Suspending waiters queue their wakers
//! in FIFO order; blocking waiters park on a condition variable. A release
//! wakes the front suspending waiter and notifies one blocked thread, and
//! whichever reaches the state first takes the permit. Losers re-queue at the
//! front so they are next in line.
//!
//! 状态机：`Free -> Held -> Free`。挂起的等待者按 FIFO 顺序排队其 waker；
//! 阻塞的等待者在条件变量上休眠。释放时唤醒队首的挂起等待者并通知一个阻塞线程，
//! 先到达状态者获得许可。失败者重新排到队首。

use std::collections::VecDeque;
use std::fmt;
use std::task::{Context, Poll, Waker};

use crate::shim::sync::{self, Condvar, Mutex};

pub(crate) struct Semaphore {
    state: Mutex<State>,
    condvar: Condvar,
}

struct State {
    held: bool,
    waiters: VecDeque<Waiter>,
    next_waiter_id: u64,
    blocked: usize,
}

struct Waiter {
    id: u64,
    waker: Waker,
}

impl Semaphore {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                held: false,
                waiters: VecDeque::new(),
                next_waiter_id: 0,
                blocked: 0,
            }),
            condvar: Condvar::new(),
        }
    }

    #[inline]
    pub(crate) fn is_held(&self) -> bool {
        sync::lock(&self.state).held
    }

    /// Take the permit if it is free, without waiting
    pub(crate) fn try_acquire(&self) -> bool {
        let mut state = sync::lock(&self.state);
        if state.held {
            return false;
        }
        state.held = true;
        true
    }

    /// Park the calling thread until the permit is taken
    pub(crate) fn acquire_blocking(&self) {
        let mut state = sync::lock(&self.state);
        if state.held {
            tracing::trace!("semaphore contended, blocking thread");
        }
        while state.held {
            state.blocked += 1;
            state = sync::wait(&self.condvar, state);
            state.blocked -= 1;
        }
        state.held = true;
    }

    /// Returns a handle that takes the permit when polled
    pub(crate) fn acquire(&self) -> Acquire<'_> {
        Acquire {
            semaphore: self,
            waiter_id: None,
        }
    }

    /// Return the permit and wake the next waiter of each kind
    pub(crate) fn release(&self) {
        let (waker, notify) = {
            let mut state = sync::lock(&self.state);
            debug_assert!(state.held, "released a semaphore that was not held");
            state.held = false;
            (state.waiters.pop_front().map(|w| w.waker), state.blocked > 0)
        };

        if let Some(waker) = waker {
            waker.wake();
        }
        if notify {
            self.condvar.notify_one();
        }
    }

    #[cfg(test)]
    fn queued(&self) -> usize {
        sync::lock(&self.state).waiters.len()
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = sync::lock(&self.state);
        f.debug_struct("Semaphore")
            .field("held", &state.held)
            .field("waiters", &state.waiters.len())
            .field("blocked", &state.blocked)
            .finish()
    }
}

/// Pending suspending acquisition
///
/// Dropping it before completion removes its queue entry. If a release had
/// already dequeued it, the wake-up is handed to the next waiter instead of
/// being lost.
///
/// 挂起中的获取操作
///
/// 在完成之前丢弃会移除其队列条目。若某次释放已将其出队，唤醒会转交给下一个等待者，
/// 而不会丢失。
pub(crate) struct Acquire<'a> {
    semaphore: &'a Semaphore,
    waiter_id: Option<u64>,
}

impl Acquire<'_> {
    pub(crate) fn poll_acquire(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = sync::lock(&self.semaphore.state);

        if !state.held {
            state.held = true;
            if let Some(id) = self.waiter_id.take() {
                state.waiters.retain(|w| w.id != id);
            }
            return Poll::Ready(());
        }

        if let Some(id) = self.waiter_id {
            if let Some(existing) = state.waiters.iter_mut().find(|w| w.id == id) {
                if !existing.waker.will_wake(cx.waker()) {
                    existing.waker.clone_from(cx.waker());
                }
                return Poll::Pending;
            }

            // Dequeued by a release but beaten to the permit: go back to the front.
            let id = state.next_waiter_id;
            state.next_waiter_id += 1;
            state.waiters.push_front(Waiter {
                id,
                waker: cx.waker().clone(),
            });
            self.waiter_id = Some(id);
            return Poll::Pending;
        }

        let id = state.next_waiter_id;
        state.next_waiter_id += 1;
        state.waiters.push_back(Waiter {
            id,
            waker: cx.waker().clone(),
        });
        self.waiter_id = Some(id);
        tracing::trace!(
            waiter = id,
            queued = state.waiters.len(),
            "semaphore contended, task queued"
        );
        Poll::Pending
    }

    /// Give up waiting; the permit is left untouched
    pub(crate) fn abandon(&mut self) {
        let Some(id) = self.waiter_id.take() else {
            return;
        };

        let (waker, notify) = {
            let mut state = sync::lock(&self.semaphore.state);
            let before = state.waiters.len();
            state.waiters.retain(|w| w.id != id);

            if state.waiters.len() != before || state.held {
                return;
            }

            // A release woke us for a permit we will never take. The next
            // waiter is dequeued the same way, so it passes the wake-up on
            // in turn if it also goes away.
            tracing::trace!(waiter = id, "passing wake-up to next waiter");
            (state.waiters.pop_front().map(|w| w.waker), state.blocked > 0)
        };

        if let Some(waker) = waker {
            waker.wake();
        }
        if notify {
            self.semaphore.condvar.notify_one();
        }
    }
}

impl Drop for Acquire<'_> {
    fn drop(&mut self) {
        self.abandon();
    }
}
