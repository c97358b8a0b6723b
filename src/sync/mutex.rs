//! Mutual exclusion usable from both blocking and async code.
//!
//! 可同时用于阻塞代码与异步代码的互斥锁。
//!
//! # Design
//!
//! One binary semaphore guards one value. [`Mutex::lock`] parks the calling
//! thread, [`Mutex::lock_async`] and [`Mutex::lock_async_with`] suspend only
//! the task. Every path hands out the same [`MutexGuard`], which releases the
//! permit exactly once: either through [`MutexGuard::release`] or when it is
//! dropped, including while unwinding from a panic. A panic inside a guarded
//! region therefore never leaves the mutex held, and there is no poisoning.
//!
//! 一个二元信号量保护一个值。[`Mutex::lock`] 阻塞调用线程，
//! [`Mutex::lock_async`] 与 [`Mutex::lock_async_with`] 只挂起任务。所有路径都返回
//! 同一种 [`MutexGuard`]，它恰好释放许可一次：通过 [`MutexGuard::release`]，
//! 或在被丢弃时（包括 panic 展开期间）。因此受保护区域内的 panic 不会让互斥锁
//! 保持持有状态，也不存在中毒机制。
//!
//! # Cancellation
//!
//! [`Mutex::lock_async_with`] checks its [`CancellationToken`] before every
//! acquisition attempt, in the same poll that would take the permit. The
//! outcome is either `Err(LockError::Cancelled)` with the mutex untouched, or
//! a guard the caller must release as usual.
//!
//! [`Mutex::lock_async_with`] 在每次尝试获取之前、于同一次 poll 中检查其
//! [`CancellationToken`]。结果要么是 `Err(LockError::Cancelled)` 且互斥锁未被触碰，
//! 要么是调用方需照常释放的守卫。

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;
use std::task::{Context, Poll};

use super::cancel::CancellationToken;
use super::semaphore::{Acquire, Semaphore};
use crate::error::{LockError, ReleasedError, TryLockError};
use crate::shim::cell::UnsafeCell;

/// A mutual exclusion lock around one value
///
/// 包裹一个值的互斥锁
///
/// ```
/// use crab::sync::Mutex;
///
/// let list = Mutex::new(vec![1, 2, 3]);
/// {
///     let mut guard = list.lock();
///     guard.push(4);
/// }
/// assert_eq!(list.get(), vec![1, 2, 3, 4]);
/// ```
pub struct Mutex<T> {
    semaphore: Semaphore,
    value: UnsafeCell<T>,
}

// SAFETY: the value is only reachable through a guard, and the semaphore
// admits one guard at a time.
unsafe impl<T: Send> Send for Mutex<T> {}
unsafe impl<T: Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    /// Creates a new, unlocked mutex wrapping `value`
    ///
    /// 创建一个包裹 `value` 的未加锁互斥锁
    pub fn new(value: T) -> Self {
        Self {
            semaphore: Semaphore::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Block the current thread until the lock is acquired
    ///
    /// Do not call this from an async task; use [`lock_async`](Self::lock_async).
    ///
    /// 阻塞当前线程直到获取锁。不要在异步任务中调用，请使用
    /// [`lock_async`](Self::lock_async)。
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.semaphore.acquire_blocking();
        MutexGuard::new(self)
    }

    /// Acquire the lock only if it is free right now
    ///
    /// # Errors
    ///
    /// Returns [`TryLockError::WouldBlock`] if another guard is live.
    pub fn try_lock(&self) -> Result<MutexGuard<'_, T>, TryLockError> {
        if self.semaphore.try_acquire() {
            Ok(MutexGuard::new(self))
        } else {
            Err(TryLockError::WouldBlock)
        }
    }

    /// Suspend the current task until the lock is acquired
    ///
    /// 挂起当前任务直到获取锁
    ///
    /// ```
    /// use crab::sync::Mutex;
    ///
    /// # tokio_test::block_on(async {
    /// let counter = Mutex::new(0);
    /// *counter.lock_async().await += 1;
    /// assert_eq!(counter.get(), 1);
    /// # });
    /// ```
    pub fn lock_async(&self) -> LockFuture<'_, T> {
        LockFuture {
            mutex: self,
            acquire: self.semaphore.acquire(),
        }
    }

    /// Suspend the current task until the lock is acquired or `cancel` fires
    ///
    /// 挂起当前任务直到获取锁或 `cancel` 触发
    ///
    /// # Errors
    ///
    /// Resolves to [`LockError::Cancelled`] if the token is cancelled before
    /// the lock is taken. The mutex is left exactly as it was.
    ///
    /// ```
    /// use crab::error::LockError;
    /// use crab::sync::{CancellationToken, Mutex};
    ///
    /// # tokio_test::block_on(async {
    /// let mutex = Mutex::new(());
    /// let token = CancellationToken::new();
    /// let held = mutex.lock();
    ///
    /// token.cancel();
    /// let err = mutex.lock_async_with(&token).await.unwrap_err();
    /// assert_eq!(err, LockError::Cancelled);
    /// drop(held);
    /// assert!(!mutex.is_locked());
    /// # });
    /// ```
    pub fn lock_async_with<'a>(
        &'a self,
        cancel: &'a CancellationToken,
    ) -> CancellableLockFuture<'a, T> {
        CancellableLockFuture {
            mutex: self,
            acquire: self.semaphore.acquire(),
            token: cancel,
            token_slot: None,
        }
    }

    /// Whether a guard is currently live
    ///
    /// The answer may be stale by the time it is read.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.semaphore.is_held()
    }

    /// Exclusive access without locking; the borrow proves no guard exists
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    // ------------------------------------------------------------------------
    // Blocking convenience operations
    // ------------------------------------------------------------------------

    /// Lock, clone the value, unlock
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.lock().value().clone()
    }

    /// Lock, replace the value, unlock; returns the new value
    pub fn set(&self, value: T) -> T
    where
        T: Clone,
    {
        let mut guard = self.lock();
        guard.set_value(value);
        guard.value().clone()
    }

    /// Lock, replace the value with `mutate(&current)`, unlock; returns the new value
    ///
    /// 加锁，用 `mutate(&current)` 替换值，解锁；返回新值
    pub fn update<F>(&self, mutate: F) -> T
    where
        T: Clone,
        F: FnOnce(&T) -> T,
    {
        let mut guard = self.lock();
        let next = mutate(guard.value());
        guard.set_value(next);
        guard.value().clone()
    }

    /// Lock, compute `f(&value)`, unlock
    pub fn map<U, F>(&self, f: F) -> U
    where
        F: FnOnce(&T) -> U,
    {
        f(self.lock().value())
    }

    /// Lock, run `f(&mut value)`, unlock
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(self.lock().value_mut())
    }

    // ------------------------------------------------------------------------
    // Suspending convenience operations
    // ------------------------------------------------------------------------

    /// Suspend until locked, clone the value, unlock
    pub async fn get_async(&self) -> T
    where
        T: Clone,
    {
        self.lock_async().await.value().clone()
    }

    /// Suspend until locked, replace the value, unlock; returns the new value
    pub async fn set_async(&self, value: T) -> T
    where
        T: Clone,
    {
        let mut guard = self.lock_async().await;
        guard.set_value(value);
        guard.value().clone()
    }

    /// Suspend until locked, replace the value with `mutate(&current)`, unlock
    ///
    /// 挂起直到加锁，用 `mutate(&current)` 替换值，解锁；返回新值
    pub async fn update_async<F>(&self, mutate: F) -> T
    where
        T: Clone,
        F: FnOnce(&T) -> T,
    {
        let mut guard = self.lock_async().await;
        let next = mutate(guard.value());
        guard.set_value(next);
        guard.value().clone()
    }

    pub async fn map_async<U, F>(&self, f: F) -> U
    where
        F: FnOnce(&T) -> U,
    {
        f(self.lock_async().await.value())
    }

    pub async fn with_async<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(self.lock_async().await.value_mut())
    }

    // ------------------------------------------------------------------------
    // Cancellable convenience operations
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// [`LockError::Cancelled`] if `cancel` fires before the lock is taken.
    pub async fn get_async_with(&self, cancel: &CancellationToken) -> Result<T, LockError>
    where
        T: Clone,
    {
        let guard = self.lock_async_with(cancel).await?;
        Ok(guard.value().clone())
    }

    /// # Errors
    ///
    /// [`LockError::Cancelled`] if `cancel` fires before the lock is taken;
    /// `value` is dropped in that case.
    pub async fn set_async_with(
        &self,
        value: T,
        cancel: &CancellationToken,
    ) -> Result<T, LockError>
    where
        T: Clone,
    {
        let mut guard = self.lock_async_with(cancel).await?;
        guard.set_value(value);
        Ok(guard.value().clone())
    }

    /// # Errors
    ///
    /// [`LockError::Cancelled`] if `cancel` fires before the lock is taken;
    /// `mutate` is never called in that case.
    pub async fn update_async_with<F>(
        &self,
        mutate: F,
        cancel: &CancellationToken,
    ) -> Result<T, LockError>
    where
        T: Clone,
        F: FnOnce(&T) -> T,
    {
        let mut guard = self.lock_async_with(cancel).await?;
        let next = mutate(guard.value());
        guard.set_value(next);
        Ok(guard.value().clone())
    }

    /// # Errors
    ///
    /// [`LockError::Cancelled`] if `cancel` fires before the lock is taken.
    pub async fn map_async_with<U, F>(
        &self,
        f: F,
        cancel: &CancellationToken,
    ) -> Result<U, LockError>
    where
        F: FnOnce(&T) -> U,
    {
        let guard = self.lock_async_with(cancel).await?;
        Ok(f(guard.value()))
    }

    /// # Errors
    ///
    /// [`LockError::Cancelled`] if `cancel` fires before the lock is taken.
    pub async fn with_async_with<R, F>(
        &self,
        f: F,
        cancel: &CancellationToken,
    ) -> Result<R, LockError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.lock_async_with(cancel).await?;
        Ok(f(guard.value_mut()))
    }
}

impl<T: Default> Default for Mutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Mutex<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Mutex");
        match self.try_lock() {
            Ok(guard) => d.field("value", guard.value()),
            Err(_) => d.field("value", &format_args!("<locked>")),
        };
        d.finish()
    }
}

// ============================================================================
// Lock futures
// ============================================================================

/// Future returned by [`Mutex::lock_async`]
///
/// Dropping it before completion gives up the place in the queue.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct LockFuture<'a, T> {
    mutex: &'a Mutex<T>,
    acquire: Acquire<'a>,
}

impl<'a, T> Future for LockFuture<'a, T> {
    type Output = MutexGuard<'a, T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.acquire.poll_acquire(cx) {
            Poll::Ready(()) => Poll::Ready(MutexGuard::new(this.mutex)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> fmt::Debug for LockFuture<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFuture").finish_non_exhaustive()
    }
}

/// Future returned by [`Mutex::lock_async_with`]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct CancellableLockFuture<'a, T> {
    mutex: &'a Mutex<T>,
    acquire: Acquire<'a>,
    token: &'a CancellationToken,
    token_slot: Option<u64>,
}

impl<T> CancellableLockFuture<'_, T> {
    /// Leave the wait queue without touching the permit
    fn give_up(&mut self) -> LockError {
        self.acquire.abandon();
        self.token.deregister(&mut self.token_slot);
        tracing::trace!("mutex acquisition cancelled");
        LockError::Cancelled
    }
}

impl<'a, T> Future for CancellableLockFuture<'a, T> {
    type Output = Result<MutexGuard<'a, T>, LockError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.token.is_cancelled() {
            return Poll::Ready(Err(this.give_up()));
        }

        if let Poll::Ready(()) = this.acquire.poll_acquire(cx) {
            this.token.deregister(&mut this.token_slot);
            return Poll::Ready(Ok(MutexGuard::new(this.mutex)));
        }

        this.token.register(&mut this.token_slot, cx.waker());

        // The token may have fired between the first check and registration.
        if this.token.is_cancelled() {
            return Poll::Ready(Err(this.give_up()));
        }

        Poll::Pending
    }
}

impl<T> Drop for CancellableLockFuture<'_, T> {
    fn drop(&mut self) {
        self.token.deregister(&mut self.token_slot);
    }
}

impl<T> fmt::Debug for CancellableLockFuture<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellableLockFuture")
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MutexGuard
// ============================================================================

/// Exclusive access to the value of a [`Mutex`]
///
/// The lock is released by [`release`](Self::release) or on drop, whichever
/// comes first. Accessing the value after an explicit release panics.
///
/// 对 [`Mutex`] 值的独占访问
///
/// 通过 [`release`](Self::release) 或在丢弃时释放锁，以先发生者为准。
/// 显式释放后访问值会 panic。
#[must_use = "if unused the mutex will immediately unlock"]
pub struct MutexGuard<'a, T> {
    mutex: &'a Mutex<T>,
    released: bool,
    // Shares `&mut T` auto traits: Sync only when `T: Sync`.
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> MutexGuard<'a, T> {
    #[inline]
    fn new(mutex: &'a Mutex<T>) -> Self {
        Self {
            mutex,
            released: false,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// # Errors
    ///
    /// [`ReleasedError`] after [`release`](Self::release).
    #[inline]
    pub fn try_value(&self) -> Result<&T, ReleasedError> {
        if self.released {
            return Err(ReleasedError);
        }
        // SAFETY: this guard holds the permit, so no other reference exists.
        Ok(self.mutex.value.with(|ptr| unsafe { &*ptr }))
    }

    /// # Errors
    ///
    /// [`ReleasedError`] after [`release`](Self::release).
    #[inline]
    pub fn try_value_mut(&mut self) -> Result<&mut T, ReleasedError> {
        if self.released {
            return Err(ReleasedError);
        }
        // SAFETY: this guard holds the permit, so no other reference exists.
        Ok(self.mutex.value.with_mut(|ptr| unsafe { &mut *ptr }))
    }

    /// # Panics
    ///
    /// Panics after [`release`](Self::release).
    #[inline]
    #[track_caller]
    pub fn value(&self) -> &T {
        match self.try_value() {
            Ok(value) => value,
            Err(err) => err.raise(),
        }
    }

    /// # Panics
    ///
    /// Panics after [`release`](Self::release).
    #[inline]
    #[track_caller]
    pub fn value_mut(&mut self) -> &mut T {
        match self.try_value_mut() {
            Ok(value) => value,
            Err(err) => err.raise(),
        }
    }

    /// # Panics
    ///
    /// Panics after [`release`](Self::release).
    #[inline]
    #[track_caller]
    pub fn set_value(&mut self, value: T) {
        *self.value_mut() = value;
    }

    /// Swap in `value`, returning the previous one
    ///
    /// # Panics
    ///
    /// Panics after [`release`](Self::release).
    #[inline]
    #[track_caller]
    pub fn replace(&mut self, value: T) -> T {
        std::mem::replace(self.value_mut(), value)
    }

    /// Release the lock now
    ///
    /// Idempotent: later calls, and the eventual drop, do nothing.
    ///
    /// 立即释放锁。幂等：之后的调用以及最终的丢弃都不做任何事。
    pub fn release(&mut self) {
        if self.released {
            tracing::trace!("mutex guard released twice");
            return;
        }
        self.released = true;
        self.mutex.semaphore.release();
    }
}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.value()
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        self.value_mut()
    }
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            self.mutex.semaphore.release();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MutexGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_value() {
            Ok(value) => f.debug_struct("MutexGuard").field("value", value).finish(),
            Err(_) => f.debug_struct("MutexGuard").field("released", &true).finish(),
        }
    }
}
