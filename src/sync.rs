//! Exclusive access to shared state from blocking and async code
//!
//! This module provides a [`Mutex`] that can be locked by parking a thread
//! ([`Mutex::lock`]) or by suspending a task ([`Mutex::lock_async`],
//! [`Mutex::lock_async_with`]), and the [`CancellationToken`] observed by
//! cancellable acquisition.
//!
//! 阻塞代码与异步代码对共享状态的独占访问
//!
//! 此模块提供一个既可以通过阻塞线程（[`Mutex::lock`]）加锁，也可以通过挂起任务
//! （[`Mutex::lock_async`]、[`Mutex::lock_async_with`]）加锁的 [`Mutex`]，
//! 以及可取消获取所观察的 [`CancellationToken`]。
//!
//! # Guarantees | 保证
//!
//! - At most one [`MutexGuard`] is live at a time
//! - Every guard releases exactly once, on every exit path including panics
//! - A cancelled acquisition never leaves the mutex held
//! - Waiters are not served in a strict global order, but every waiter is
//!   eventually served as long as guards are eventually released
//!
//! - 任意时刻最多存在一个 [`MutexGuard`]
//! - 每个守卫在所有退出路径（包括 panic）上恰好释放一次
//! - 被取消的获取永远不会使互斥锁保持持有
//! - 等待者不按严格的全局顺序获得服务，但只要守卫最终被释放，每个等待者最终都会获得锁
//!
//! # Example
//!
//! ```
//! use crab::sync::{CancellationToken, Mutex};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let shared = Arc::new(Mutex::new(0u32));
//! let token = CancellationToken::new();
//!
//! let mut handles = Vec::new();
//! for _ in 0..4 {
//!     let shared = shared.clone();
//!     let token = token.clone();
//!     handles.push(tokio::spawn(async move {
//!         shared.update_async_with(|v| v + 1, &token).await
//!     }));
//! }
//! for handle in handles {
//!     handle.await.unwrap().unwrap();
//! }
//! assert_eq!(shared.get(), 4);
//! # });
//! ```

mod cancel;
mod mutex;
mod semaphore;

pub use cancel::{CancellationToken, Cancelled};
pub use mutex::{CancellableLockFuture, LockFuture, Mutex, MutexGuard};
