//! # crab
//!
//! Explicit `Option`/`Result` containers and a mutex for blocking and async code.
//!
//! 显式的 `Option`/`Result` 容器，以及可用于阻塞与异步代码的互斥锁。
//!
//! ## Overview / 概述
//!
//! `crab` provides two families of primitives. The first is a pair of closed,
//! two-variant containers with a law-consistent combinator algebra, plus
//! bridges that carry them across an `.await`. The second is an
//! exclusive-access lock that can be acquired by parking a thread or by
//! suspending a task, with cooperative cancellation.
//!
//! `crab` 提供两类原语。第一类是一对封闭的双变体容器，带有满足代数律的组合子，
//! 以及跨越 `.await` 传递它们的桥接。第二类是一个既可以阻塞线程、也可以挂起任务
//! 获取的独占访问锁，支持协作式取消。
//!
//! ## Modules / 模块
//!
//! ### [`option`]
//!
//! Presence or absence of a value. Construction via [`option::some`],
//! [`option::none`] or an [`option::OptionBuilder`]; every combinator is total
//! except the `expect`/`unwrap` family.
//!
//! 值的存在或缺失。除 `expect`/`unwrap` 系列外，所有组合子都是全函数。
//!
//! ### [`result`]
//!
//! Success or failure of an operation, with independent `Ok` and `Err`
//! channels and projections back onto [`Option`].
//!
//! 操作的成功或失败，`Ok` 与 `Err` 通道相互独立，并可投影回 [`Option`]。
//!
//! ### [`transpose`]
//!
//! Turn `Option<impl Future>` into `impl Future<Output = Option<_>>`, and the
//! same for `Result`, without adding a suspension point.
//!
//! 将 `Option<impl Future>` 转换为 `impl Future<Output = Option<_>>`，`Result`
//! 同理，且不引入新的挂起点。
//!
//! ### [`sync`]
//!
//! [`sync::Mutex`] with blocking, suspending and cancellable acquisition, and
//! the [`sync::CancellationToken`] it observes.
//!
//! 支持阻塞、挂起与可取消获取的 [`sync::Mutex`]，及其观察的
//! [`sync::CancellationToken`]。
//!
//! ### [`error`]
//!
//! The error values of the crate.
//!
//! ## Examples / 示例
//!
//! ### Composing containers
//!
//! ```
//! use crab::option;
//! use crab::result::Result;
//!
//! fn lookup(id: u32) -> crab::Option<&'static str> {
//!     if id == 1 { option::some("ferris") } else { option::none() }
//! }
//!
//! let found: Result<&str, String> = lookup(1).ok_or_else(|| String::from("unknown id"));
//! assert_eq!(found.map(str::len).unwrap(), 6);
//!
//! let missing = lookup(2).ok_or("unknown id");
//! assert_eq!(missing.err(), option::some("unknown id"));
//! ```
//!
//! ### Crossing an await point
//!
//! ```
//! use crab::option;
//! use crab::transpose::TransposeOption;
//!
//! # tokio_test::block_on(async {
//! let maybe_fetch = option::some(async { 42 });
//! assert_eq!(maybe_fetch.transpose_future().await, option::some(42));
//! # });
//! ```
//!
//! ### Sharing state
//!
//! ```
//! use crab::sync::Mutex;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let counter = Arc::new(Mutex::new(0));
//! let workers: Vec<_> = (0..4)
//!     .map(|_| {
//!         let counter = counter.clone();
//!         thread::spawn(move || {
//!             for _ in 0..100 {
//!                 *counter.lock() += 1;
//!             }
//!         })
//!     })
//!     .collect();
//! for worker in workers {
//!     worker.join().unwrap();
//! }
//! assert_eq!(counter.get(), 400);
//! ```
//!
//! ## Safety / 安全性
//!
//! The mutex uses `unsafe` internally to hand out references to the guarded
//! value, but exposes a safe API. Safety rests on:
//!
//! 互斥锁在内部使用 `unsafe` 来提供受保护值的引用，但暴露安全的 API。
//! 安全性基于：
//!
//! - A binary semaphore admitting one guard at a time
//! - Guards borrowing the mutex, so the mutex outlives every guard
//! - Release exactly once, via an idempotent flag checked on every access
//! - `loom` model tests of the acquisition and cancellation paths
//!
//! - 每次只允许一个守卫的二元信号量
//! - 守卫借用互斥锁，因此互斥锁比所有守卫存活更久
//! - 通过每次访问都会检查的幂等标志保证恰好释放一次
//! - 对获取与取消路径的 `loom` 模型测试

mod shim;

pub mod error;
pub mod option;
pub mod result;
pub mod sync;
pub mod transpose;

pub use option::Option;
pub use result::Result;
