//! Swap the nesting of an [`Option`]/[`Result`] around a pending future.
//!
//! 交换 [`Option`]/[`Result`] 与挂起 future 之间的嵌套顺序。
//!
//! `Option<F>` becomes a future of `Option<F::Output>` and `Result<F, E>` a
//! future of `Result<F::Output, E>`. The only suspension point is the inner
//! future itself: a `None` or `Err` completes on the first poll without
//! polling anything.
//!
//! `Option<F>` 变为 `Option<F::Output>` 的 future，`Result<F, E>` 变为
//! `Result<F::Output, E>` 的 future。唯一的挂起点是内部 future 本身：
//! `None` 或 `Err` 会在首次 poll 时直接完成。
//!
//! ```
//! use crab::option;
//! use crab::result;
//! use crab::transpose::{TransposeOption, TransposeResult};
//!
//! # tokio_test::block_on(async {
//! let fetched = option::some(async { 7 }).transpose_future().await;
//! assert_eq!(fetched, option::some(7));
//!
//! let skipped = option::none::<std::future::Ready<i32>>().transpose_future().await;
//! assert!(skipped.is_none());
//!
//! let failed = result::err::<std::future::Ready<i32>, _>("offline").transpose_future().await;
//! assert_eq!(failed, result::err("offline"));
//! # });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use pin_project::pin_project;

use crate::option::Option;
use crate::result::Result;

/// Transpose `Option<F>` into a future of `Option<F::Output>`
///
/// 将 `Option<F>` 转置为 `Option<F::Output>` 的 future
pub trait TransposeOption {
    type Future: Future;

    fn transpose_future(self) -> Self::Future;
}

impl<F: Future> TransposeOption for Option<F> {
    type Future = OptionFuture<F>;

    #[inline]
    fn transpose_future(self) -> OptionFuture<F> {
        option(self)
    }
}

/// Transpose `Result<F, E>` into a future of `Result<F::Output, E>`
///
/// 将 `Result<F, E>` 转置为 `Result<F::Output, E>` 的 future
pub trait TransposeResult {
    type Future: Future;

    fn transpose_future(self) -> Self::Future;
}

impl<F: Future, E> TransposeResult for Result<F, E> {
    type Future = ResultFuture<F, E>;

    #[inline]
    fn transpose_future(self) -> ResultFuture<F, E> {
        result(self)
    }
}

/// Free-function form of [`TransposeOption::transpose_future`]
#[inline]
pub fn option<F: Future>(opt: Option<F>) -> OptionFuture<F> {
    let state = match opt {
        Option::Some(future) => OptionState::Pending(future),
        Option::None => OptionState::Ready,
    };
    OptionFuture { state }
}

/// Free-function form of [`TransposeResult::transpose_future`]
#[inline]
pub fn result<F: Future, E>(res: Result<F, E>) -> ResultFuture<F, E> {
    let state = match res {
        Result::Ok(future) => ResultState::Pending(future),
        Result::Err(error) => ResultState::Failed(error),
    };
    ResultFuture { state }
}

// ============================================================================
// OptionFuture
// ============================================================================

/// Future returned by [`TransposeOption::transpose_future`]
///
/// # Panics
///
/// Polling after completion panics.
#[pin_project]
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct OptionFuture<F> {
    #[pin]
    state: OptionState<F>,
}

#[pin_project(project = OptionStateProj, project_replace = OptionStateProjReplace)]
#[derive(Debug)]
enum OptionState<F> {
    Pending(#[pin] F),
    Ready,
    Done,
}

impl<F: Future> Future for OptionFuture<F> {
    type Output = Option<F::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.project().state;
        match state.as_mut().project() {
            OptionStateProj::Pending(future) => {
                let value = match future.poll(cx) {
                    Poll::Ready(value) => value,
                    Poll::Pending => return Poll::Pending,
                };
                state.project_replace(OptionState::Done);
                Poll::Ready(Option::Some(value))
            }
            OptionStateProj::Ready => {
                state.project_replace(OptionState::Done);
                Poll::Ready(Option::None)
            }
            OptionStateProj::Done => panic!("`OptionFuture` polled after completion"),
        }
    }
}

// ============================================================================
// ResultFuture
// ============================================================================

/// Future returned by [`TransposeResult::transpose_future`]
///
/// # Panics
///
/// Polling after completion panics.
#[pin_project]
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ResultFuture<F, E> {
    #[pin]
    state: ResultState<F, E>,
}

#[pin_project(project = ResultStateProj, project_replace = ResultStateProjReplace)]
#[derive(Debug)]
enum ResultState<F, E> {
    Pending(#[pin] F),
    Failed(E),
    Done,
}

impl<F: Future, E> Future for ResultFuture<F, E> {
    type Output = Result<F::Output, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.project().state;
        match state.as_mut().project() {
            ResultStateProj::Pending(future) => {
                let value = match future.poll(cx) {
                    Poll::Ready(value) => value,
                    Poll::Pending => return Poll::Pending,
                };
                state.project_replace(ResultState::Done);
                Poll::Ready(Result::Ok(value))
            }
            ResultStateProj::Failed(_) => match state.project_replace(ResultState::Done) {
                ResultStateProjReplace::Failed(error) => Poll::Ready(Result::Err(error)),
                _ => unreachable!(),
            },
            ResultStateProj::Done => panic!("`ResultFuture` polled after completion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{option, result};
    use futures::task::noop_waker;
    use std::cell::Cell;
    use std::future::{pending, ready};

    fn poll_once<Fut: Future>(future: Pin<&mut Fut>) -> Poll<Fut::Output> {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        future.poll(&mut cx)
    }

    #[test]
    fn test_none_is_ready_on_first_poll() {
        let mut fut = Box::pin(option::none::<std::future::Pending<i32>>().transpose_future());
        assert_eq!(poll_once(fut.as_mut()), Poll::Ready(option::none()));
    }

    #[test]
    fn test_err_is_ready_on_first_poll() {
        let mut fut =
            Box::pin(result::err::<std::future::Pending<i32>, _>("down").transpose_future());
        assert_eq!(poll_once(fut.as_mut()), Poll::Ready(result::err("down")));
    }

    #[test]
    fn test_some_waits_for_inner_future() {
        let mut fut = Box::pin(option::some(pending::<i32>()).transpose_future());
        assert_eq!(poll_once(fut.as_mut()), Poll::Pending);
        assert_eq!(poll_once(fut.as_mut()), Poll::Pending);
    }

    #[test]
    fn test_some_resolves_to_some() {
        let out = futures::executor::block_on(option::some(ready(5)).transpose_future());
        assert_eq!(out, option::some(5));
    }

    #[test]
    fn test_ok_resolves_to_ok() {
        let out = futures::executor::block_on(super::result(
            result::ok::<_, &str>(async { "done" }),
        ));
        assert_eq!(out, result::ok("done"));
    }

    #[test]
    fn test_inner_future_polled_once_when_ready() {
        let polls = Cell::new(0);
        let inner = std::future::poll_fn(|_| {
            polls.set(polls.get() + 1);
            Poll::Ready(1)
        });
        let out = futures::executor::block_on(super::option(option::some(inner)));
        assert_eq!(out, option::some(1));
        assert_eq!(polls.get(), 1);
    }

    #[test]
    fn test_inner_failure_passes_through() {
        let inner = ready(core::result::Result::<i32, &str>::Err("io"));
        let out = futures::executor::block_on(option::some(inner).transpose_future());
        assert_eq!(out, option::some(Err("io")));
    }

    #[test]
    #[should_panic(expected = "polled after completion")]
    fn test_poll_after_completion_panics() {
        let mut fut = Box::pin(option::none::<std::future::Ready<i32>>().transpose_future());
        let _ = poll_once(fut.as_mut());
        let _ = poll_once(fut.as_mut());
    }

    #[test]
    #[should_panic(expected = "`ResultFuture` polled after completion")]
    fn test_err_poll_after_completion_panics() {
        let mut fut = Box::pin(result::err::<std::future::Ready<i32>, _>(1u8).transpose_future());
        assert_eq!(poll_once(fut.as_mut()), Poll::Ready(result::err(1u8)));
        let _ = poll_once(fut.as_mut());
    }

    #[tokio::test]
    async fn test_round_trip_across_tasks() {
        let (tx, rx) = tokio::sync::oneshot::channel::<u32>();
        let handle = tokio::spawn(async move { option::some(rx).transpose_future().await });
        tx.send(11).unwrap();
        let out = handle.await.unwrap();
        assert_eq!(out.map(|r| r.unwrap()), option::some(11));
    }
}
