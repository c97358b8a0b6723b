//! Error types shared by the containers and the mutex.
//!
//! 容器与互斥锁共享的错误类型。

use std::borrow::Cow;
use std::fmt;

/// Error produced when a value is unwrapped from the wrong variant
///
/// Carries the caller-supplied message verbatim, or the fixed default
/// message of the `unwrap` family.
///
/// 从错误的变体中解包值时产生的错误
///
/// 原样携带调用方提供的消息，或 `unwrap` 系列的固定默认消息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapError {
    message: Cow<'static, str>,
}

impl UnwrapError {
    #[inline]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Turn the error into a panic carrying the message verbatim
    ///
    /// 将错误转换为原样携带消息的 panic
    #[cold]
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        panic!("{}", self.message)
    }

    /// Same as [`raise`](Self::raise), with the offending payload appended
    #[cold]
    #[track_caller]
    pub(crate) fn raise_with(self, payload: &dyn fmt::Debug) -> ! {
        panic!("{}: {:?}", self.message, payload)
    }
}

impl fmt::Display for UnwrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for UnwrapError {}

/// Error returned when a suspending lock acquisition fails
///
/// 挂起式加锁失败时返回的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// The cancellation token fired before the lock was acquired
    ///
    /// 在获取锁之前取消令牌已触发
    Cancelled,
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Cancelled => write!(f, "mutex lock cancelled"),
        }
    }
}

impl std::error::Error for LockError {}

/// Error returned from `try_lock` when the lock is held
///
/// 当锁已被持有时 `try_lock` 返回的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryLockError {
    /// Acquiring the lock would have to wait
    ///
    /// 获取锁需要等待
    WouldBlock,
}

impl fmt::Display for TryLockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryLockError::WouldBlock => write!(f, "the operation would block"),
        }
    }
}

impl std::error::Error for TryLockError {}

/// Error returned when a guard is accessed after it was released
///
/// This always denotes a bug at the call site.
///
/// 在释放后访问守卫时返回的错误
///
/// 这总是表示调用方存在缺陷。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasedError;

impl ReleasedError {
    pub(crate) const MESSAGE: &'static str = "mutex guard used after release";

    #[cold]
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        panic!("{}", Self::MESSAGE)
    }
}

impl fmt::Display for ReleasedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::MESSAGE)
    }
}

impl std::error::Error for ReleasedError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_error_keeps_message_verbatim() {
        let err = UnwrapError::new(String::from("no config loaded"));
        assert_eq!(err.message(), "no config loaded");
        assert_eq!(err.to_string(), "no config loaded");
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_unwrap_error_raise() {
        UnwrapError::new("boom").raise();
    }

    #[test]
    fn test_display() {
        assert_eq!(LockError::Cancelled.to_string(), "mutex lock cancelled");
        assert_eq!(TryLockError::WouldBlock.to_string(), "the operation would block");
        assert_eq!(ReleasedError.to_string(), "mutex guard used after release");
    }
}
