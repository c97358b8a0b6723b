//! Explicit success or failure of an operation.
//!
//! 显式表示操作的成功或失败。
//!
//! [`Result`] mirrors [`Option`](crate::Option) with two payload channels.
//! Combinators on the `Ok` channel never touch the `Err` payload and the other
//! way round; the `Err`-side closures of `map_or_else`/`unwrap_or_else` only
//! run when the result is an `Err`.
//!
//! [`Result`] 以双载荷通道镜像 [`Option`](crate::Option)。`Ok` 通道上的组合子
//! 永远不会触碰 `Err` 载荷，反之亦然。
//!
//! ```
//! use crab::result::{self, Result};
//!
//! fn parse(raw: &str) -> Result<u16, String> {
//!     raw.parse::<u16>().map_err(|e| e.to_string()).into()
//! }
//!
//! assert_eq!(parse("80").map(|p| p + 1).unwrap(), 81);
//! assert!(parse("eighty").is_err());
//! assert_eq!(parse("eighty").ok(), crab::option::none());
//! assert_eq!(result::ok::<u8, ()>(1).err().is_none(), true);
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::error::UnwrapError;
use crate::option::Option;

type StdOption<T> = core::option::Option<T>;
type StdResult<T, E> = core::result::Result<T, E>;

const UNWRAP_ERR: &str = "called `Result::unwrap()` on an `Err` value";
const UNWRAP_ERR_ON_OK: &str = "called `Result::unwrap_err()` on an `Ok` value";

/// Either a success value (`Ok`) or an error value (`Err`)
///
/// 成功值（`Ok`）或错误值（`Err`）之一
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use = "this `Result` may be an `Err` variant, which should be handled"]
pub enum Result<T, E> {
    /// Success value
    ///
    /// 成功值
    Ok(T),
    /// Error value
    ///
    /// 错误值
    Err(E),
}

/// Create an `Ok` result
///
/// 创建一个 `Ok` 结果
#[inline]
pub fn ok<T, E>(value: T) -> Result<T, E> {
    Result::Ok(value)
}

/// Create an `Err` result
///
/// 创建一个 `Err` 结果
#[inline]
pub fn err<T, E>(error: E) -> Result<T, E> {
    Result::Err(error)
}

/// Create a builder with `T` and `E` fixed ahead of use
///
/// 创建一个预先固定 `T` 与 `E` 的构建器
#[inline]
pub fn builder<T, E>() -> ResultBuilder<T, E> {
    ResultBuilder::new()
}

/// Zero-sized factory for results of one `T`/`E` pair
///
/// 单一 `T`/`E` 组合的零大小结果工厂
pub struct ResultBuilder<T, E> {
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E> ResultBuilder<T, E> {
    #[inline]
    const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn ok(&self, value: T) -> Result<T, E> {
        Result::Ok(value)
    }

    #[inline]
    pub fn err(&self, error: E) -> Result<T, E> {
        Result::Err(error)
    }
}

impl<T, E> Clone for ResultBuilder<T, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for ResultBuilder<T, E> {}

impl<T, E> fmt::Debug for ResultBuilder<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultBuilder").finish()
    }
}

impl<T, E> Result<T, E> {
    /// See [`builder`]
    #[inline]
    pub fn builder() -> ResultBuilder<T, E> {
        ResultBuilder::new()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Result::Ok(_))
    }

    #[inline]
    pub const fn is_err(&self) -> bool {
        !self.is_ok()
    }

    #[inline]
    pub const fn as_ref(&self) -> Result<&T, &E> {
        match self {
            Result::Ok(value) => Result::Ok(value),
            Result::Err(error) => Result::Err(error),
        }
    }

    #[inline]
    pub fn as_mut(&mut self) -> Result<&mut T, &mut E> {
        match self {
            Result::Ok(value) => Result::Ok(value),
            Result::Err(error) => Result::Err(error),
        }
    }

    // ------------------------------------------------------------------------
    // Unwrapping
    // ------------------------------------------------------------------------

    /// Return the `Ok` payload, panicking with `message` on `Err`
    ///
    /// 返回 `Ok` 载荷；若为 `Err` 则以 `message` panic
    ///
    /// # Panics
    ///
    /// Panics when the result is `Err`. The panic text is
    /// `"{message}: {error:?}"`, so it differs from the verbatim `message`
    /// carried by the [`UnwrapError`] of [`checked_expect`](Self::checked_expect),
    /// which is also the variant to use when `E` is not `Debug`.
    #[inline]
    #[track_caller]
    pub fn expect(self, message: &str) -> T
    where
        E: fmt::Debug,
    {
        match self {
            Result::Ok(value) => value,
            Result::Err(error) => UnwrapError::new(message.to_owned()).raise_with(&error),
        }
    }

    /// Return the `Err` payload, panicking with `message` on `Ok`
    ///
    /// 返回 `Err` 载荷；若为 `Ok` 则以 `message` panic
    ///
    /// # Panics
    ///
    /// Panics when the result is `Ok`, with the text `"{message}: {value:?}"`.
    /// [`checked_expect_err`](Self::checked_expect_err) reports `message`
    /// verbatim and needs no `T: Debug`.
    #[inline]
    #[track_caller]
    pub fn expect_err(self, message: &str) -> E
    where
        T: fmt::Debug,
    {
        match self {
            Result::Ok(value) => UnwrapError::new(message.to_owned()).raise_with(&value),
            Result::Err(error) => error,
        }
    }

    /// # Panics
    ///
    /// Panics when the result is `Err`, with the text
    /// ``"called `Result::unwrap()` on an `Err` value: {error:?}"``.
    /// [`checked_unwrap`](Self::checked_unwrap) returns the message alone.
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T
    where
        E: fmt::Debug,
    {
        match self {
            Result::Ok(value) => value,
            Result::Err(error) => UnwrapError::new(UNWRAP_ERR).raise_with(&error),
        }
    }

    /// # Panics
    ///
    /// Panics when the result is `Ok`, with the text
    /// ``"called `Result::unwrap_err()` on an `Ok` value: {value:?}"``.
    /// [`checked_unwrap_err`](Self::checked_unwrap_err) returns the message alone.
    #[inline]
    #[track_caller]
    pub fn unwrap_err(self) -> E
    where
        T: fmt::Debug,
    {
        match self {
            Result::Ok(value) => UnwrapError::new(UNWRAP_ERR_ON_OK).raise_with(&value),
            Result::Err(error) => error,
        }
    }

    /// Like [`expect`](Self::expect) but reports the failure as a value
    ///
    /// The error payload is dropped; the [`UnwrapError`] carries `message` only.
    #[inline]
    pub fn checked_expect(self, message: &str) -> StdResult<T, UnwrapError> {
        match self {
            Result::Ok(value) => Ok(value),
            Result::Err(_) => Err(UnwrapError::new(message.to_owned())),
        }
    }

    #[inline]
    pub fn checked_unwrap(self) -> StdResult<T, UnwrapError> {
        match self {
            Result::Ok(value) => Ok(value),
            Result::Err(_) => Err(UnwrapError::new(UNWRAP_ERR)),
        }
    }

    #[inline]
    pub fn checked_expect_err(self, message: &str) -> StdResult<E, UnwrapError> {
        match self {
            Result::Ok(_) => Err(UnwrapError::new(message.to_owned())),
            Result::Err(error) => Ok(error),
        }
    }

    #[inline]
    pub fn checked_unwrap_err(self) -> StdResult<E, UnwrapError> {
        match self {
            Result::Ok(_) => Err(UnwrapError::new(UNWRAP_ERR_ON_OK)),
            Result::Err(error) => Ok(error),
        }
    }

    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Result::Ok(value) => value,
            Result::Err(_) => default,
        }
    }

    #[inline]
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Result::Ok(value) => value,
            Result::Err(_) => T::default(),
        }
    }

    /// Return the `Ok` payload, or recover one from the error
    ///
    /// 返回 `Ok` 载荷，或从错误中恢复一个值
    #[inline]
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Result::Ok(value) => value,
            Result::Err(error) => f(error),
        }
    }

    /// Non-failing probe of the `Ok` channel
    ///
    /// 对 `Ok` 通道的不会失败的探测
    #[inline]
    pub fn try_unwrap(self) -> (bool, StdOption<T>) {
        match self {
            Result::Ok(value) => (true, Some(value)),
            Result::Err(_) => (false, None),
        }
    }

    /// Non-failing probe of the `Err` channel
    ///
    /// 对 `Err` 通道的不会失败的探测
    #[inline]
    pub fn try_unwrap_err(self) -> (bool, StdOption<E>) {
        match self {
            Result::Ok(_) => (false, None),
            Result::Err(error) => (true, Some(error)),
        }
    }

    // ------------------------------------------------------------------------
    // Transformation
    // ------------------------------------------------------------------------

    /// Transform the `Ok` payload, passing `Err` through untouched
    ///
    /// 转换 `Ok` 载荷，`Err` 原样传递
    #[inline]
    pub fn map<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Result::Ok(value) => Result::Ok(f(value)),
            Result::Err(error) => Result::Err(error),
        }
    }

    /// Transform the `Err` payload, passing `Ok` through untouched
    ///
    /// 转换 `Err` 载荷，`Ok` 原样传递
    #[inline]
    pub fn map_err<F2, O>(self, op: O) -> Result<T, F2>
    where
        O: FnOnce(E) -> F2,
    {
        match self {
            Result::Ok(value) => Result::Ok(value),
            Result::Err(error) => Result::Err(op(error)),
        }
    }

    #[inline]
    pub fn map_or<U, F>(self, default: U, f: F) -> U
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Result::Ok(value) => f(value),
            Result::Err(_) => default,
        }
    }

    /// Fold both channels into one value
    ///
    /// `default` receives the error; exactly one closure runs.
    ///
    /// 将两个通道折叠为一个值。`default` 接收错误；恰好执行一个闭包。
    #[inline]
    pub fn map_or_else<U, D, F>(self, default: D, f: F) -> U
    where
        D: FnOnce(E) -> U,
        F: FnOnce(T) -> U,
    {
        match self {
            Result::Ok(value) => f(value),
            Result::Err(error) => default(error),
        }
    }

    #[inline]
    pub fn inspect<F>(self, action: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Result::Ok(value) = &self {
            action(value);
        }
        self
    }

    #[inline]
    pub fn inspect_err<F>(self, action: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Result::Err(error) = &self {
            action(error);
        }
        self
    }

    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        match self {
            Result::Ok(value) => f(value),
            Result::Err(error) => Result::Err(error),
        }
    }

    #[inline]
    pub fn or_else<F2, O>(self, op: O) -> Result<T, F2>
    where
        O: FnOnce(E) -> Result<T, F2>,
    {
        match self {
            Result::Ok(value) => Result::Ok(value),
            Result::Err(error) => op(error),
        }
    }

    // ------------------------------------------------------------------------
    // Projection and conversion
    // ------------------------------------------------------------------------

    /// Project the `Ok` channel onto [`Option`]
    ///
    /// 将 `Ok` 通道投影到 [`Option`]
    #[inline]
    pub fn ok(self) -> Option<T> {
        match self {
            Result::Ok(value) => Option::Some(value),
            Result::Err(_) => Option::None,
        }
    }

    /// Project the `Err` channel onto [`Option`]
    ///
    /// 将 `Err` 通道投影到 [`Option`]
    #[inline]
    pub fn err(self) -> Option<E> {
        match self {
            Result::Ok(_) => Option::None,
            Result::Err(error) => Option::Some(error),
        }
    }

    #[inline]
    pub fn into_std(self) -> StdResult<T, E> {
        match self {
            Result::Ok(value) => Ok(value),
            Result::Err(error) => Err(error),
        }
    }
}

impl<T, E> Result<Result<T, E>, E> {
    /// Remove one level of nesting
    #[inline]
    pub fn flatten(self) -> Result<T, E> {
        match self {
            Result::Ok(inner) => inner,
            Result::Err(error) => Result::Err(error),
        }
    }
}

impl<T, E> From<StdResult<T, E>> for Result<T, E> {
    #[inline]
    fn from(value: StdResult<T, E>) -> Self {
        match value {
            Ok(value) => Result::Ok(value),
            Err(error) => Result::Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for StdResult<T, E> {
    #[inline]
    fn from(value: Result<T, E>) -> Self {
        value.into_std()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option;
    use std::cell::Cell;

    #[test]
    fn test_ok_and_err_tags() {
        let r = ok::<i32, &str>(1);
        assert!(r.is_ok());
        assert!(!r.is_err());
        assert_eq!(r.unwrap(), 1);

        let e = err::<i32, &str>("bad");
        assert!(e.is_err());
        assert_eq!(e.unwrap_err(), "bad");
    }

    #[test]
    #[should_panic(expected = "called `Result::unwrap()` on an `Err` value: \"bad\"")]
    fn test_unwrap_err_variant_panics() {
        err::<i32, &str>("bad").unwrap();
    }

    #[test]
    #[should_panic(expected = "called `Result::unwrap_err()` on an `Ok` value: 7")]
    fn test_unwrap_err_on_ok_panics() {
        ok::<i32, &str>(7).unwrap_err();
    }

    #[test]
    #[should_panic(expected = "config must load")]
    fn test_expect_reports_message() {
        err::<i32, &str>("missing file").expect("config must load");
    }

    #[test]
    #[should_panic(expected = "should have failed")]
    fn test_expect_err_reports_message() {
        ok::<i32, &str>(1).expect_err("should have failed");
    }

    #[test]
    fn test_checked_variants() {
        assert_eq!(ok::<i32, ()>(1).checked_unwrap(), Ok(1));
        assert_eq!(
            err::<i32, ()>(()).checked_expect("nope").unwrap_err().message(),
            "nope"
        );
        assert_eq!(err::<i32, u8>(2).checked_unwrap_err(), Ok(2));
        assert_eq!(
            ok::<i32, u8>(2).checked_unwrap_err().unwrap_err().message(),
            UNWRAP_ERR_ON_OK
        );
        assert_eq!(
            ok::<i32, u8>(2).checked_expect_err("want err").unwrap_err().message(),
            "want err"
        );
    }

    #[test]
    #[should_panic(expected = "config must load: \"missing file\"")]
    fn test_expect_panic_appends_payload() {
        err::<i32, &str>("missing file").expect("config must load");
    }

    #[test]
    fn test_checked_message_is_verbatim_without_debug() {
        struct Opaque;

        let error = err::<i32, Opaque>(Opaque).checked_expect("config must load").unwrap_err();
        assert_eq!(error.to_string(), "config must load");

        let error = ok::<Opaque, u8>(Opaque).checked_unwrap_err().unwrap_err();
        assert_eq!(error.to_string(), UNWRAP_ERR_ON_OK);
    }

    #[test]
    fn test_try_unwrap_probes() {
        assert_eq!(ok::<i32, &str>(1).try_unwrap(), (true, Some(1)));
        assert_eq!(err::<i32, &str>("x").try_unwrap(), (false, None));
        assert_eq!(err::<i32, &str>("x").try_unwrap_err(), (true, Some("x")));
        assert_eq!(ok::<i32, &str>(1).try_unwrap_err(), (false, None));
    }

    #[test]
    fn test_unwrap_alternatives() {
        assert_eq!(err::<i32, &str>("x").unwrap_or(3), 3);
        assert_eq!(err::<Vec<u8>, &str>("x").unwrap_or_default(), Vec::<u8>::new());
        assert_eq!(err::<usize, &str>("four").unwrap_or_else(str::len), 4);

        let calls = Cell::new(0);
        let v = ok::<i32, &str>(1).unwrap_or_else(|_| {
            calls.set(calls.get() + 1);
            0
        });
        assert_eq!(v, 1);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_channel_independence() {
        let calls = Cell::new(0);

        let r = ok::<i32, i32>(5).map_err(|e| {
            calls.set(calls.get() + 1);
            e * 100
        });
        assert_eq!(r, ok(5));
        assert_eq!(calls.get(), 0);

        let r = err::<i32, i32>(5).map(|v| {
            calls.set(calls.get() + 1);
            v * 100
        });
        assert_eq!(r, err(5));
        assert_eq!(calls.get(), 0);

        assert_eq!(ok::<i32, i32>(5).map(|v| v + 1), ok(6));
        assert_eq!(err::<i32, i32>(5).map_err(|e| e + 1), err(6));
    }

    #[test]
    fn test_map_or_family() {
        assert_eq!(ok::<&str, ()>("abc").map_or(0, str::len), 3);
        assert_eq!(err::<&str, ()>(()).map_or(0, str::len), 0);

        let folded = err::<i32, &str>("boom").map_or_else(|e| e.len() as i32, |v| v * 2);
        assert_eq!(folded, 4);
        let folded = ok::<i32, &str>(3).map_or_else(|e| e.len() as i32, |v| v * 2);
        assert_eq!(folded, 6);
    }

    #[test]
    fn test_inspect_probes() {
        let seen_ok = Cell::new(0);
        let seen_err = Cell::new(0);

        let r = ok::<i32, i32>(1)
            .inspect(|v| seen_ok.set(*v))
            .inspect_err(|e| seen_err.set(*e));
        assert_eq!(r, ok(1));
        assert_eq!((seen_ok.get(), seen_err.get()), (1, 0));

        let r = err::<i32, i32>(2)
            .inspect(|v| seen_ok.set(*v))
            .inspect_err(|e| seen_err.set(*e));
        assert_eq!(r, err(2));
        assert_eq!((seen_ok.get(), seen_err.get()), (1, 2));
    }

    #[test]
    fn test_projections_are_dual_to_ok_or() {
        assert_eq!(ok::<i32, &str>(1).ok(), option::some(1));
        assert_eq!(ok::<i32, &str>(1).err(), option::none());
        assert_eq!(err::<i32, &str>("e").ok(), option::none());
        assert_eq!(err::<i32, &str>("e").err(), option::some("e"));

        for v in [0, 1, 42] {
            assert_eq!(option::some(v).ok_or("e").ok().unwrap(), v);
        }
        assert_eq!(option::none::<i32>().ok_or("e").err().unwrap(), "e");

        // Round trip through the Ok channel keeps the value.
        let r = ok::<i32, &str>(9);
        assert_eq!(r.ok().ok_or("e"), r);
    }

    #[test]
    fn test_chaining_and_conversion() {
        let half = |v: i32| if v % 2 == 0 { ok(v / 2) } else { err("odd") };
        assert_eq!(ok::<i32, &str>(8).and_then(half).and_then(half), ok(2));
        assert_eq!(ok::<i32, &str>(6).and_then(half).and_then(half), err("odd"));
        assert_eq!(err::<i32, &str>("x").or_else(|_| ok::<i32, ()>(0)), ok(0));

        assert_eq!(ok::<Result<i32, &str>, &str>(ok(1)).flatten(), ok(1));
        assert_eq!(ok::<Result<i32, &str>, &str>(err("in")).flatten(), err("in"));

        let ours: Result<i32, String> = "12".parse::<i32>().map_err(|e| e.to_string()).into();
        assert_eq!(ours.as_ref().map(|v| *v), ok(12));
        let plain: StdResult<i32, String> = ours.into();
        assert_eq!(plain, Ok(12));
    }

    #[test]
    fn test_builder_fixes_types() {
        let b = builder::<u8, String>();
        assert_eq!(b.ok(1), ok(1));
        assert_eq!(b.err("e".into()), err(String::from("e")));
        assert!(Result::<u8, ()>::builder().err(()).is_err());
    }
}
