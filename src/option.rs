//! Explicit presence or absence of a value.
//!
//! 显式表示值的存在或缺失。
//!
//! [`Option`] is a closed two-variant container. Every combinator consumes the
//! option and builds a new one, so a constructed value is never mutated in
//! place. Combinators that take a closure invoke it at most once, and only on
//! the branch they document.
//!
//! [`Option`] 是一个封闭的双变体容器。每个组合子都会消费该 option 并构建新值，
//! 因此已构造的值永远不会被原地修改。接受闭包的组合子最多调用一次闭包，
//! 且只在其文档说明的分支上调用。
//!
//! # Example
//!
//! ```
//! use crab::option::{self, Option};
//!
//! let port: Option<u16> = option::some(8080);
//! let label = port
//!     .inspect(|p| assert_eq!(*p, 8080))
//!     .map(|p| format!(":{p}"))
//!     .unwrap_or_else(|| String::from("<unset>"));
//! assert_eq!(label, ":8080");
//!
//! let missing = Option::<u16>::None;
//! assert_eq!(missing.ok_or("no port").unwrap_err(), "no port");
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::error::UnwrapError;
use crate::result::Result;

type StdOption<T> = core::option::Option<T>;
type StdResult<T, E> = core::result::Result<T, E>;

const UNWRAP_NONE: &str = "called `Option::unwrap()` on a `None` value";

/// A value that is either present (`Some`) or absent (`None`)
///
/// 一个存在（`Some`）或缺失（`None`）的值
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub enum Option<T> {
    /// No value
    ///
    /// 无值
    #[default]
    None,
    /// Some value of type `T`
    ///
    /// 类型为 `T` 的值
    Some(T),
}

/// Create a `Some` option
///
/// 创建一个 `Some` option
#[inline]
pub fn some<T>(value: T) -> Option<T> {
    Option::Some(value)
}

/// Create a `None` option
///
/// 创建一个 `None` option
#[inline]
pub fn none<T>() -> Option<T> {
    Option::None
}

/// Create a builder with `T` fixed ahead of use
///
/// 创建一个预先固定 `T` 的构建器
#[inline]
pub fn builder<T>() -> OptionBuilder<T> {
    OptionBuilder::new()
}

/// Zero-sized factory for options of one payload type
///
/// Useful when the payload type cannot be inferred at each construction site,
/// e.g. when `some` is passed around as a function value.
///
/// 单一载荷类型的零大小 option 工厂
///
/// ```
/// use crab::option;
///
/// let b = option::builder::<u32>();
/// let parsed: Vec<_> = ["1", "x", "3"]
///     .iter()
///     .map(|s| s.parse().ok().map_or_else(|| b.none(), |v| b.some(v)))
///     .collect();
/// assert_eq!(parsed, vec![b.some(1), b.none(), b.some(3)]);
/// ```
pub struct OptionBuilder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> OptionBuilder<T> {
    #[inline]
    const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn some(&self, value: T) -> Option<T> {
        Option::Some(value)
    }

    #[inline]
    pub fn none(&self) -> Option<T> {
        Option::None
    }
}

impl<T> Clone for OptionBuilder<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for OptionBuilder<T> {}

impl<T> fmt::Debug for OptionBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionBuilder").finish()
    }
}

impl<T> Option<T> {
    /// See [`builder`]
    #[inline]
    pub fn builder() -> OptionBuilder<T> {
        OptionBuilder::new()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[inline]
    pub const fn is_some(&self) -> bool {
        matches!(self, Option::Some(_))
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        !self.is_some()
    }

    #[inline]
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Option::Some(value) => Option::Some(value),
            Option::None => Option::None,
        }
    }

    #[inline]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Option::Some(value) => Option::Some(value),
            Option::None => Option::None,
        }
    }

    // ------------------------------------------------------------------------
    // Unwrapping
    // ------------------------------------------------------------------------

    /// Return the payload, panicking with `message` if there is none
    ///
    /// 返回载荷；若为 `None` 则以 `message` panic
    ///
    /// # Panics
    ///
    /// Panics with `message` verbatim when the option is `None`.
    #[inline]
    #[track_caller]
    pub fn expect(self, message: &str) -> T {
        match self {
            Option::Some(value) => value,
            Option::None => UnwrapError::new(message.to_owned()).raise(),
        }
    }

    /// # Panics
    ///
    /// Panics when the option is `None`.
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self {
            Option::Some(value) => value,
            Option::None => UnwrapError::new(UNWRAP_NONE).raise(),
        }
    }

    /// Like [`expect`](Self::expect) but reports the failure as a value
    ///
    /// 与 [`expect`](Self::expect) 相同，但以值的形式报告失败
    #[inline]
    pub fn checked_expect(self, message: &str) -> StdResult<T, UnwrapError> {
        match self {
            Option::Some(value) => Ok(value),
            Option::None => Err(UnwrapError::new(message.to_owned())),
        }
    }

    #[inline]
    pub fn checked_unwrap(self) -> StdResult<T, UnwrapError> {
        match self {
            Option::Some(value) => Ok(value),
            Option::None => Err(UnwrapError::new(UNWRAP_NONE)),
        }
    }

    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Option::Some(value) => value,
            Option::None => default,
        }
    }

    #[inline]
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Option::Some(value) => value,
            Option::None => T::default(),
        }
    }

    /// Return the payload, or compute one lazily
    ///
    /// `f` runs only when the option is `None`.
    ///
    /// 返回载荷，或惰性计算一个值。`f` 仅在 `None` 时执行。
    #[inline]
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Option::Some(value) => value,
            Option::None => f(),
        }
    }

    /// Non-failing probe: whether a value was present, and the value if so
    ///
    /// 不会失败的探测：是否存在值，以及存在时的值
    ///
    /// ```
    /// use crab::option;
    ///
    /// assert_eq!(option::some(3).try_unwrap(), (true, Some(3)));
    /// assert_eq!(option::none::<i32>().try_unwrap(), (false, None));
    /// ```
    #[inline]
    pub fn try_unwrap(self) -> (bool, StdOption<T>) {
        match self {
            Option::Some(value) => (true, Some(value)),
            Option::None => (false, None),
        }
    }

    // ------------------------------------------------------------------------
    // Transformation
    // ------------------------------------------------------------------------

    #[inline]
    pub fn map<U, F>(self, f: F) -> Option<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Option::Some(value) => Option::Some(f(value)),
            Option::None => Option::None,
        }
    }

    /// Apply `f` to the payload, or return `default`
    ///
    /// 对载荷应用 `f`，或返回 `default`
    #[inline]
    pub fn map_or<U, F>(self, default: U, f: F) -> U
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Option::Some(value) => f(value),
            Option::None => default,
        }
    }

    /// Apply `f` to the payload, or compute a default with `default`
    ///
    /// Exactly one of the two closures runs.
    ///
    /// 对载荷应用 `f`，或用 `default` 计算默认值。两个闭包中恰好执行一个。
    #[inline]
    pub fn map_or_else<U, D, F>(self, default: D, f: F) -> U
    where
        D: FnOnce() -> U,
        F: FnOnce(T) -> U,
    {
        match self {
            Option::Some(value) => f(value),
            Option::None => default(),
        }
    }

    /// Run `action` on the payload for its side effect, passing `self` through
    ///
    /// 对载荷执行 `action` 以产生副作用，并原样返回 `self`
    #[inline]
    pub fn inspect<F>(self, action: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Option::Some(value) = &self {
            action(value);
        }
        self
    }

    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Option<U>
    where
        F: FnOnce(T) -> Option<U>,
    {
        match self {
            Option::Some(value) => f(value),
            Option::None => Option::None,
        }
    }

    #[inline]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Option::Some(value) if predicate(&value) => Option::Some(value),
            _ => Option::None,
        }
    }

    #[inline]
    pub fn or(self, other: Option<T>) -> Option<T> {
        match self {
            Option::Some(value) => Option::Some(value),
            Option::None => other,
        }
    }

    #[inline]
    pub fn or_else<F>(self, f: F) -> Option<T>
    where
        F: FnOnce() -> Option<T>,
    {
        match self {
            Option::Some(value) => Option::Some(value),
            Option::None => f(),
        }
    }

    // ------------------------------------------------------------------------
    // Conversion
    // ------------------------------------------------------------------------

    /// Project onto [`Result`]: `Some(v)` becomes `Ok(v)`, `None` becomes `Err(err)`
    ///
    /// 投影到 [`Result`]：`Some(v)` 变为 `Ok(v)`，`None` 变为 `Err(err)`
    #[inline]
    pub fn ok_or<E>(self, err: E) -> Result<T, E> {
        match self {
            Option::Some(value) => Result::Ok(value),
            Option::None => Result::Err(err),
        }
    }

    /// Like [`ok_or`](Self::ok_or), building the error only when `None`
    #[inline]
    pub fn ok_or_else<E, F>(self, err: F) -> Result<T, E>
    where
        F: FnOnce() -> E,
    {
        match self {
            Option::Some(value) => Result::Ok(value),
            Option::None => Result::Err(err()),
        }
    }

    #[inline]
    pub fn into_std(self) -> StdOption<T> {
        match self {
            Option::Some(value) => Some(value),
            Option::None => None,
        }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.as_ref().into_std(),
        }
    }
}

impl<T> Option<Option<T>> {
    /// Remove one level of nesting
    ///
    /// 去除一层嵌套
    #[inline]
    pub fn flatten(self) -> Option<T> {
        match self {
            Option::Some(inner) => inner,
            Option::None => Option::None,
        }
    }
}

impl<T> From<StdOption<T>> for Option<T> {
    #[inline]
    fn from(value: StdOption<T>) -> Self {
        match value {
            Some(value) => Option::Some(value),
            None => Option::None,
        }
    }
}

impl<T> From<Option<T>> for StdOption<T> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.into_std()
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Borrowing iterator over the zero or one payload of an [`Option`]
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: StdOption<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> StdOption<&'a T> {
        self.inner.take()
    }

    #[inline]
    fn size_hint(&self) -> (usize, StdOption<usize>) {
        let n = usize::from(self.inner.is_some());
        (n, Some(n))
    }
}

/// Owning iterator over the zero or one payload of an [`Option`]
#[derive(Debug, Clone)]
pub struct IntoIter<T> {
    inner: StdOption<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> StdOption<T> {
        self.inner.take()
    }

    #[inline]
    fn size_hint(&self) -> (usize, StdOption<usize>) {
        let n = usize::from(self.inner.is_some());
        (n, Some(n))
    }
}

impl<T> IntoIterator for Option<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.into_std(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Option<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Map every item through a function returning [`Option`], keeping the `Some` payloads
///
/// 通过返回 [`Option`] 的函数映射每个元素，仅保留 `Some` 载荷
///
/// ```
/// use crab::option::{self, MapFilter};
///
/// let evens: Vec<u32> = (1..=6)
///     .map_filter(|n| if n % 2 == 0 { option::some(n * 10) } else { option::none() })
///     .collect();
/// assert_eq!(evens, vec![20, 40, 60]);
/// ```
pub trait MapFilter: Iterator + Sized {
    fn map_filter<U, F>(self, f: F) -> MapFilterIter<Self, F>
    where
        F: FnMut(Self::Item) -> Option<U>,
    {
        MapFilterIter { iter: self, f }
    }
}

impl<I: Iterator> MapFilter for I {}

/// Iterator returned by [`MapFilter::map_filter`]
#[derive(Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct MapFilterIter<I, F> {
    iter: I,
    f: F,
}

impl<I, F, U> Iterator for MapFilterIter<I, F>
where
    I: Iterator,
    F: FnMut(I::Item) -> Option<U>,
{
    type Item = U;

    fn next(&mut self) -> StdOption<U> {
        for item in self.iter.by_ref() {
            if let Option::Some(value) = (self.f)(item) {
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, StdOption<usize>) {
        (0, self.iter.size_hint().1)
    }
}

impl<I: fmt::Debug, F> fmt::Debug for MapFilterIter<I, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapFilterIter")
            .field("iter", &self.iter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_some_and_none_tags() {
        let s = some(7);
        assert!(s.is_some());
        assert!(!s.is_none());
        assert_eq!(s.unwrap(), 7);

        let n = none::<i32>();
        assert!(n.is_none());
        assert!(!n.is_some());
    }

    #[test]
    #[should_panic(expected = "called `Option::unwrap()` on a `None` value")]
    fn test_unwrap_none_panics() {
        none::<i32>().unwrap();
    }

    #[test]
    #[should_panic(expected = "the port must be configured")]
    fn test_expect_none_panics_with_message() {
        none::<u16>().expect("the port must be configured");
    }

    #[test]
    fn test_checked_unwrap() {
        assert_eq!(some(1).checked_unwrap(), Ok(1));
        let err = none::<i32>().checked_expect("missing").unwrap_err();
        assert_eq!(err.message(), "missing");
        assert_eq!(none::<i32>().checked_unwrap().unwrap_err().message(), UNWRAP_NONE);
    }

    #[test]
    fn test_unwrap_alternatives_are_total() {
        assert_eq!(some(1).unwrap_or(5), 1);
        assert_eq!(none().unwrap_or(5), 5);
        assert_eq!(none::<String>().unwrap_or_default(), "");
        assert_eq!(some(2).unwrap_or_default(), 2);

        let calls = Cell::new(0);
        let value = some(3).unwrap_or_else(|| {
            calls.set(calls.get() + 1);
            9
        });
        assert_eq!(value, 3);
        assert_eq!(calls.get(), 0);

        let value = none().unwrap_or_else(|| {
            calls.set(calls.get() + 1);
            9
        });
        assert_eq!(value, 9);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_map_invokes_only_on_some() {
        let calls = Cell::new(0);
        let doubled = some(21).map(|v| {
            calls.set(calls.get() + 1);
            v * 2
        });
        assert_eq!(doubled, some(42));
        assert_eq!(calls.get(), 1);

        let mapped = none::<i32>().map(|v| {
            calls.set(calls.get() + 1);
            v * 2
        });
        assert!(mapped.is_none());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_map_or_short_circuits() {
        let calls = Cell::new(0);
        let len = none::<&str>().map_or(0, |s| {
            calls.set(calls.get() + 1);
            s.len()
        });
        assert_eq!(len, 0);
        assert_eq!(calls.get(), 0);

        assert_eq!(some("abc").map_or(0, str::len), 3);
    }

    #[test]
    fn test_map_or_else_runs_exactly_one_branch() {
        let defaults = Cell::new(0);
        let maps = Cell::new(0);
        let run = |opt: Option<i32>| {
            opt.map_or_else(
                || {
                    defaults.set(defaults.get() + 1);
                    -1
                },
                |v| {
                    maps.set(maps.get() + 1);
                    v + 1
                },
            )
        };

        assert_eq!(run(some(1)), 2);
        assert_eq!((defaults.get(), maps.get()), (0, 1));
        assert_eq!(run(none()), -1);
        assert_eq!((defaults.get(), maps.get()), (1, 1));
    }

    #[test]
    fn test_inspect_passes_through() {
        let seen = Cell::new(0);
        let out = some(5).inspect(|v| seen.set(*v));
        assert_eq!(out, some(5));
        assert_eq!(seen.get(), 5);

        let out = none::<i32>().inspect(|_| seen.set(-1));
        assert!(out.is_none());
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn test_ok_or_duality() {
        assert_eq!(some(4).ok_or("e").ok().unwrap(), 4);
        assert_eq!(none::<i32>().ok_or("e").err().unwrap(), "e");

        let calls = Cell::new(0);
        let res = some(1).ok_or_else(|| {
            calls.set(calls.get() + 1);
            "e"
        });
        assert_eq!(res, Result::Ok(1));
        assert_eq!(calls.get(), 0);

        let res = none::<i32>().ok_or_else(|| {
            calls.set(calls.get() + 1);
            "e"
        });
        assert_eq!(res, Result::Err("e"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_chaining_combinators() {
        assert_eq!(some(4).and_then(|v| some(v + 1)), some(5));
        assert_eq!(some(4).and_then(|_| none::<i32>()), none());
        assert_eq!(some(4).filter(|v| *v > 10), none());
        assert_eq!(none().or(some(2)), some(2));
        assert_eq!(some(1).or_else(|| some(2)), some(1));
        assert_eq!(some(some(3)).flatten(), some(3));
        assert_eq!(some(none::<i32>()).flatten(), none());
        assert_eq!(none::<Option<i32>>().flatten(), none());
    }

    #[test]
    fn test_std_conversions_and_iteration() {
        let ours: Option<i32> = Some(3).into();
        assert_eq!(ours, some(3));
        let plain: StdOption<i32> = ours.into();
        assert_eq!(plain, Some(3));

        assert_eq!(some(1).iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(none::<i32>().into_iter().count(), 0);

        let mut value = some(String::from("a"));
        if let Option::Some(s) = value.as_mut() {
            s.push('b');
        }
        assert_eq!(value.as_ref().map(|s| s.len()), some(2));
    }

    #[test]
    fn test_builder_fixes_type() {
        let b = Option::<u8>::builder();
        assert_eq!(b.some(1), some(1u8));
        assert_eq!(b.none(), none::<u8>());
        let copy = b;
        assert!(copy.none().is_none());
    }

    #[test]
    fn test_map_filter() {
        let words = ["1", "two", "3"];
        let parsed: Vec<i32> = words
            .iter()
            .map_filter(|w| Option::from(w.parse::<i32>().ok()))
            .collect();
        assert_eq!(parsed, vec![1, 3]);
    }
}
