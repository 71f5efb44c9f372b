//! Either - a committed success or failure.
//!
//! Unlike `Maybe`, whose resolution is a predicate over whatever it wraps,
//! an `Either` is resolved or rejected by construction:
//!
//! - [`Either::right`] builds the success case
//! - [`Either::left`] builds the failure case
//! - [`Either::wrap`] runs a fallible closure and picks the side for you
//!
//! `Either` is also what `map` produces when a callback raises, so every
//! recovered failure in a chain is an `Either` in the left state.
//!
//! # Examples
//!
//! ```rust
//! use monadic_do::monad::Either;
//! use monadic_do::value::{Failure, Value};
//!
//! let parsed = Either::wrap(|| "42".parse::<i64>().map_err(|error| Failure::raised(error.to_string())));
//! assert!(parsed.resolves());
//! assert_eq!(parsed.resolves_to(), Value::from(42));
//!
//! let failed = Either::wrap(|| "x".parse::<i64>().map_err(|error| Failure::raised(error.to_string())));
//! assert!(!failed.resolves());
//! ```

use super::{IntoOutcome, Monad, Repr, guarded};
use crate::value::Value;

/// One side of an `Either`.
///
/// `Empty` is private to this module, so it can never be confused with, or
/// handed out as, a caller's value.
#[derive(Clone, Debug, PartialEq)]
enum Slot {
    Empty,
    Filled(Value),
}

/// The `(left, right)` pair behind an `Either` container.
///
/// An empty left slot marks the right-resolved case.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct Sides {
    left: Slot,
    right: Value,
}

impl Sides {
    const fn left(value: Value) -> Self {
        Self {
            left: Slot::Filled(value),
            right: Value::Missing,
        }
    }

    const fn right(value: Value) -> Self {
        Self {
            left: Slot::Empty,
            right: value,
        }
    }

    #[inline]
    pub(super) const fn is_right(&self) -> bool {
        matches!(self.left, Slot::Empty)
    }

    pub(super) const fn populated(&self) -> &Value {
        match &self.left {
            Slot::Filled(value) => value,
            Slot::Empty => &self.right,
        }
    }

    pub(super) fn into_populated(self) -> Value {
        match self.left {
            Slot::Filled(value) => value,
            Slot::Empty => self.right,
        }
    }
}

/// Constructors for the `Either` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Either;

impl Either {
    /// Builds the success case; same as [`Either::right`].
    pub fn of<T: Into<Value>>(value: T) -> Monad {
        Self::right(value)
    }

    /// Builds the failure case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::Either;
    /// use monadic_do::value::Value;
    ///
    /// let left = Either::left("error");
    /// assert!(!left.resolves());
    /// assert_eq!(left.resolves_to(), Value::from("error"));
    /// ```
    pub fn left<T: Into<Value>>(value: T) -> Monad {
        Monad::from_repr(Repr::Either(Sides::left(value.into())))
    }

    /// Builds the success case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::Either;
    /// use monadic_do::value::Value;
    ///
    /// let right = Either::right(Value::Null);
    /// assert!(right.resolves());
    /// assert_eq!(right.resolves_to(), Value::Null);
    /// ```
    pub fn right<T: Into<Value>>(value: T) -> Monad {
        Monad::from_repr(Repr::Either(Sides::right(value.into())))
    }

    /// Runs `function` and records how it finished.
    ///
    /// A normal return (a plain value or `Ok`) becomes `right`; `Err` or a
    /// panic becomes `left` carrying the raised value.
    pub fn wrap<F, R>(function: F) -> Monad
    where
        F: FnOnce() -> R,
        R: IntoOutcome,
    {
        match guarded(function) {
            Ok(value) => Self::right(value),
            Err(raised) => Self::left(raised),
        }
    }
}
