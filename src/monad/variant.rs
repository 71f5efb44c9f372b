//! The variant factory and the predicate-only variants.
//!
//! [`monad`] turns a resolution predicate and a display name into a
//! [`Variant`]. `Identity` is nothing more than such a variant; `Maybe` and
//! `Async` start from one and add their own extraction or mapping rules in
//! the container core.

use std::fmt;

use super::{Monad, Repr};
use crate::value::Value;

/// A resolution predicate over a wrapped value.
pub type Resolver = fn(&Value) -> bool;

/// A container variant built by [`monad`].
///
/// Two variants are equal when they share a display name.
///
/// # Examples
///
/// ```rust
/// use monadic_do::monad::{Variant, monad};
/// use monadic_do::value::Value;
///
/// fn is_even(value: &Value) -> bool {
///     value.as_i64().is_some_and(|number| number % 2 == 0)
/// }
///
/// const EVEN: Variant = monad(is_even, "Even");
///
/// assert!(EVEN.of(2).resolves());
/// assert!(!EVEN.of(3).resolves());
/// assert_eq!(EVEN.of(3).to_string(), "<Even(3)>");
/// ```
#[derive(Clone, Copy)]
pub struct Variant {
    name: &'static str,
    resolver: Resolver,
}

/// Builds a new container variant.
///
/// The variant resolves exactly when `resolver` holds for the wrapped value
/// and displays as `name`. It extracts the wrapped value unchanged and uses
/// the shared `map` behaviour.
pub const fn monad(resolver: Resolver, name: &'static str) -> Variant {
    Variant { name, resolver }
}

impl Variant {
    /// Returns the display name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the resolution predicate to `value`.
    #[inline]
    pub fn resolves(&self, value: &Value) -> bool {
        (self.resolver)(value)
    }

    /// Wraps `value` in a container of this variant.
    pub fn of<T: Into<Value>>(self, value: T) -> Monad {
        Monad::from_repr(Repr::Custom(self, value.into()))
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Variant").field(&self.name).finish()
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

const fn always(_: &Value) -> bool {
    true
}

const fn present(value: &Value) -> bool {
    !value.is_absent()
}

const fn pending(item: &Value) -> bool {
    item.is_promise()
}

pub(super) const IDENTITY: Variant = monad(always, "Identity");
pub(super) const MAYBE: Variant = monad(present, "Maybe");
pub(super) const ASYNC: Variant = monad(pending, "Async");

// =============================================================================
// Identity
// =============================================================================

/// The variant that always resolves.
///
/// # Examples
///
/// ```rust
/// use monadic_do::monad::Identity;
/// use monadic_do::value::Value;
///
/// let identity = Identity::of(Value::Null);
/// assert!(identity.resolves());
/// assert_eq!(identity.resolves_to(), Value::Null);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity;

impl Identity {
    /// Wraps `value`.
    pub fn of<T: Into<Value>>(value: T) -> Monad {
        Monad::from_repr(Repr::Identity(value.into()))
    }
}

// =============================================================================
// Maybe
// =============================================================================

/// The variant that resolves unless its value is null or missing.
///
/// Both absence markers extract to [`Value::Null`], so callers only ever
/// see one representation of "nothing".
///
/// # Examples
///
/// ```rust
/// use monadic_do::monad::Maybe;
/// use monadic_do::value::Value;
///
/// assert!(Maybe::of(0).resolves());
/// assert!(!Maybe::of(Value::Missing).resolves());
/// assert_eq!(Maybe::of(Value::Missing).resolves_to(), Value::Null);
/// assert_eq!(Maybe::of(None::<i32>).resolves_to(), Value::Null);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maybe;

impl Maybe {
    /// Wraps `value`.
    pub fn of<T: Into<Value>>(value: T) -> Monad {
        Monad::from_repr(Repr::Maybe(value.into()))
    }
}
