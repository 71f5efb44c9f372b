//! The container type and its variants.
//!
//! A [`Monad`] wraps a single [`Value`] and knows two things about it:
//! whether it *resolves* and what it *resolves to*. Everything else is built
//! on top of those two answers by [`Monad::map_both`]: the resolving branch
//! feeds the extracted value to `on_resolve`, the other branch feeds it to
//! `on_reject`.
//!
//! | Variant    | Resolves when                          | Extracted value |
//! |------------|----------------------------------------|-----------------|
//! | [`Identity`] | always                               | the wrapped value |
//! | [`Maybe`]    | the value is neither null nor missing | the value, with missing normalised to null |
//! | [`Either`]   | it was built with `right`             | whichever side is populated |
//! | [`Async`]    | it wraps a [`Promise`]                | the promise's settlement |
//!
//! # Flattening
//!
//! A callback may return a plain value, another container, or a `Result`.
//! Containers are returned as-is, plain values are wrapped in `Identity`,
//! and `Err` (or a panic) becomes an `Either` in the left state. `map` never
//! panics and never returns an error itself.
//!
//! # Examples
//!
//! ```rust
//! use monadic_do::monad::{Identity, Maybe};
//! use monadic_do::value::Value;
//!
//! let prop = |key: &'static str| move |value: Value| value.property(key).map(Maybe::of);
//!
//! let chain = Identity::of(Value::record([("a", Value::record([("b", "foo")]))]))
//!     .map(prop("a"))
//!     .map(prop("b"))
//!     .map(prop("c"))
//!     .map(prop("d"))
//!     .map_both(prop("0"), |_| "bar");
//!
//! assert!(chain.resolves());
//! assert_eq!(chain.resolves_to(), Value::from("bar"));
//! ```

mod async_monad;
mod either;
mod promise;
mod variant;

pub use async_monad::Async;
pub use either::Either;
pub use promise::Promise;
pub use variant::{Identity, Maybe, Variant, monad};

use std::fmt;
use std::future::IntoFuture;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::value::{Failure, Value};
use async_monad::Chain;
use either::Sides;
use variant::{ASYNC, IDENTITY, MAYBE};

/// The settlement of a container: `Ok` when it resolved, `Err` when it
/// rejected. Both sides carry the extracted value.
pub type Outcome = Result<Value, Value>;

/// A boxed callback over a settlement, as stored by asynchronous chains.
pub(crate) type Handler = Box<dyn FnOnce(Outcome) -> Outcome + Send>;

/// Raises `error` from inside a callback.
///
/// # Errors
///
/// Always returns `Err(error.into())`; this is a typed shorthand for
/// callbacks that only ever raise.
///
/// # Examples
///
/// ```rust
/// use monadic_do::monad::{Identity, raise};
/// use monadic_do::value::Failure;
///
/// let recovered = Identity::of(1).map(|_| raise(Failure::raised("nope")));
/// assert_eq!(recovered.name(), "Either");
/// assert!(!recovered.resolves());
/// ```
pub fn raise<E: Into<Value>>(error: E) -> Outcome {
    Err(error.into())
}

// =============================================================================
// IntoOutcome
// =============================================================================

/// Conversion from a callback's return value into an [`Outcome`].
///
/// Plain values and containers become `Ok`; `Result::Err` becomes `Err`,
/// which `map` treats as a raised value.
pub trait IntoOutcome {
    /// Performs the conversion.
    fn into_outcome(self) -> Outcome;
}

macro_rules! plain_outcome {
    ($($source:ty),* $(,)?) => {
        $(
            impl IntoOutcome for $source {
                #[inline]
                fn into_outcome(self) -> Outcome {
                    Ok(Value::from(self))
                }
            }
        )*
    };
}

plain_outcome!(
    Value,
    Monad,
    Promise,
    Failure,
    crate::value::Opaque,
    (),
    bool,
    i32,
    u32,
    i64,
    f64,
    char,
    &str,
    String,
);

impl<T: Into<Value>> IntoOutcome for Option<T> {
    fn into_outcome(self) -> Outcome {
        Ok(Value::from(self))
    }
}

impl<T: Into<Value>> IntoOutcome for Vec<T> {
    fn into_outcome(self) -> Outcome {
        Ok(Value::from(self))
    }
}

impl<T: Into<Value>, E: Into<Value>> IntoOutcome for Result<T, E> {
    fn into_outcome(self) -> Outcome {
        self.map(Into::into).map_err(Into::into)
    }
}

/// Runs `callback`, converting a panic into a raised [`Failure::Panicked`].
pub(crate) fn guarded<F, R>(callback: F) -> Outcome
where
    F: FnOnce() -> R,
    R: IntoOutcome,
{
    catch_unwind(AssertUnwindSafe(callback)).map_or_else(
        |payload| Err(Value::from(Failure::from_panic(payload.as_ref()))),
        IntoOutcome::into_outcome,
    )
}

// =============================================================================
// Monad
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Repr {
    Rejected(Value),
    Identity(Value),
    Maybe(Value),
    Either(Sides),
    Async(Chain),
    Custom(Variant, Value),
}

/// A value that may or may not be resolvable.
///
/// Containers are immutable. Every combinator consumes its receiver and
/// returns a new container; clone first to keep the original.
#[derive(Clone, Debug, PartialEq)]
pub struct Monad {
    repr: Repr,
}

impl Monad {
    const fn from_repr(repr: Repr) -> Self {
        Self { repr }
    }

    /// Creates a container that never resolves and extracts to `value`.
    ///
    /// This is the container the default rejection handler produces, so a
    /// rejection stays a rejection down a chain of `map` calls.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::Monad;
    ///
    /// let rejected = Monad::rejected("reason");
    /// assert!(!rejected.resolves());
    /// assert_eq!(rejected.to_string(), "<Rejected(reason)>");
    /// ```
    pub fn rejected(value: impl Into<Value>) -> Self {
        Self::from_repr(Repr::Rejected(value.into()))
    }

    /// Returns `value` unchanged if it is a container, otherwise wraps it in
    /// `Identity`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::{Maybe, Monad};
    /// use monadic_do::value::Value;
    ///
    /// assert_eq!(Monad::lift(Value::from(1)).name(), "Identity");
    /// assert_eq!(Monad::lift(Maybe::of(1).into()).name(), "Maybe");
    /// ```
    pub fn lift(value: Value) -> Self {
        match value {
            Value::Monad(monad) => *monad,
            plain => Identity::of(plain),
        }
    }

    /// Returns the display name of this container's variant.
    pub const fn name(&self) -> &'static str {
        match &self.repr {
            Repr::Rejected(_) => "Rejected",
            Repr::Identity(_) => IDENTITY.name(),
            Repr::Maybe(_) => MAYBE.name(),
            Repr::Either(_) => "Either",
            Repr::Async(_) => ASYNC.name(),
            Repr::Custom(variant, _) => variant.name(),
        }
    }

    /// Returns `true` if this container resolves.
    pub fn resolves(&self) -> bool {
        match &self.repr {
            Repr::Rejected(_) => false,
            Repr::Identity(value) => IDENTITY.resolves(value),
            Repr::Maybe(value) => MAYBE.resolves(value),
            Repr::Either(sides) => sides.is_right(),
            Repr::Async(chain) => chain.resolves(),
            Repr::Custom(variant, value) => variant.resolves(value),
        }
    }

    /// Returns the value this container hands to its callbacks.
    ///
    /// For `Async` this is the wrapped promise itself; its settlement is only
    /// observable through `map` or `to_promise`.
    pub fn resolves_to(&self) -> Value {
        match &self.repr {
            Repr::Maybe(value) if value.is_missing() => Value::Null,
            Repr::Either(sides) => sides.populated().clone(),
            Repr::Async(chain) => chain.extracted(),
            Repr::Rejected(value)
            | Repr::Identity(value)
            | Repr::Maybe(value)
            | Repr::Custom(_, value) => value.clone(),
        }
    }

    fn into_outcome_now(self) -> Outcome {
        let resolved = self.resolves();
        let value = match self.repr {
            Repr::Maybe(value) if value.is_missing() => Value::Null,
            Repr::Either(sides) => sides.into_populated(),
            Repr::Async(chain) => chain.extracted(),
            Repr::Rejected(value)
            | Repr::Identity(value)
            | Repr::Maybe(value)
            | Repr::Custom(_, value) => value,
        };
        if resolved { Ok(value) } else { Err(value) }
    }

    const fn is_async(&self) -> bool {
        matches!(self.repr, Repr::Async(_))
    }

    /// Settles a synchronous container on the spot; an asynchronous one is
    /// handed back unchanged.
    pub(crate) fn try_settle(self) -> Result<Outcome, Self> {
        if self.is_async() {
            return Err(self);
        }
        Ok(self.into_outcome_now())
    }

    /// The single combinator every public operation is built on.
    ///
    /// `handler` receives the settlement and returns the next one: `Ok` with
    /// a container is flattened, `Ok` with a plain value is wrapped in
    /// `Identity`, `Err` is recovered into `Either::left`.
    pub(crate) fn chain<H>(self, handler: H) -> Self
    where
        H: FnOnce(Outcome) -> Outcome + Send + 'static,
    {
        if let Repr::Async(chain) = self.repr {
            return Self::from_repr(Repr::Async(chain.then(Box::new(handler))));
        }

        let outcome = self.into_outcome_now();
        match guarded(move || handler(outcome)) {
            Ok(value) => Self::lift(value),
            Err(raised) => {
                tracing::debug!(raised = %raised, "callback raised; recovering into Either::Left");
                Either::left(raised)
            }
        }
    }

    /// Applies `on_resolve` to the extracted value if this container
    /// resolves; otherwise keeps the rejection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::Maybe;
    /// use monadic_do::value::Value;
    ///
    /// let doubled = Maybe::of(21).map(|value| value.as_i64().map(|n| n * 2));
    /// assert_eq!(doubled.resolves_to(), Value::from(42));
    ///
    /// let skipped = Maybe::of(Value::Null).map(|_| -> i64 { unreachable!() });
    /// assert!(!skipped.resolves());
    /// ```
    #[must_use]
    pub fn map<F, R>(self, on_resolve: F) -> Self
    where
        F: FnOnce(Value) -> R + Send + 'static,
        R: IntoOutcome,
    {
        self.map_both(on_resolve, keep_rejected)
    }

    /// Applies `on_resolve` or `on_reject` to the extracted value, depending
    /// on whether this container resolves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::Either;
    /// use monadic_do::value::{Failure, Value};
    ///
    /// let message = Either::wrap(|| Err::<Value, _>(Failure::raised("meow?")))
    ///     .map_both(|value| value, |error| error.message());
    /// assert_eq!(message.resolves_to(), Value::from("meow?"));
    /// ```
    #[must_use]
    pub fn map_both<F, G, R, S>(self, on_resolve: F, on_reject: G) -> Self
    where
        F: FnOnce(Value) -> R + Send + 'static,
        G: FnOnce(Value) -> S + Send + 'static,
        R: IntoOutcome,
        S: IntoOutcome,
    {
        self.chain(move |outcome| match outcome {
            Ok(value) => on_resolve(value).into_outcome(),
            Err(reason) => on_reject(reason).into_outcome(),
        })
    }

    /// Calls `on_done(value, was_resolved)` on either branch.
    ///
    /// A synchronous container passes through unchanged unless `on_done`
    /// returns a container of its own or raises. An `Async` container settles
    /// the same way it would have without `on_done`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::Maybe;
    /// use monadic_do::value::Value;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(None));
    /// let sink = Arc::clone(&seen);
    /// let passed = Maybe::of(7).pass(move |value, resolved| {
    ///     *sink.lock().unwrap() = Some((value, resolved));
    /// });
    ///
    /// assert_eq!(passed, Maybe::of(7));
    /// assert_eq!(*seen.lock().unwrap(), Some((Value::from(7), true)));
    /// ```
    #[must_use]
    pub fn pass<F, R>(self, on_done: F) -> Self
    where
        F: FnOnce(Value, bool) -> R + Send + 'static,
        R: IntoOutcome,
    {
        let original = (!self.is_async()).then(|| self.clone());
        self.chain(move |outcome| {
            let (value, resolved) = match &outcome {
                Ok(value) => (value.clone(), true),
                Err(reason) => (reason.clone(), false),
            };
            match on_done(value, resolved).into_outcome() {
                Ok(Value::Monad(replacement)) => Ok(Value::Monad(replacement)),
                Err(raised) => Err(raised),
                Ok(_) => match original {
                    Some(original) => Ok(original.into()),
                    None => outcome,
                },
            }
        })
    }

    /// Converts this container into a [`Promise`] that fulfils with the
    /// extracted value when it resolves and rejects with it otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::Maybe;
    /// use monadic_do::value::Value;
    ///
    /// let outcome = futures::executor::block_on(Maybe::of(1).to_promise());
    /// assert_eq!(outcome, Ok(Value::from(1)));
    ///
    /// let outcome = futures::executor::block_on(Maybe::of(Value::Missing).to_promise());
    /// assert_eq!(outcome, Err(Value::Null));
    /// ```
    pub fn to_promise(self) -> Promise {
        match self.repr {
            Repr::Async(chain) => chain.into_promise(),
            repr => Self::from_repr(repr)
                .into_outcome_now()
                .map_or_else(Promise::reject, Promise::resolve),
        }
    }
}

fn keep_rejected(reason: Value) -> Monad {
    Monad::rejected(reason)
}

impl IntoFuture for Monad {
    type Output = Outcome;
    type IntoFuture = Promise;

    fn into_future(self) -> Promise {
        self.to_promise()
    }
}

impl fmt::Display for Monad {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<{}({})>", self.name(), self.resolves_to())
    }
}

impl<T: Into<Value>, E: Into<Value>> From<Result<T, E>> for Monad {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Either::right(value),
            Err(error) => Either::left(error),
        }
    }
}

static_assertions::assert_impl_all!(Monad: Send, Sync, Clone);
static_assertions::assert_impl_all!(Value: Send, Sync, Clone);
