//! Raised failures.
//!
//! A [`Failure`] is what a callback "throws": either explicitly, by
//! returning `Err(Failure)`, or implicitly, by panicking inside `map`.
//! Containers recover every failure into an `Either` in the left state, so
//! a `Failure` is usually observed as a rejected value rather than as a Rust
//! error.

use std::any::Any;

/// Represents a value raised while evaluating a container chain.
///
/// # Examples
///
/// ```rust
/// use monadic_do::value::Failure;
///
/// let failure = Failure::raised("meow?");
/// assert_eq!(failure.message(), "meow?");
/// assert_eq!(Failure::NonMonadYield.message(), "Do not yield non-monads");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Failure {
    /// A failure raised explicitly by calling code.
    #[error("{message}")]
    Raised {
        /// The human-readable message.
        message: String,
    },
    /// A do-procedure yielded something that is not a container.
    #[error("Do not yield non-monads")]
    NonMonadYield,
    /// A callback panicked; the panic payload is kept as the message.
    #[error("{message}")]
    Panicked {
        /// The panic payload rendered as text.
        message: String,
    },
    /// A property was read from `null` or a missing value.
    #[error("cannot read property '{property}' of {target}")]
    PropertyOfAbsent {
        /// The property that was requested.
        property: String,
        /// `"null"` or `"missing"`.
        target: &'static str,
    },
}

impl Failure {
    /// Creates a [`Failure::Raised`] carrying `message`.
    pub fn raised(message: impl Into<String>) -> Self {
        Self::Raised {
            message: message.into(),
        }
    }

    /// Returns the display text of this failure.
    ///
    /// This is the accessor recovery handlers usually reach for, as in
    /// `|error| error.message()`.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "callback panicked".to_string());
        Self::Panicked { message }
    }
}
