//! A shared, lazily polled asynchronous value.
//!
//! A [`Promise`] is a cloneable handle on one future that settles to an
//! [`Outcome`]. Every clone observes the same settlement, and the underlying
//! future runs at most once no matter how many clones await it. Nothing
//! happens until some clone is polled.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{self, BoxFuture, Shared};

use super::Outcome;
use crate::value::Value;

/// A handle on an asynchronous value.
///
/// # Examples
///
/// ```rust
/// use monadic_do::monad::Promise;
/// use monadic_do::value::Value;
///
/// let promise = Promise::new(async { Ok(Value::from(42)) });
/// let copy = promise.clone();
///
/// assert_eq!(futures::executor::block_on(promise), Ok(Value::from(42)));
/// assert_eq!(futures::executor::block_on(copy), Ok(Value::from(42)));
/// ```
#[derive(Clone)]
pub struct Promise {
    inner: Shared<BoxFuture<'static, Outcome>>,
}

impl Promise {
    /// Wraps a future that settles to an [`Outcome`].
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        Self {
            inner: future.boxed().shared(),
        }
    }

    /// Creates a promise that is already fulfilled with `value`.
    pub fn resolve<T: Into<Value>>(value: T) -> Self {
        Self::new(future::ready(Ok(value.into())))
    }

    /// Creates a promise that is already rejected with `reason`.
    pub fn reject<T: Into<Value>>(reason: T) -> Self {
        Self::new(future::ready(Err(reason.into())))
    }

    /// Returns the settlement if another clone has already driven this
    /// promise to completion.
    pub fn peek(&self) -> Option<&Outcome> {
        self.inner.peek()
    }
}

impl Future for Promise {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Outcome> {
        self.inner.poll_unpin(context)
    }
}

impl PartialEq for Promise {
    fn eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(Ok(value)) => formatter.debug_tuple("Promise::Fulfilled").field(value).finish(),
            Some(Err(reason)) => formatter.debug_tuple("Promise::Rejected").field(reason).finish(),
            None => formatter.write_str("Promise::Pending"),
        }
    }
}

impl fmt::Display for Promise {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Promise")
    }
}
