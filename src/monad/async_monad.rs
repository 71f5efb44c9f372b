//! Async - a container over an asynchronous value.
//!
//! `Async` wraps a [`Promise`]. Its `map` cannot run callbacks on the spot,
//! so it queues them instead. The queue is folded by a single driver loop
//! once the resulting promise is polled: the driver waits for the source to
//! settle, then feeds the settlement through every queued callback in turn.
//!
//! - a callback that raises (or panics) rejects what follows
//! - a callback that returns a container settles the way that container
//!   settles, so nested containers never stay wrapped; an `Async` returned
//!   this way has its own queue spliced in front of the remaining callbacks
//! - a plain return value fulfils
//!
//! Because mapping appends to the queue instead of wrapping one future in
//! another, polling a chain of any length takes constant stack depth.
//!
//! An `Async` built around something that is not a promise behaves as if it
//! wrapped a promise already rejected with that value.
//!
//! # Examples
//!
//! ```rust
//! use monadic_do::monad::{Async, Maybe, Promise};
//! use monadic_do::value::Value;
//!
//! let chained = Async::of(Promise::resolve(Value::record([("a", 1)])))
//!     .map(|record| record.property("a").map(Maybe::of));
//!
//! let outcome = futures::executor::block_on(chained.to_promise());
//! assert_eq!(outcome, Ok(Value::from(1)));
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use super::variant::ASYNC;
use super::{Handler, Monad, Outcome, Promise, Repr, guarded};
use crate::value::Value;

/// Constructors for the `Async` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Async;

impl Async {
    /// Wraps `item`, which should be a [`Promise`].
    ///
    /// Any other value makes the container reject with that value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::monad::Async;
    /// use monadic_do::value::Value;
    ///
    /// let outcome = futures::executor::block_on(Async::of(1).to_promise());
    /// assert_eq!(outcome, Err(Value::from(1)));
    /// ```
    pub fn of<T: Into<Value>>(item: T) -> Monad {
        Monad::from_repr(Repr::Async(Chain::new(item.into())))
    }

    /// Wraps a future that settles to an [`Outcome`].
    pub fn from_future<F>(future: F) -> Monad
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        Self::of(Promise::new(future))
    }
}

// =============================================================================
// Chain
// =============================================================================

enum State {
    /// Callbacks waiting on `source`, in the order they were attached.
    Queued { source: Value, handlers: Vec<Handler> },
    /// The queue has been handed to a driver; clones share its promise.
    Sealed(Promise),
}

/// The source and pending callbacks behind an `Async` container.
///
/// Clones share one state. A uniquely owned chain grows in place; a shared
/// one is sealed into a promise first, so every clone observes the same
/// settlement and each callback runs at most once.
#[derive(Clone)]
pub(super) struct Chain {
    state: Arc<Mutex<State>>,
}

impl Chain {
    fn new(source: Value) -> Self {
        Self::queued(source, Vec::new())
    }

    fn queued(source: Value, handlers: Vec<Handler>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::Queued { source, handlers })),
        }
    }

    pub(super) fn resolves(&self) -> bool {
        match &*self.state.lock() {
            State::Queued { source, .. } => ASYNC.resolves(source),
            State::Sealed(_) => true,
        }
    }

    /// The wrapped item: the source while nothing is queued, otherwise the
    /// promise of the whole chain.
    pub(super) fn extracted(&self) -> Value {
        let mut state = self.state.lock();
        if let State::Queued { source, handlers } = &*state
            && handlers.is_empty()
        {
            return source.clone();
        }
        Value::Promise(seal(&mut state))
    }

    /// Attaches `handler` to the end of the chain.
    pub(super) fn then(self, handler: Handler) -> Self {
        match Arc::try_unwrap(self.state) {
            Ok(state) => match state.into_inner() {
                State::Queued {
                    source,
                    mut handlers,
                } => {
                    handlers.push(handler);
                    Self::queued(rejecting_unless_promise(source), handlers)
                }
                State::Sealed(promise) => Self::queued(promise.into(), vec![handler]),
            },
            Err(shared) => {
                let promise = seal(&mut shared.lock());
                Self::queued(promise.into(), vec![handler])
            }
        }
    }

    pub(super) fn into_promise(self) -> Promise {
        match Arc::try_unwrap(self.state) {
            Ok(state) => match state.into_inner() {
                State::Queued { source, handlers } => drive(source, handlers),
                State::Sealed(promise) => promise,
            },
            Err(shared) => seal(&mut shared.lock()),
        }
    }

    /// Takes the queue out of a uniquely owned chain so a running driver can
    /// splice it in; a shared chain yields its sealed promise instead.
    fn into_queue(self) -> (Value, Vec<Handler>) {
        match Arc::try_unwrap(self.state) {
            Ok(state) => match state.into_inner() {
                State::Queued { source, handlers } => (source, handlers),
                State::Sealed(promise) => (promise.into(), Vec::new()),
            },
            Err(shared) => (seal(&mut shared.lock()).into(), Vec::new()),
        }
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state) || self.extracted() == other.extracted()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.lock() {
            State::Queued { source, handlers } => formatter
                .debug_struct("Queued")
                .field("source", source)
                .field("handlers", &handlers.len())
                .finish(),
            State::Sealed(promise) => formatter.debug_tuple("Sealed").field(promise).finish(),
        }
    }
}

fn rejecting_unless_promise(source: Value) -> Value {
    if source.is_promise() {
        return source;
    }
    tracing::trace!(item = %source, "async container wraps a settled value; rejecting with it");
    Value::Promise(Promise::reject(source))
}

fn seal(state: &mut State) -> Promise {
    let taken = std::mem::replace(state, State::Queued {
        source: Value::Missing,
        handlers: Vec::new(),
    });
    let promise = match taken {
        State::Queued { source, handlers } => drive(source, handlers),
        State::Sealed(promise) => promise,
    };
    *state = State::Sealed(promise.clone());
    promise
}

// =============================================================================
// Driver
// =============================================================================

fn drive(source: Value, handlers: Vec<Handler>) -> Promise {
    if handlers.is_empty() {
        return match source {
            Value::Promise(promise) => promise,
            settled => Promise::reject(settled),
        };
    }
    Promise::new(run_queue(source, handlers))
}

async fn settle(source: Value) -> Outcome {
    match source {
        Value::Promise(promise) => promise.await,
        settled => Err(settled),
    }
}

async fn run_queue(source: Value, handlers: Vec<Handler>) -> Outcome {
    let mut queue = VecDeque::from(handlers);
    let mut outcome = settle(source).await;

    while let Some(handler) = queue.pop_front() {
        outcome = match guarded(move || handler(outcome)) {
            Ok(Value::Monad(nested)) => match nested.repr {
                Repr::Async(chain) => {
                    let (source, nested_handlers) = chain.into_queue();
                    for handler in nested_handlers.into_iter().rev() {
                        queue.push_front(handler);
                    }
                    settle(source).await
                }
                repr => Monad::from_repr(repr).into_outcome_now(),
            },
            settled => settled,
        };
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monad::{Either, Identity, Maybe, raise};
    use crate::value::Failure;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    fn resolves_only_for_promises() {
        assert!(Async::of(Promise::resolve(1)).resolves());
        assert!(!Async::of(1).resolves());
    }

    #[rstest]
    #[tokio::test]
    async fn fulfilled_promise_runs_on_resolve() {
        let outcome = Async::of(Promise::resolve(2))
            .map(|value| value.as_i64().map(|n| n * 10))
            .await;
        assert_eq!(outcome, Ok(Value::from(20)));
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_promise_runs_on_reject() {
        let outcome = Async::of(Promise::reject("no"))
            .map_both(|_| "unexpected", |reason| format!("recovered {reason}"))
            .await;
        assert_eq!(outcome, Ok(Value::from("recovered no")));
    }

    #[rstest]
    #[tokio::test]
    async fn default_reject_keeps_rejection() {
        let outcome = Async::of(Promise::reject(7)).map(|_| "unexpected").await;
        assert_eq!(outcome, Err(Value::from(7)));
    }

    #[rstest]
    #[tokio::test]
    async fn non_promise_item_rejects_with_item() {
        let mapped = Async::of("plain").map(|_| "unexpected");
        assert!(mapped.resolves());
        assert_eq!(mapped.await, Err(Value::from("plain")));
    }

    #[rstest]
    #[tokio::test]
    async fn raised_callback_rejects_continuation() {
        let outcome = Async::of(Promise::resolve(1))
            .map(|_| raise(Failure::raised("inside")))
            .await;
        assert_eq!(outcome, Err(Value::from(Failure::raised("inside"))));
    }

    #[rstest]
    #[tokio::test]
    async fn panicking_callback_rejects_continuation() {
        let outcome = Async::of(Promise::resolve(1))
            .map(|_| -> Value { panic!("async panic") })
            .await;
        assert_eq!(
            outcome,
            Err(Value::from(Failure::Panicked {
                message: "async panic".to_string()
            }))
        );
    }

    #[rstest]
    #[case(Identity::of("id"), Ok(Value::from("id")))]
    #[case(Maybe::of(Value::Missing), Err(Value::Null))]
    #[case(Either::left("left"), Err(Value::from("left")))]
    #[case(Async::of(Promise::resolve("inner")), Ok(Value::from("inner")))]
    #[case(Async::of(Promise::reject("inner")), Err(Value::from("inner")))]
    #[tokio::test]
    async fn nested_containers_are_unwrapped(#[case] nested: Monad, #[case] expected: Outcome) {
        let outcome = Async::of(Promise::resolve(0)).map(move |_| nested).await;
        assert_eq!(outcome, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn nested_queue_runs_before_the_rest() {
        let outcome = Async::of(Promise::resolve(1))
            .map(|value| {
                Async::of(Promise::resolve(value))
                    .map(|value| value.as_i64().map(|n| n * 10))
                    .map(|value| value.as_i64().map(|n| n + 2))
            })
            .map(|value| value.as_i64().map(|n| n * 100))
            .await;
        assert_eq!(outcome, Ok(Value::from(1200)));
    }

    #[rstest]
    #[tokio::test]
    async fn callbacks_wait_for_settlement() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let chained = Async::from_future(async { Ok(Value::from(1)) }).map(move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            value
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(chained.await, Ok(Value::from(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn cloned_chain_runs_shared_callbacks_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let shared = Async::of(Promise::resolve(1)).map(move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            value
        });

        let doubled = shared.clone().map(|value| value.as_i64().map(|n| n * 2));
        let negated = shared.map(|value| value.as_i64().map(|n| -n));

        assert_eq!(doubled.await, Ok(Value::from(2)));
        assert_eq!(negated.await, Ok(Value::from(-1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn map_returns_async_immediately() {
        let chained = Async::of(Promise::resolve(1)).map(|value| value);
        assert_eq!(chained.name(), "Async");
        assert!(chained.resolves());
        assert!(chained.resolves_to().is_promise());
    }

    #[rstest]
    fn clones_compare_equal() {
        let chained = Async::of(Promise::resolve(1)).map(|value| value);
        assert_eq!(chained.clone(), chained);
    }
}
