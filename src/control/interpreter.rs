//! The do-interpreter.
//!
//! A do-procedure is an explicit step machine. Each [`Step`] either yields a
//! container together with the code that should run once it settles, or
//! returns a final value. [`run_do`] drives the machine over every yielded
//! container, so it works the same for `Identity`, `Maybe`, `Either` and
//! `Async`.
//!
//! Synchronous steps run in a loop. Only an `Async` step suspends the
//! machine; the rest of the procedure then continues inside that
//! container's callback queue.
//!
//! A yielded container's rejection is handed back to the procedure as
//! `Err(reason)`. Matching on it is the procedure's `try`/`catch`; letting it
//! propagate with `?` aborts the whole computation.
//!
//! # Examples
//!
//! ```rust
//! use monadic_do::control::{Step, run_do};
//! use monadic_do::monad::{Either, Maybe};
//! use monadic_do::value::Value;
//!
//! let sum = run_do(|| {
//!     Ok(Step::bind(Maybe::of(1), |first| {
//!         let first = first?;
//!         Ok(Step::bind(Either::right(2), move |second| {
//!             let second = second?;
//!             Ok(Step::done(first.as_i64().unwrap_or(0) + second.as_i64().unwrap_or(0)))
//!         }))
//!     }))
//! });
//! assert_eq!(sum.resolves_to(), Value::from(3));
//!
//! let caught = run_do(|| {
//!     Ok(Step::bind(Either::left("boom"), |outcome| {
//!         Ok(Step::done(match outcome {
//!             Ok(value) => value,
//!             Err(reason) => Value::from(format!("caught {reason}")),
//!         }))
//!     }))
//! });
//! assert_eq!(caught.resolves_to(), Value::from("caught boom"));
//! ```

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::monad::{Either, Monad, Outcome};
use crate::value::{Failure, Value};

/// The code that runs once a yielded container settles.
pub type Resume = Box<dyn FnOnce(Outcome) -> Result<Step, Value> + Send>;

/// One step of a do-procedure.
pub enum Step {
    /// Suspend on `item` and continue with `resume` once it settles.
    ///
    /// `item` must be a container; anything else aborts the procedure.
    Yield(Value, Resume),
    /// Finish with this value.
    Return(Value),
}

impl Step {
    /// Suspends on `item`, resuming with its settlement.
    pub fn bind<M, K>(item: M, resume: K) -> Self
    where
        M: Into<Value>,
        K: FnOnce(Outcome) -> Result<Self, Value> + Send + 'static,
    {
        Self::Yield(item.into(), Box::new(resume))
    }

    /// Finishes the procedure with `value`.
    pub fn done<T: Into<Value>>(value: T) -> Self {
        Self::Return(value.into())
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yield(item, _) => formatter.debug_tuple("Yield").field(item).finish(),
            Self::Return(value) => formatter.debug_tuple("Return").field(value).finish(),
        }
    }
}

/// Runs a do-procedure to its final container.
///
/// - yielding a container suspends until it settles
/// - yielding anything else aborts with `Either::left(Failure::NonMonadYield)`
/// - returning `Err` (or panicking) aborts with `Either::left(raised)`
/// - returning a container hands it back unchanged; any other value is
///   wrapped in `Identity`
///
/// # Examples
///
/// ```rust
/// use monadic_do::control::{Step, run_do};
/// use monadic_do::value::{Failure, Value};
///
/// let aborted = run_do(|| Ok(Step::bind(42, |_| Ok(Step::done("unreachable")))));
/// assert!(!aborted.resolves());
/// assert_eq!(aborted.resolves_to(), Value::from(Failure::NonMonadYield));
/// ```
pub fn run_do<P>(procedure: P) -> Monad
where
    P: FnOnce() -> Result<Step, Value>,
{
    advance(attempt(procedure), 0)
}

/// Runs one piece of the procedure, treating a panic as a raise.
fn attempt<F>(piece: F) -> Result<Step, Value>
where
    F: FnOnce() -> Result<Step, Value>,
{
    catch_unwind(AssertUnwindSafe(piece))
        .unwrap_or_else(|payload| Err(Value::from(Failure::from_panic(payload.as_ref()))))
}

/// Drives steps until the procedure finishes or suspends on an `Async`.
///
/// Synchronous containers are settled in place, so the stack stays flat no
/// matter how many steps the procedure takes.
fn advance(mut step: Result<Step, Value>, mut index: usize) -> Monad {
    loop {
        let (monad, resume) = match step {
            Err(raised) => {
                tracing::debug!(step = index, raised = %raised, "do-procedure raised; aborting");
                return Either::left(raised);
            }
            Ok(Step::Return(value)) => {
                tracing::trace!(step = index, "do-procedure returned");
                return Monad::lift(value);
            }
            Ok(Step::Yield(Value::Monad(monad), resume)) => (*monad, resume),
            Ok(Step::Yield(item, _)) => {
                tracing::debug!(step = index, item = %item, "do-procedure yielded a non-container");
                return Either::left(Failure::NonMonadYield);
            }
        };

        tracing::trace!(step = index, variant = monad.name(), "do-procedure suspended");
        match monad.try_settle() {
            Ok(outcome) => step = attempt(move || resume(outcome)),
            Err(pending) => {
                return pending
                    .chain(move |outcome| Ok(Value::from(advance(resume(outcome), index + 1))));
            }
        }
        index += 1;
    }
}
