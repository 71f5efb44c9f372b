//! `do_block!` macro for do-notation style procedures.
//!
//! Writing [`Step`](crate::control::Step)s by hand nests one closure per
//! suspension point. `do_block!` writes that nesting for you and runs the
//! result through [`run_do`](crate::control::run_do).
//!
//! # Syntax
//!
//! - `name <= container;` - bind: suspend, then bind the resolved value;
//!   a rejection aborts the block
//! - `_ <= container;` - bind and discard
//! - `name <=? container;` - bind the whole [`Outcome`](crate::monad::Outcome),
//!   so a rejection can be matched instead of aborting
//! - `let pattern = expression;` - pure let binding
//! - `expression` - final value (a container is returned unchanged)
//!
//! # Operator Choice
//!
//! `<-` is not a single token in Rust macro patterns; `<=` reads as
//! "bind from" and is.
//!
//! # Examples
//!
//! ```rust
//! use monadic_do::do_block;
//! use monadic_do::monad::{Either, Maybe};
//! use monadic_do::value::Value;
//!
//! let result = do_block! {
//!     x <= Maybe::of(5);
//!     y <= Either::right(10);
//!     let total = x.as_i64().unwrap_or(0) + y.as_i64().unwrap_or(0);
//!     Maybe::of(total * 2)
//! };
//! assert_eq!(result.resolves_to(), Value::from(30));
//!
//! let recovered = do_block! {
//!     attempt <=? Either::left("boom");
//!     attempt.unwrap_or_else(|reason| Value::from(format!("caught {reason}")))
//! };
//! assert_eq!(recovered.resolves_to(), Value::from("caught boom"));
//! ```

/// Runs a do-notation block.
///
/// See the [module documentation](crate::control) for the syntax.
#[macro_export]
macro_rules! do_block {
    ($($body:tt)+) => {
        $crate::control::run_do(move || $crate::__do_steps!($($body)+))
    };
}

/// Expands the body of a [`do_block!`] into nested steps.
#[doc(hidden)]
#[macro_export]
macro_rules! __do_steps {
    // ==========================================================================
    // Let binding: let pattern = expression; rest
    // ==========================================================================

    (let $pattern:pat = $expr:expr ; $($rest:tt)+) => {{
        let $pattern = $expr;
        $crate::__do_steps!($($rest)+)
    }};

    // ==========================================================================
    // Bind operations
    // ==========================================================================

    // Bind the whole outcome; must precede `<=` so `?` is never parsed as an
    // expression.
    ($pattern:ident <=? $monad:expr ; $($rest:tt)+) => {
        ::core::result::Result::Ok($crate::control::Step::bind($monad, move |$pattern| {
            $crate::__do_steps!($($rest)+)
        }))
    };

    (_ <= $monad:expr ; $($rest:tt)+) => {
        ::core::result::Result::Ok($crate::control::Step::bind($monad, move |resumed| {
            let _ = resumed?;
            $crate::__do_steps!($($rest)+)
        }))
    };

    ($pattern:ident <= $monad:expr ; $($rest:tt)+) => {
        ::core::result::Result::Ok($crate::control::Step::bind($monad, move |resumed| {
            let $pattern = resumed?;
            $crate::__do_steps!($($rest)+)
        }))
    };

    // ==========================================================================
    // Terminal case
    // ==========================================================================

    ($result:expr) => {
        ::core::result::Result::Ok($crate::control::Step::done($result))
    };
}

#[cfg(test)]
mod tests {
    use crate::monad::{Async, Either, Identity, Maybe, Promise};
    use crate::value::{Failure, Value};

    #[test]
    fn binds_in_sequence() {
        let result = do_block! {
            x <= Identity::of(2);
            y <= Maybe::of(3);
            x.as_i64().unwrap_or(0) * y.as_i64().unwrap_or(0)
        };
        assert_eq!(result, Identity::of(6));
    }

    #[test]
    fn let_binding() {
        let result = do_block! {
            x <= Identity::of(4);
            let doubled = x.as_i64().map(|n| n * 2);
            doubled
        };
        assert_eq!(result.resolves_to(), Value::from(8));
    }

    #[test]
    fn short_circuits_on_rejection() {
        let result = do_block! {
            _x <= Maybe::of(1);
            _y <= Maybe::of(Value::Null);
            "unreachable"
        };
        assert_eq!(result, Either::left(Value::Null));
    }

    #[test]
    fn wildcard_bind_still_short_circuits() {
        let result = do_block! {
            _ <= Either::left("stop");
            "unreachable"
        };
        assert_eq!(result, Either::left("stop"));
    }

    #[test]
    fn outcome_bind_catches() {
        let result = do_block! {
            attempt <=? Maybe::of(Value::Missing);
            match attempt {
                Ok(value) => value,
                Err(_) => Value::from("default"),
            }
        };
        assert_eq!(result, Identity::of("default"));
    }

    #[test]
    fn non_container_bind_aborts() {
        let result = do_block! {
            _x <= 5;
            "unreachable"
        };
        assert_eq!(result, Either::left(Failure::NonMonadYield));
    }

    #[test]
    fn final_container_is_returned_unchanged() {
        let result = do_block! {
            Either::left("as-is")
        };
        assert_eq!(result, Either::left("as-is"));
    }

    #[tokio::test]
    async fn mixes_async_and_sync_steps() {
        let result = do_block! {
            x <= Async::of(Promise::resolve("a"));
            y <= Maybe::of("b");
            format!("{x}{y}")
        };
        assert_eq!(result.await, Ok(Value::from("ab")));
    }
}
