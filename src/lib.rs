//! # monadic-do
//!
//! A small algebraic-effect library: one container type with four variants
//! that uniformly represent "a value that may or may not be resolvable",
//! plus a do-notation interpreter that sequences them.
//!
//! ## Overview
//!
//! - **Value**: the dynamic payload containers carry ([`value::Value`])
//! - **Containers**: [`Identity`], [`Maybe`], [`Either`], [`Async`], and
//!   custom variants built with [`monad()`](monad::monad)
//! - **Do-notation**: [`run_do`] and [`do_block!`] for straight-line code
//!   that short-circuits on the first rejection
//!
//! Every container supports the same three operations:
//!
//! - `map` / `map_both`: run a callback on the resolved or rejected value
//! - `pass`: observe either branch without changing the result
//! - `to_promise` (or `.await`): settle into `Result<Value, Value>`
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for plain-data [`Value`]s
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use monadic_do::prelude::*;
//!
//! let message = Either::wrap(|| raise(Failure::raised("meow?")))
//!     .map_both(|value| value, |error| error.message());
//! assert_eq!(message.resolves_to(), Value::from("meow?"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types, traits and functions.
///
/// # Usage
///
/// ```rust
/// use monadic_do::prelude::*;
/// ```
pub mod prelude {
    pub use crate::control::*;
    pub use crate::do_block;
    pub use crate::monad::*;
    pub use crate::value::*;
}

pub mod control;
pub mod monad;
pub mod value;

pub use control::{Step, run_do};
pub use monad::{Async, Either, Identity, IntoOutcome, Maybe, Monad, Outcome, Promise, raise};
pub use value::{Failure, Value};
