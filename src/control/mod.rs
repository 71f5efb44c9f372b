//! Do-notation over containers.
//!
//! This module lets calling code write straight-line sequential logic over
//! any mix of containers:
//!
//! - [`Step`] and [`run_do`]: the explicit step machine and its interpreter
//! - [`do_block!`](crate::do_block): sugar that writes the steps for you
//!
//! # Syntax
//!
//! ```text
//! do_block! {
//!     name <= container;         // suspend; a rejection aborts the block
//!     _ <= container;            // suspend and discard
//!     outcome <=? container;     // suspend and bind Ok/Err to match on
//!     let pattern = expression;  // pure let binding
//!     expression                 // final value or container
//! }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use monadic_do::do_block;
//! use monadic_do::monad::Maybe;
//! use monadic_do::value::Value;
//!
//! let document = Value::record([("a", Value::record([("b", "foo")]))]);
//!
//! let found = do_block! {
//!     a <= Maybe::of(document.property("a").unwrap_or_default());
//!     b <= Maybe::of(a.property("b").unwrap_or_default());
//!     b
//! };
//! assert_eq!(found.resolves_to(), Value::from("foo"));
//! ```

mod do_macro;
mod interpreter;

pub use interpreter::{Resume, Step, run_do};
