//! Property-based tests for the container laws.
//!
//! - **Left identity**: `Identity::of(a).map(f) == f(a)` when `f` returns a container
//! - **Right identity**: mapping a resolving container with a container constructor
//!   is that constructor applied to the extracted value
//! - **Associativity**: `m.map(f).map(g) == m.map(|x| f(x).map(g))`
//! - **Sticky rejection**: a rejected container survives any number of `map`s
//! - **Exception safety**: `map` never panics, whatever the callback does

use monadic_do::prelude::*;
use proptest::prelude::*;

fn plain_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        Just(Value::Missing),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4).prop_map(Value::Record),
        ]
    })
}

fn container() -> impl Strategy<Value = Monad> {
    plain_value().prop_flat_map(|value| {
        prop_oneof![
            Just(Identity::of(value.clone())),
            Just(Maybe::of(value.clone())),
            Just(Either::right(value.clone())),
            Just(Either::left(value)),
        ]
    })
}

fn maybe_increment(value: Value) -> Monad {
    Maybe::of(value.as_i64().map(|n| n.wrapping_add(1)))
}

fn either_length(value: Value) -> Monad {
    value.property("length").map_or_else(Either::left, Either::right)
}

// =============================================================================
// Resolution
// =============================================================================

proptest! {
    /// Maybe resolves exactly for present values
    #[test]
    fn prop_maybe_resolves_iff_present(value in plain_value()) {
        prop_assert_eq!(Maybe::of(value.clone()).resolves(), !value.is_absent());
    }

    /// Identity always resolves to what it wraps
    #[test]
    fn prop_identity_always_resolves(value in plain_value()) {
        let identity = Identity::of(value.clone());
        prop_assert!(identity.resolves());
        prop_assert_eq!(identity.resolves_to(), value);
    }

    /// Either resolves by construction, not by payload
    #[test]
    fn prop_either_resolves_by_side(value in plain_value()) {
        prop_assert!(Either::right(value.clone()).resolves());
        prop_assert!(!Either::left(value).resolves());
    }
}

// =============================================================================
// Monad Laws
// =============================================================================

proptest! {
    /// Left identity
    #[test]
    fn prop_left_identity(value in plain_value()) {
        let left = Identity::of(value.clone()).map(maybe_increment);
        let right = maybe_increment(value);
        prop_assert_eq!(left, right);
    }

    /// Right identity for resolving containers
    #[test]
    fn prop_right_identity(value in plain_value()) {
        let maybe = Maybe::of(value.clone());
        let mapped = maybe.clone().map(Maybe::of);
        if maybe.resolves() {
            prop_assert_eq!(mapped, maybe);
        } else {
            prop_assert!(!mapped.resolves());
            prop_assert_eq!(mapped.resolves_to(), maybe.resolves_to());
        }
    }

    /// Associativity
    #[test]
    fn prop_associativity(monad in container()) {
        let left = monad.clone().map(maybe_increment).map(either_length);
        let right = monad.map(|value| maybe_increment(value).map(either_length));
        prop_assert_eq!(left.resolves(), right.resolves());
        prop_assert_eq!(left.resolves_to(), right.resolves_to());
    }
}

// =============================================================================
// Rejection and Exception Safety
// =============================================================================

proptest! {
    /// A rejection is kept through any number of maps
    #[test]
    fn prop_rejection_is_sticky(value in plain_value(), depth in 1_usize..8) {
        let mut chained = Either::left(value.clone());
        for _ in 0..depth {
            chained = chained.map(|_| "unreachable");
        }
        prop_assert!(!chained.resolves());
        prop_assert_eq!(chained.resolves_to(), value);
    }

    /// Raising from a callback always yields a left Either carrying the raised value
    #[test]
    fn prop_raise_becomes_left(monad in container(), raised in plain_value()) {
        let expected = raised.clone();
        let mapped = monad.map_both(move |_| raise(raised.clone()), {
            let raised = expected.clone();
            move |_| raise(raised)
        });
        prop_assert_eq!(mapped, Either::left(expected));
    }

    /// Panicking callbacks are recovered
    #[test]
    fn prop_panic_is_recovered(monad in container()) {
        let mapped = monad.map_both(|_| -> Value { panic!("law") }, |_| -> Value { panic!("law") });
        prop_assert!(!mapped.resolves());
        prop_assert_eq!(mapped.resolves_to().message(), "law");
    }

    /// Plain return values are wrapped in Identity
    #[test]
    fn prop_plain_values_are_wrapped(monad in container(), replacement in plain_value()) {
        let expected = replacement.clone();
        let mapped = monad.map_both(
            {
                let replacement = replacement.clone();
                move |_| replacement
            },
            move |_| replacement,
        );
        prop_assert_eq!(mapped, Identity::of(expected));
    }
}
