//! Tests for custom variants built with the `monad` factory.

use monadic_do::prelude::*;
use rstest::rstest;

fn is_non_empty(value: &Value) -> bool {
    value
        .as_str()
        .map(|text| !text.is_empty())
        .or_else(|| value.as_list().map(|items| !items.is_empty()))
        .unwrap_or(false)
}

const NON_EMPTY: Variant = monad(is_non_empty, "NonEmpty");

#[rstest]
#[case(Value::from("text"), true)]
#[case(Value::from(""), false)]
#[case(Value::list([1]), true)]
#[case(Value::list(Vec::<Value>::new()), false)]
#[case(Value::Null, false)]
fn custom_variant_resolves_by_predicate(#[case] value: Value, #[case] expected: bool) {
    assert_eq!(NON_EMPTY.of(value).resolves(), expected);
}

#[rstest]
fn custom_variant_extracts_unchanged() {
    assert_eq!(NON_EMPTY.of(Value::Missing).resolves_to(), Value::Missing);
    assert_eq!(NON_EMPTY.of("x").resolves_to(), Value::from("x"));
}

#[rstest]
fn custom_variant_maps_with_the_shared_rules() {
    let mapped = NON_EMPTY.of("abc").map(|value| value.property("length"));
    assert_eq!(mapped, Identity::of(3));

    let skipped = NON_EMPTY.of("").map(|_| "unreachable");
    assert!(!skipped.resolves());
    assert_eq!(skipped.resolves_to(), Value::from(""));
}

#[rstest]
fn custom_variant_displays_its_name() {
    assert_eq!(NON_EMPTY.of("x").to_string(), "<NonEmpty(x)>");
    assert_eq!(NON_EMPTY.name(), "NonEmpty");
}

#[rstest]
fn custom_variant_participates_in_do_blocks() {
    let result = do_block! {
        first <= NON_EMPTY.of("a");
        second <= NON_EMPTY.of("");
        format!("{first}{second}")
    };
    assert_eq!(result, Either::left(""));
}

#[rstest]
#[tokio::test]
async fn custom_variant_settles_through_to_promise() {
    assert_eq!(NON_EMPTY.of("x").await, Ok(Value::from("x")));
    assert_eq!(NON_EMPTY.of("").await, Err(Value::from("")));
}
