//! The dynamic payload carried by every container.
//!
//! Containers are polymorphic over what they hold: a Maybe may wrap a record
//! today and a string tomorrow, a rejection may carry a [`Failure`] or any
//! other value, and a callback may hand back either a plain value or another
//! container. [`Value`] is the closed set of shapes that can flow through a
//! chain.
//!
//! Two absence markers exist, mirroring the hosts this model is taken from:
//!
//! - [`Value::Missing`]: nothing was ever there (an absent record key,
//!   an out-of-range index, a callback that returned `()`).
//! - [`Value::Null`]: an explicit "no value".
//!
//! `Maybe` treats both as unresolvable and only ever exposes `Null`.
//!
//! # Examples
//!
//! ```rust
//! use monadic_do::value::Value;
//!
//! let document = Value::record([("a", Value::record([("b", "foo")]))]);
//! let b = document.property("a").and_then(|a| a.property("b"));
//! assert_eq!(b, Ok(Value::from("foo")));
//!
//! let c = document.property("c");
//! assert_eq!(c, Ok(Value::Missing));
//! ```

mod failure;

pub use failure::Failure;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::monad::{Monad, Promise};

/// A dynamically shaped value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Nothing was ever there.
    #[default]
    Missing,
    /// An explicit absence.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A string-keyed record.
    Record(BTreeMap<String, Value>),
    /// A raised failure.
    Failure(Failure),
    /// A container, not yet flattened.
    Monad(Box<Monad>),
    /// An asynchronous value handle.
    Promise(Promise),
    /// Any other host value, compared by identity.
    Opaque(Opaque),
}

/// A host value the library does not inspect.
///
/// Two `Opaque` values are equal only when they share the same allocation.
///
/// # Examples
///
/// ```rust
/// use monadic_do::value::Opaque;
///
/// let handle = Opaque::new(vec![1_u8, 2, 3]);
/// assert_eq!(handle.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));
/// assert_eq!(handle.clone(), handle);
/// ```
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    /// Wraps an arbitrary host value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the inner value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Opaque(..)")
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// =============================================================================
// Builders and Accessors
// =============================================================================

impl Value {
    /// Builds a [`Value::Record`] from key/value pairs.
    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Record(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Builds a [`Value::List`] from any sequence of convertible items.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Self>,
        I: IntoIterator<Item = V>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns `true` for [`Value::Null`] and [`Value::Missing`].
    #[inline]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Null | Self::Missing)
    }

    /// Returns `true` for [`Value::Missing`] only.
    #[inline]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns `true` for [`Value::Null`] only.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this value is a container.
    #[inline]
    pub const fn is_monad(&self) -> bool {
        matches!(self, Self::Monad(_))
    }

    /// Returns `true` if this value is an asynchronous value handle.
    #[inline]
    pub const fn is_promise(&self) -> bool {
        matches!(self, Self::Promise(_))
    }

    /// Returns the boolean, if this is one.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the number as a float; integers are widened.
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the record entries, if this is a record.
    pub const fn as_record(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Record(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the failure, if this is one.
    pub const fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns the container, if this is one.
    pub fn as_monad(&self) -> Option<&Monad> {
        match self {
            Self::Monad(monad) => Some(monad),
            _ => None,
        }
    }

    /// Consumes the value and returns the container, if this is one.
    pub fn into_monad(self) -> Option<Monad> {
        match self {
            Self::Monad(monad) => Some(*monad),
            _ => None,
        }
    }

    /// Returns the display text of a failure, or of any other value.
    ///
    /// Recovery handlers written as `|error| error.message()` work for any
    /// rejected value, not only for [`Failure`]s.
    pub fn message(&self) -> String {
        match self {
            Self::Failure(failure) => failure.message(),
            other => other.to_string(),
        }
    }

    /// Reads a property the way a dynamic host would.
    ///
    /// - records: the entry under `key`, or `Missing`
    /// - lists and strings: the element at the decimal index `key`, or
    ///   `Missing`; `"length"` yields the length
    /// - `Null`/`Missing`: raises [`Failure::PropertyOfAbsent`]
    /// - anything else: `Missing`
    ///
    /// # Errors
    ///
    /// Returns [`Failure::PropertyOfAbsent`] when reading from `Null` or
    /// `Missing`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monadic_do::value::{Failure, Value};
    ///
    /// assert_eq!(Value::from("foo").property("0"), Ok(Value::from("f")));
    /// assert_eq!(Value::from("foo").property("c"), Ok(Value::Missing));
    /// assert!(matches!(
    ///     Value::Null.property("c"),
    ///     Err(Failure::PropertyOfAbsent { .. })
    /// ));
    /// ```
    pub fn property(&self, key: &str) -> Result<Self, Failure> {
        match self {
            Self::Null | Self::Missing => Err(Failure::PropertyOfAbsent {
                property: key.to_string(),
                target: if self.is_null() { "null" } else { "missing" },
            }),
            Self::Record(entries) => Ok(entries.get(key).cloned().unwrap_or_default()),
            Self::List(items) => Ok(index_or_length(key, items.len(), |index| {
                items.get(index).cloned()
            })),
            Self::Str(text) => Ok(index_or_length(key, text.chars().count(), |index| {
                text.chars().nth(index).map(|character| Self::Str(character.to_string()))
            })),
            _ => Ok(Self::Missing),
        }
    }
}

fn index_or_length<F>(key: &str, length: usize, element: F) -> Value
where
    F: FnOnce(usize) -> Option<Value>,
{
    if key == "length" {
        return i64::try_from(length).map_or(Value::Missing, Value::Int);
    }
    key.parse::<usize>()
        .ok()
        .and_then(element)
        .unwrap_or_default()
}

// =============================================================================
// Equality
// =============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Missing, Self::Missing) | (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Str(left), Self::Str(right)) => left == right,
            (Self::List(left), Self::List(right)) => left == right,
            (Self::Record(left), Self::Record(right)) => left == right,
            (Self::Failure(left), Self::Failure(right)) => left == right,
            (Self::Monad(left), Self::Monad(right)) => left == right,
            (Self::Promise(left), Self::Promise(right)) => left == right,
            (Self::Opaque(left), Self::Opaque(right)) => left == right,
            _ => false,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Missing
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Failure> for Value {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

impl From<Monad> for Value {
    fn from(monad: Monad) -> Self {
        Self::Monad(Box::new(monad))
    }
}

impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        Self::Promise(promise)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Self::Opaque(opaque)
    }
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => formatter.write_str("missing"),
            Self::Null => formatter.write_str("null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Str(value) => formatter.write_str(value),
            Self::List(items) => {
                formatter.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{item}")?;
                }
                formatter.write_str("]")
            }
            Self::Record(entries) => {
                formatter.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{key}: {value}")?;
                }
                formatter.write_str("}")
            }
            Self::Failure(failure) => write!(formatter, "Error: {failure}"),
            Self::Monad(monad) => write!(formatter, "{monad}"),
            Self::Promise(promise) => write!(formatter, "{promise}"),
            Self::Opaque(_) => formatter.write_str("[opaque]"),
        }
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{Error, SerializeMap, SerializeSeq};

        match self {
            Self::Missing | Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Str(value) => serializer.serialize_str(value),
            Self::List(items) => {
                let mut sequence = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    sequence.serialize_element(item)?;
                }
                sequence.end()
            }
            Self::Record(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Failure(failure) => serde::Serialize::serialize(failure, serializer),
            Self::Monad(_) | Self::Promise(_) | Self::Opaque(_) => Err(S::Error::custom(format!(
                "cannot serialize {self}: only plain data values are serializable"
            ))),
        }
    }
}

#[cfg(feature = "serde")]
struct ValueVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any plain data value")
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
        Ok(Value::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
        Ok(Value::Int(value))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
        Ok(i64::try_from(value).map_or(Value::Float(value as f64), Value::Int))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
        Ok(Value::Float(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<Value, E> {
        Ok(Value::from(value))
    }

    fn visit_string<E>(self, value: String) -> Result<Value, E> {
        Ok(Value::Str(value))
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(item) = access.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Record(entries))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn document() -> Value {
        Value::record([("a", Value::record([("b", "foo")]))])
    }

    #[rstest]
    #[case(Value::Null, true)]
    #[case(Value::Missing, true)]
    #[case(Value::from(0), false)]
    #[case(Value::from(false), false)]
    #[case(Value::from(""), false)]
    fn is_absent_covers_both_markers(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(value.is_absent(), expected);
    }

    #[rstest]
    fn property_reads_nested_records() {
        let a = document().property("a").unwrap();
        assert_eq!(a.property("b"), Ok(Value::from("foo")));
        assert_eq!(a.property("z"), Ok(Value::Missing));
    }

    #[rstest]
    #[case("0", Value::from("f"))]
    #[case("2", Value::from("o"))]
    #[case("3", Value::Missing)]
    #[case("length", Value::from(3))]
    #[case("c", Value::Missing)]
    fn property_indexes_strings(#[case] key: &str, #[case] expected: Value) {
        assert_eq!(Value::from("foo").property(key), Ok(expected));
    }

    #[rstest]
    fn property_indexes_lists() {
        let list = Value::list([10, 20]);
        assert_eq!(list.property("1"), Ok(Value::from(20)));
        assert_eq!(list.property("5"), Ok(Value::Missing));
        assert_eq!(list.property("length"), Ok(Value::from(2)));
    }

    #[rstest]
    fn property_of_absent_raises() {
        assert_eq!(
            Value::Missing.property("d"),
            Err(Failure::PropertyOfAbsent {
                property: "d".to_string(),
                target: "missing",
            })
        );
    }

    #[rstest]
    fn property_of_scalar_is_missing() {
        assert_eq!(Value::from(42).property("x"), Ok(Value::Missing));
    }

    #[rstest]
    fn option_none_converts_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(1)), Value::from(1));
    }

    #[rstest]
    fn unit_converts_to_missing() {
        assert_eq!(Value::from(()), Value::Missing);
    }

    #[rstest]
    fn display_renders_nested_shapes() {
        let value = Value::record([("k", Value::list([Value::from(1), Value::Null]))]);
        assert_eq!(value.to_string(), "{k: [1, null]}");
        assert_eq!(Value::from(Failure::raised("boom")).to_string(), "Error: boom");
    }

    #[rstest]
    fn message_reads_failures_and_plain_values() {
        assert_eq!(Value::from(Failure::raised("meow?")).message(), "meow?");
        assert_eq!(Value::from("plain").message(), "plain");
    }

    #[rstest]
    fn opaque_equality_is_identity() {
        let first = Opaque::new(1_u8);
        let second = Opaque::new(1_u8);
        assert_eq!(Value::from(first.clone()), Value::from(first));
        assert_ne!(Value::from(Opaque::new(1_u8)), Value::from(second));
    }

    #[rstest]
    fn float_widening() {
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
        assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("2").as_f64(), None);
    }
}
