//! The record capability: how a type describes itself to the engine
//!
//! A validated type implements [`Record`] by listing its fields as [`Field`]
//! descriptors: the declared name, any number of `key -> tag string` pairs
//! (the engine only reads the key it was configured with), and the runtime
//! value as a [`FieldValue`]. Usually this is generated with
//! `#[derive(Record)]`:
//!
//! ```rust,ignore
//! use zero_validator::Record;
//!
//! #[derive(Record)]
//! struct User {
//!     #[tag(valid = "required,min=3")]
//!     name: String,
//!     #[tag(valid = "gte=18")]
//!     age: u32,
//! }
//! ```
//!
//! Writing the impl by hand is a few lines per type:
//!
//! ```rust,ignore
//! impl Record for User {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::new("Name", &self.name).tag("valid", "required,min=3"),
//!             Field::new("Age", &self.age).tag("valid", "gte=18"),
//!         ]
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use smallvec::SmallVec;

/// Per-record message overrides keyed by `"<normalized-field>.<rule>"`.
pub type MessageOverrides = HashMap<String, String>;

// ============================================================================
// RECORD
// ============================================================================

/// A type the engine can validate.
pub trait Record {
    /// Describes the record's fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Message overrides for this record, keyed by `"field.rule"`.
    ///
    /// Defaults to none, so every failure falls back to the engine's default
    /// message for the rule.
    fn messages(&self) -> MessageOverrides {
        MessageOverrides::new()
    }
}

/// Optional capability: a record that carries its own messages.
///
/// Derived records opt in with `#[record(messages)]`, which routes
/// [`Record::messages`] here.
pub trait FieldMessages {
    /// Returns the `"field.rule" -> template` overrides for this type.
    fn field_messages(&self) -> MessageOverrides;
}

impl<R: Record + ?Sized> Record for &R {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }

    fn messages(&self) -> MessageOverrides {
        (**self).messages()
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }

    fn messages(&self) -> MessageOverrides {
        (**self).messages()
    }
}

// ============================================================================
// FIELD
// ============================================================================

/// A single `key:"value"` tag attached to a field.
pub type FieldTag<'a> = (&'a str, &'a str);

/// What a field holds: a plain value or an embedded record.
#[derive(Clone, Copy)]
pub enum FieldSource<'a> {
    /// A value the rules run against.
    Value(FieldValue<'a>),
    /// An embedded record whose fields are flattened into the parent.
    Embedded(&'a dyn Record),
}

impl fmt::Debug for FieldSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Embedded(_) => f.write_str("Embedded(<record>)"),
        }
    }
}

/// Descriptor of one declared field.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    name: &'a str,
    tags: SmallVec<[FieldTag<'a>; 2]>,
    source: FieldSource<'a>,
}

impl<'a> Field<'a> {
    /// Describes a plain field.
    pub fn new<V>(name: &'a str, value: &'a V) -> Self
    where
        V: AsFieldValue + ?Sized,
    {
        Self::with_value(name, value.as_field_value())
    }

    /// Describes a plain field from an already-built value.
    pub fn with_value(name: &'a str, value: FieldValue<'a>) -> Self {
        Self {
            name,
            tags: SmallVec::new(),
            source: FieldSource::Value(value),
        }
    }

    /// Describes an embedded record.
    pub fn embedded(name: &'a str, record: &'a dyn Record) -> Self {
        Self {
            name,
            tags: SmallVec::new(),
            source: FieldSource::Embedded(record),
        }
    }

    /// Attaches a `key -> value` tag. Repeating a key keeps the first value.
    #[must_use = "builder methods must be chained or built"]
    pub fn tag(mut self, key: &'a str, value: &'a str) -> Self {
        self.tags.push((key, value));
        self
    }

    /// Declared field name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Tag string stored under `key`, if any.
    pub fn tag_value(&self, key: &str) -> Option<&'a str> {
        self.tags
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| *value)
    }

    /// All tags in declaration order.
    pub fn tags(&self) -> &[FieldTag<'a>] {
        &self.tags
    }

    /// The field's payload.
    pub fn source(&self) -> FieldSource<'a> {
        self.source
    }
}

// ============================================================================
// FIELD VALUE
// ============================================================================

/// Type category of a field value, used by rules to pick their semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Text.
    String,
    /// Signed integer.
    Int,
    /// Unsigned integer.
    Uint,
    /// Floating point number.
    Float,
    /// Boolean.
    Bool,
    /// Sequence or set; only its element count is visible.
    Collection,
    /// Key/value map; only its entry count is visible.
    Map,
    /// An absent optional value.
    Nil,
    /// An opaque nested record that is not validated.
    Struct,
}

impl Kind {
    /// Returns true for integer and floating point kinds.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Collection => "collection",
            Self::Map => "map",
            Self::Nil => "nil",
            Self::Struct => "struct",
        };
        f.write_str(name)
    }
}

/// Runtime value of a field as seen by rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Text.
    Str(&'a str),
    /// Signed integer, widened.
    Int(i64),
    /// Unsigned integer, widened.
    Uint(u64),
    /// Floating point number, widened.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Sequence or set with this many elements.
    ///
    /// Only the count is kept: messages render it in place of the elements,
    /// so `%s` for a three-element `Vec` becomes `3`.
    Collection(usize),
    /// Map with this many entries, rendered as the count like
    /// [`FieldValue::Collection`].
    Map(usize),
    /// `None`.
    Nil,
    /// Opaque nested record.
    Struct,
}

impl FieldValue<'_> {
    /// Type category of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Str(_) => Kind::String,
            Self::Int(_) => Kind::Int,
            Self::Uint(_) => Kind::Uint,
            Self::Float(_) => Kind::Float,
            Self::Bool(_) => Kind::Bool,
            Self::Collection(_) => Kind::Collection,
            Self::Map(_) => Kind::Map,
            Self::Nil => Kind::Nil,
            Self::Struct => Kind::Struct,
        }
    }

    /// Returns true if this is its type's zero value.
    ///
    /// Opaque structs are never zero: the engine cannot see inside them.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match *self {
            Self::Str(s) => s.is_empty(),
            Self::Int(n) => n == 0,
            Self::Uint(n) => n == 0,
            Self::Float(n) => n == 0.0,
            Self::Bool(b) => !b,
            Self::Collection(len) | Self::Map(len) => len == 0,
            Self::Nil => true,
            Self::Struct => false,
        }
    }

    /// Returns the text if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(n) => Some(n as f64),
            Self::Uint(n) => Some(n as f64),
            Self::Float(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Collection(len) | Self::Map(len) => write!(f, "{len}"),
            Self::Nil => f.write_str("<nil>"),
            Self::Struct => f.write_str("<struct>"),
        }
    }
}

// ============================================================================
// AS FIELD VALUE
// ============================================================================

/// Conversion from a Rust field to a [`FieldValue`].
pub trait AsFieldValue {
    /// Borrows `self` as a rule-visible value.
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for str {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl AsFieldValue for String {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl AsFieldValue for Cow<'_, str> {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

macro_rules! impl_as_field_value {
    ($variant:ident as $wide:ty: $($ty:ty),+) => {
        $(
            impl AsFieldValue for $ty {
                #[inline]
                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::$variant(<$wide>::from(*self))
                }
            }
        )+
    };
}

impl_as_field_value!(Int as i64: i8, i16, i32, i64);
impl_as_field_value!(Uint as u64: u8, u16, u32, u64);
impl_as_field_value!(Float as f64: f32, f64);
impl_as_field_value!(Bool as bool: bool);

impl AsFieldValue for isize {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Int(*self as i64)
    }
}

impl AsFieldValue for usize {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Uint(*self as u64)
    }
}

impl<T> AsFieldValue for [T] {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Collection(self.len())
    }
}

impl<T, const N: usize> AsFieldValue for [T; N] {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Collection(N)
    }
}

macro_rules! impl_collection {
    ($variant:ident: $($ty:ident<$($gen:ident),+>),+) => {
        $(
            impl<$($gen),+> AsFieldValue for $ty<$($gen),+> {
                #[inline]
                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::$variant(self.len())
                }
            }
        )+
    };
}

impl_collection!(Collection: Vec<T>, VecDeque<T>, HashSet<T, S>, BTreeSet<T>);
impl_collection!(Map: HashMap<K, V, S>, BTreeMap<K, V>);

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.as_field_value(),
            None => FieldValue::Nil,
        }
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Box<T> {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    #[inline]
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Login {
        email: String,
        attempts: u8,
    }

    impl Record for Login {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("Email", &self.email)
                    .tag("valid", "required")
                    .tag("json", "email"),
                Field::new("Attempts", &self.attempts),
            ]
        }
    }

    #[test]
    fn fields_keep_declaration_order_and_tags() {
        let login = Login {
            email: "a@b.c".into(),
            attempts: 2,
        };
        let fields = login.fields();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name(), "Email");
        assert_eq!(fields[0].tag_value("valid"), Some("required"));
        assert_eq!(fields[0].tag_value("json"), Some("email"));
        assert_eq!(fields[1].tag_value("valid"), None);
        assert!(login.messages().is_empty());
    }

    #[test]
    fn first_tag_for_a_key_wins() {
        let value = String::new();
        let field = Field::new("Name", &value).tag("valid", "a").tag("valid", "b");
        assert_eq!(field.tag_value("valid"), Some("a"));
    }

    #[test]
    fn values_map_to_kinds() {
        assert_eq!("x".as_field_value().kind(), Kind::String);
        assert_eq!((-3i32).as_field_value(), FieldValue::Int(-3));
        assert_eq!(7u16.as_field_value(), FieldValue::Uint(7));
        assert_eq!(1.5f32.as_field_value(), FieldValue::Float(1.5));
        assert_eq!(vec![1, 2, 3].as_field_value(), FieldValue::Collection(3));
        assert_eq!(HashMap::<String, u8>::new().as_field_value(), FieldValue::Map(0));
        assert_eq!(None::<String>.as_field_value(), FieldValue::Nil);
        assert_eq!(Some(5i64).as_field_value(), FieldValue::Int(5));
    }

    #[test]
    fn zero_values() {
        assert!(FieldValue::Str("").is_zero());
        assert!(FieldValue::Int(0).is_zero());
        assert!(FieldValue::Float(0.0).is_zero());
        assert!(FieldValue::Bool(false).is_zero());
        assert!(FieldValue::Collection(0).is_zero());
        assert!(FieldValue::Nil.is_zero());
        assert!(!FieldValue::Struct.is_zero());
        assert!(!FieldValue::Str("x").is_zero());
        assert!(!FieldValue::Uint(1).is_zero());
    }

    #[test]
    fn display_renders_raw_value() {
        assert_eq!(FieldValue::Str("ok").to_string(), "ok");
        assert_eq!(FieldValue::Int(17).to_string(), "17");
        assert_eq!(FieldValue::Collection(4).to_string(), "4");
        assert_eq!(FieldValue::Nil.to_string(), "<nil>");
    }
}
