//! Property object model: typed fields bound to coercion strategies.
//!
//! Each object type declares its fields once, with the [`property_object!`]
//! macro, as `"wireName" => rust_name: Strategy`. The macro generates the
//! struct, its `Default`, the name → field table behind [`PropertyObject`],
//! and serde impls that go through [`PropertyObject::data`] and
//! [`PropertyObject::load`].
//!
//! [`property_object!`]: crate::property_object

use std::fmt;
use std::marker::PhantomData;

use serde_json::{Map, Value as JsonValue};

use crate::config::Config;
use crate::error::{CzmlError, Result};
use crate::input::Input;
use crate::sequence::{Record, Sequence};
use crate::time::{normalize_number, normalize_time, normalize_time_or_number, TimeOrNumber};

/// Coarse coercion category of a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    Scalar,
    TimeOrNumber,
    Sequence,
    NestedObject,
}

/// How a field turns loose [`Input`] into its stored value and back.
pub trait Strategy {
    type Value: Clone + fmt::Debug + PartialEq;
    const CATEGORY: Category;

    /// `Ok(None)` clears the field.
    fn coerce(input: &Input) -> Result<Option<Self::Value>>;

    /// `None` means the value is not emitted (e.g. an empty nested object).
    fn emit(value: &Self::Value) -> Option<JsonValue>;
}

/// Free text.
pub struct Text;

impl Strategy for Text {
    type Value = String;
    const CATEGORY: Category = Category::Scalar;

    fn coerce(input: &Input) -> Result<Option<String>> {
        match input {
            Input::Null => Ok(None),
            Input::Text(s) => Ok(Some(s.clone())),
            other => Err(CzmlError::mismatch("text", other.kind_name())),
        }
    }

    fn emit(value: &String) -> Option<JsonValue> {
        Some(JsonValue::String(value.clone()))
    }
}

/// Boolean.
pub struct Flag;

impl Strategy for Flag {
    type Value = bool;
    const CATEGORY: Category = Category::Scalar;

    fn coerce(input: &Input) -> Result<Option<bool>> {
        match input {
            Input::Null => Ok(None),
            Input::Bool(b) => Ok(Some(*b)),
            other => Err(CzmlError::mismatch("bool", other.kind_name())),
        }
    }

    fn emit(value: &bool) -> Option<JsonValue> {
        Some(JsonValue::Bool(*value))
    }
}

pub struct Number;

impl Strategy for Number {
    type Value = f64;
    const CATEGORY: Category = Category::Scalar;

    fn coerce(input: &Input) -> Result<Option<f64>> {
        normalize_number(input)
    }

    /// Integral values within the exact `f64` integer range emit as JSON integers.
    fn emit(value: &f64) -> Option<JsonValue> {
        if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
            Some(JsonValue::from(*value as i64))
        } else {
            Some(JsonValue::from(*value))
        }
    }
}

const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Timestamp stored as ISO-8601 text.
pub struct Timestamp;

impl Strategy for Timestamp {
    type Value = String;
    const CATEGORY: Category = Category::TimeOrNumber;

    fn coerce(input: &Input) -> Result<Option<String>> {
        normalize_time(input)
    }

    fn emit(value: &String) -> Option<JsonValue> {
        Some(JsonValue::String(value.clone()))
    }
}

/// Timestamp or number of seconds.
pub struct Temporal;

impl Strategy for Temporal {
    type Value = TimeOrNumber;
    const CATEGORY: Category = Category::TimeOrNumber;

    fn coerce(input: &Input) -> Result<Option<TimeOrNumber>> {
        normalize_time_or_number(input)
    }

    fn emit(value: &TimeOrNumber) -> Option<JsonValue> {
        Some(value.to_json())
    }
}

/// Flat sample sequence of `R` records.
pub struct Samples<R>(PhantomData<R>);

impl<R: Record> Strategy for Samples<R> {
    type Value = Sequence<R>;
    const CATEGORY: Category = Category::Sequence;

    fn coerce(input: &Input) -> Result<Option<Sequence<R>>> {
        match input {
            Input::Null => Ok(None),
            other => Sequence::decode(other).map(Some),
        }
    }

    fn emit(value: &Sequence<R>) -> Option<JsonValue> {
        Some(value.to_json())
    }
}

/// Sub-object loaded from a mapping (or its JSON text).
pub struct Nested<T>(PhantomData<T>);

impl<T: PropertyObject> Strategy for Nested<T> {
    type Value = T;
    const CATEGORY: Category = Category::NestedObject;

    fn coerce(input: &Input) -> Result<Option<T>> {
        if input.is_null() {
            return Ok(None);
        }
        let mut object = T::default();
        object.load(input.clone())?;
        Ok(Some(object))
    }

    fn emit(value: &T) -> Option<JsonValue> {
        let map = value.emit();
        (!map.is_empty()).then_some(JsonValue::Object(map))
    }
}

/// One named property slot.
pub struct Field<S: Strategy> {
    value: Option<S::Value>,
    default: Option<S::Value>,
}

impl<S: Strategy> Field<S> {
    pub fn new() -> Self {
        Self {
            value: None,
            default: None,
        }
    }

    /// Declare a field whose default is emitted alongside any other set field
    /// of the same object.
    pub fn with_default(default: S::Value) -> Self {
        Self {
            value: None,
            default: Some(default),
        }
    }

    /// Coerce and store. On error the previous value is kept.
    pub fn set(&mut self, input: impl Into<Input>) -> Result<()> {
        self.value = S::coerce(&input.into())?;
        Ok(())
    }

    /// Store an already-typed value.
    pub fn assign(&mut self, value: S::Value) {
        self.value = Some(value);
    }

    pub fn get(&self) -> Option<&S::Value> {
        self.value.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut S::Value> {
        self.value.as_mut()
    }

    pub fn default_value(&self) -> Option<&S::Value> {
        self.default.as_ref()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn take(&mut self) -> Option<S::Value> {
        self.value.take()
    }

    pub fn emit(&self) -> Option<JsonValue> {
        self.value.as_ref().and_then(S::emit)
    }
}

impl<T: PropertyObject> Field<Nested<T>> {
    /// Mutable access to the sub-object, creating an empty one if unset.
    pub fn edit(&mut self) -> &mut T {
        self.value.get_or_insert_with(T::default)
    }
}

impl<S: Strategy> Default for Field<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Strategy> Clone for Field<S> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            default: self.default.clone(),
        }
    }
}

impl<S: Strategy> fmt::Debug for Field<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("value", &self.value)
            .field("default", &self.default)
            .finish()
    }
}

impl<S: Strategy> PartialEq for Field<S> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.default == other.default
    }
}

/// Object-safe view of a [`Field`], used by the per-type name table.
pub trait AnyField {
    fn category(&self) -> Category;
    fn set_input(&mut self, input: Input) -> Result<()>;
    fn emit(&self) -> Option<JsonValue>;
    fn emit_default(&self) -> Option<JsonValue>;
    fn is_set(&self) -> bool;
    fn clear(&mut self);
}

impl<S: Strategy> AnyField for Field<S> {
    fn category(&self) -> Category {
        S::CATEGORY
    }

    fn set_input(&mut self, input: Input) -> Result<()> {
        self.set(input)
    }

    fn emit(&self) -> Option<JsonValue> {
        Field::emit(self)
    }

    fn emit_default(&self) -> Option<JsonValue> {
        self.default.as_ref().and_then(S::emit)
    }

    fn is_set(&self) -> bool {
        Field::is_set(self)
    }

    fn clear(&mut self) {
        Field::clear(self)
    }
}

/// A named collection of fields that emits to and loads from a JSON mapping.
pub trait PropertyObject: Default + Clone + fmt::Debug + PartialEq {
    /// Wire names in declaration order.
    const FIELD_NAMES: &'static [&'static str];

    fn field(&self, name: &str) -> Option<&dyn AnyField>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn AnyField>;

    /// Mapping of every set field. Declared defaults join in only when at
    /// least one field is set, so an untouched object emits `{}`.
    fn emit(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        for name in Self::FIELD_NAMES {
            if let Some(v) = self.field(name).and_then(|f| f.emit()) {
                map.insert((*name).to_string(), v);
            }
        }
        if map.is_empty() {
            return map;
        }
        for name in Self::FIELD_NAMES {
            if map.contains_key(*name) {
                continue;
            }
            if let Some(v) = self.field(name).and_then(|f| f.emit_default()) {
                map.insert((*name).to_string(), v);
            }
        }
        map
    }

    fn data(&self) -> JsonValue {
        JsonValue::Object(self.emit())
    }

    fn is_empty(&self) -> bool {
        Self::FIELD_NAMES
            .iter()
            .all(|name| self.field(name).map_or(true, |f| f.emit().is_none()))
    }

    /// Assign a field by wire name.
    fn set_field(&mut self, name: &str, input: impl Into<Input>) -> Result<()> {
        let field = self
            .field_mut(name)
            .ok_or_else(|| CzmlError::UnknownField(name.to_string()))?;
        field.set_input(input.into())
    }

    /// Load from a mapping or its JSON text. Unknown keys are skipped.
    fn load(&mut self, input: impl Into<Input>) -> Result<()> {
        match input.into() {
            Input::Map(map) => self.load_map(&map),
            Input::Text(text) => self.loads(&text),
            other => Err(CzmlError::mismatch("mapping", other.kind_name())),
        }
    }

    fn load_map(&mut self, map: &Map<String, JsonValue>) -> Result<()> {
        for (key, value) in map {
            match self.field_mut(key) {
                Some(field) => field.set_input(Input::from(value))?,
                None => log::debug!("ignoring unknown key '{key}'"),
            }
        }
        Ok(())
    }

    fn loads(&mut self, text: &str) -> Result<()> {
        match serde_json::from_str::<JsonValue>(text)? {
            JsonValue::Object(map) => self.load_map(&map),
            other => Err(CzmlError::mismatch("mapping", Input::from(other).kind_name())),
        }
    }

    fn dumps(&self) -> String {
        self.data().to_string()
    }

    fn dumps_with(&self, config: &Config) -> String {
        config.render(&self.data())
    }

    /// Build a fresh object from a mapping or its JSON text.
    fn parse(input: impl Into<Input>) -> Result<Self> {
        let mut object = Self::default();
        object.load(input)?;
        Ok(object)
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __czml_field_init {
    () => {
        $crate::property::Field::new()
    };
    ($default:expr) => {
        $crate::property::Field::with_default($default)
    };
}

/// Declare a property object.
///
/// ```
/// use czml_core::property::{Flag, Text};
/// use czml_core::PropertyObject;
///
/// czml_core::property_object! {
///     /// A tag with a caption.
///     pub struct Tag {
///         "caption" => caption: Text,
///         "show" => show: Flag = false,
///     }
/// }
///
/// let mut tag = Tag::default();
/// tag.caption.set("hello").unwrap();
/// assert_eq!(tag.dumps(), r#"{"caption":"hello","show":false}"#);
/// ```
#[macro_export]
macro_rules! property_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $wire:literal => $field:ident : $strategy:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $crate::property::Field<$strategy>,
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $crate::__czml_field_init!($($default)?), )*
                }
            }
        }

        impl $crate::property::PropertyObject for $name {
            const FIELD_NAMES: &'static [&'static str] = &[$($wire),*];

            fn field(&self, name: &str) -> Option<&dyn $crate::property::AnyField> {
                match name {
                    $( $wire => Some(&self.$field), )*
                    _ => None,
                }
            }

            fn field_mut(&mut self, name: &str) -> Option<&mut dyn $crate::property::AnyField> {
                match name {
                    $( $wire => Some(&mut self.$field), )*
                    _ => None,
                }
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serde::Serialize::serialize(
                    &$crate::property::PropertyObject::emit(self),
                    serializer,
                )
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let map = <$crate::__private::serde_json::Map<String, $crate::__private::serde_json::Value>
                    as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::property::PropertyObject>::parse(map)
                    .map_err($crate::__private::serde::de::Error::custom)
            }
        }
    };
}
