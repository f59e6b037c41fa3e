//! Loosely typed input accepted by every field setter.
//!
//! `Input` is the single entry type for assignment: numbers, strings, native
//! `chrono` dates and times, geometry points, flat lists mixing all of these,
//! and JSON mappings for nested objects. Conversions from the common Rust and
//! `serde_json` types let callers write `field.set(1.5)` or
//! `field.set(inputs![now, 0, 1, 2])` without building `Input` by hand.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone};
use serde_json::{Map, Value as JsonValue};

/// A value offered to a field before coercion.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Calendar date without a time of day.
    Date(NaiveDate),
    /// Date and time without an offset.
    DateTime(NaiveDateTime),
    /// Date and time with a fixed UTC offset.
    DateTimeTz(DateTime<FixedOffset>),
    Point(GeoPoint),
    List(Vec<Input>),
    Map(Map<String, JsonValue>),
}

impl Input {
    /// Short name of the variant, used in type-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Input::Null => "null",
            Input::Bool(_) => "bool",
            Input::Number(_) => "number",
            Input::Text(_) => "text",
            Input::Date(_) => "date",
            Input::DateTime(_) => "datetime",
            Input::DateTimeTz(_) => "datetime",
            Input::Point(_) => "point",
            Input::List(_) => "list",
            Input::Map(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Input::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Input::Number(_))
    }

    /// True for values that can only be read as a time tag inside a sample
    /// sequence: strings and native dates/times.
    pub fn is_time_like(&self) -> bool {
        matches!(
            self,
            Input::Text(_) | Input::Date(_) | Input::DateTime(_) | Input::DateTimeTz(_)
        )
    }

    /// Wrap any external point type.
    pub fn point<P: PointLike + ?Sized>(p: &P) -> Self {
        Input::Point(GeoPoint::from_point_like(p))
    }
}

/// Capability exposed by external geometry points.
pub trait PointLike {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn z(&self) -> Option<f64> {
        None
    }
    /// Optional time the point was sampled at.
    fn time(&self) -> Option<Input> {
        None
    }
}

/// Plain 2D/3D point, optionally stamped with a time.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub t: Option<Box<Input>>,
}

impl GeoPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            t: None,
        }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            t: None,
        }
    }

    /// Stamp the point with a time.
    pub fn at(mut self, t: impl Into<Input>) -> Self {
        self.t = Some(Box::new(t.into()));
        self
    }

    pub fn from_point_like<P: PointLike + ?Sized>(p: &P) -> Self {
        Self {
            x: p.x(),
            y: p.y(),
            z: p.z(),
            t: p.time().map(Box::new),
        }
    }
}

impl PointLike for GeoPoint {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn z(&self) -> Option<f64> {
        self.z
    }
    fn time(&self) -> Option<Input> {
        self.t.as_deref().cloned()
    }
}

impl PointLike for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl PointLike for (f64, f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
    fn z(&self) -> Option<f64> {
        Some(self.2)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Input {
                fn from(v: $t) -> Self {
                    Input::Number(v as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<bool> for Input {
    fn from(v: bool) -> Self {
        Input::Bool(v)
    }
}

impl From<&str> for Input {
    fn from(v: &str) -> Self {
        Input::Text(v.to_string())
    }
}

impl From<String> for Input {
    fn from(v: String) -> Self {
        Input::Text(v)
    }
}

impl From<&String> for Input {
    fn from(v: &String) -> Self {
        Input::Text(v.clone())
    }
}

impl From<NaiveDate> for Input {
    fn from(v: NaiveDate) -> Self {
        Input::Date(v)
    }
}

impl From<NaiveDateTime> for Input {
    fn from(v: NaiveDateTime) -> Self {
        Input::DateTime(v)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Input {
    fn from(v: DateTime<Tz>) -> Self {
        let offset = v.offset().fix();
        Input::DateTimeTz(v.with_timezone(&offset))
    }
}

impl From<GeoPoint> for Input {
    fn from(v: GeoPoint) -> Self {
        Input::Point(v)
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Input::Null)
    }
}

impl<T: Into<Input>> From<Vec<T>> for Input {
    fn from(v: Vec<T>) -> Self {
        Input::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<Map<String, JsonValue>> for Input {
    fn from(v: Map<String, JsonValue>) -> Self {
        Input::Map(v)
    }
}

impl From<JsonValue> for Input {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Input::Null,
            JsonValue::Bool(b) => Input::Bool(b),
            // serde_json numbers are always representable as f64 unless
            // arbitrary_precision is on, which this crate does not enable.
            JsonValue::Number(n) => n.as_f64().map(Input::Number).unwrap_or(Input::Null),
            JsonValue::String(s) => Input::Text(s),
            JsonValue::Array(items) => Input::List(items.into_iter().map(Input::from).collect()),
            JsonValue::Object(map) => Input::Map(map),
        }
    }
}

impl From<&JsonValue> for Input {
    fn from(v: &JsonValue) -> Self {
        Input::from(v.clone())
    }
}

/// Build a heterogeneous [`Input::List`].
///
/// ```
/// use czml_core::{inputs, Input, GeoPoint};
/// let list = inputs!["2013-02-18T00:00:00", 0, 1.5, GeoPoint::new(0.0, 1.0)];
/// assert!(matches!(list, Input::List(ref items) if items.len() == 4));
/// ```
#[macro_export]
macro_rules! inputs {
    ($($item:expr),* $(,)?) => {
        $crate::Input::List(vec![$($crate::Input::from($item)),*])
    };
}
