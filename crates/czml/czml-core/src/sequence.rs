//! Decoding of flat sample sequences into coordinate and color records.
//!
//! CZML packs samples into one flat array. Untagged data is a single record
//! (`[x, y, z]`); time-varying data interleaves a time before every record
//! (`[t0, x, y, z, t1, x, y, z, ...]`), where a time is ISO-8601 text or a
//! number of seconds past the property's epoch. On input, points may stand in
//! for a record's components, and a point's own time stamps its record.
//!
//! Rules, for a record type of width `W`:
//! - A list of numbers only is one untagged record when its length is `W`
//!   (or `W - 1` for records with a fill value), and a tagged sequence with
//!   numeric times when its length is a multiple of `W + 1`.
//! - A list starting with a timestamp-like value is tagged: every record
//!   starts with a time, then exactly `W` numbers or one point.
//! - Components and point coordinates must be finite.
//! - A list starting with a point is untagged; later records may still be
//!   preceded by a timestamp-like marker.
//! - More than one record requires every record to carry a time.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::{CzmlError, Result};
use crate::input::{GeoPoint, Input};
use crate::time::{normalize_time_or_number, TimeOrNumber};

/// A fixed-width sample record that a flat sequence decodes into.
pub trait Record: Clone + std::fmt::Debug + PartialEq {
    /// Components per record, not counting the time tag.
    const WIDTH: usize;
    /// Value of the last component when the input supplies `WIDTH - 1`.
    const FILL: Option<f64>;
    /// Human readable record name for error messages.
    const NAME: &'static str;

    /// Build from exactly `WIDTH` components.
    fn from_components(components: &[f64], t: Option<TimeOrNumber>) -> Result<Self>;

    fn from_point(point: &GeoPoint, t: Option<TimeOrNumber>) -> Result<Self>;

    fn time(&self) -> Option<&TimeOrNumber>;

    /// Append this record's components (without its time) to `out`.
    fn write_components(&self, out: &mut Vec<JsonValue>);
}

/// One position sample. `z` is 0 when the input gave only `x` and `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: Option<TimeOrNumber>,
}

impl CoordinateRecord {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, t: None }
    }

    pub fn at(mut self, t: TimeOrNumber) -> Self {
        self.t = Some(t);
        self
    }
}

impl Record for CoordinateRecord {
    const WIDTH: usize = 3;
    const FILL: Option<f64> = Some(0.0);
    const NAME: &'static str = "coordinate";

    fn from_components(c: &[f64], t: Option<TimeOrNumber>) -> Result<Self> {
        Ok(Self {
            x: c[0],
            y: c[1],
            z: c[2],
            t,
        })
    }

    fn from_point(point: &GeoPoint, t: Option<TimeOrNumber>) -> Result<Self> {
        Ok(Self {
            x: point.x,
            y: point.y,
            z: point.z.unwrap_or(0.0),
            t,
        })
    }

    fn time(&self) -> Option<&TimeOrNumber> {
        self.t.as_ref()
    }

    fn write_components(&self, out: &mut Vec<JsonValue>) {
        out.extend([self.x, self.y, self.z].map(JsonValue::from));
    }
}

/// Color sample with integer channels in 0..=255.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbaRecord {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    pub t: Option<TimeOrNumber>,
}

impl RgbaRecord {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a, t: None }
    }
}

fn channel(value: f64) -> Result<u8> {
    if value.fract() == 0.0 && (0.0..=255.0).contains(&value) {
        Ok(value as u8)
    } else {
        Err(CzmlError::mismatch("integer color channel in 0..=255", "number"))
    }
}

impl Record for RgbaRecord {
    const WIDTH: usize = 4;
    const FILL: Option<f64> = Some(1.0);
    const NAME: &'static str = "rgba";

    fn from_components(c: &[f64], t: Option<TimeOrNumber>) -> Result<Self> {
        Ok(Self {
            r: channel(c[0])?,
            g: channel(c[1])?,
            b: channel(c[2])?,
            a: channel(c[3])?,
            t,
        })
    }

    fn from_point(_point: &GeoPoint, _t: Option<TimeOrNumber>) -> Result<Self> {
        Err(CzmlError::mismatch("color channels", "point"))
    }

    fn time(&self) -> Option<&TimeOrNumber> {
        self.t.as_ref()
    }

    fn write_components(&self, out: &mut Vec<JsonValue>) {
        out.extend([self.r, self.g, self.b, self.a].map(JsonValue::from));
    }
}

/// Color sample with floating point channels, nominally 0.0..=1.0.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbafRecord {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
    pub t: Option<TimeOrNumber>,
}

impl RgbafRecord {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a, t: None }
    }
}

impl Record for RgbafRecord {
    const WIDTH: usize = 4;
    const FILL: Option<f64> = Some(1.0);
    const NAME: &'static str = "rgbaf";

    fn from_components(c: &[f64], t: Option<TimeOrNumber>) -> Result<Self> {
        Ok(Self {
            r: c[0],
            g: c[1],
            b: c[2],
            a: c[3],
            t,
        })
    }

    fn from_point(_point: &GeoPoint, _t: Option<TimeOrNumber>) -> Result<Self> {
        Err(CzmlError::mismatch("color channels", "point"))
    }

    fn time(&self) -> Option<&TimeOrNumber> {
        self.t.as_ref()
    }

    fn write_components(&self, out: &mut Vec<JsonValue>) {
        out.extend([self.r, self.g, self.b, self.a].map(JsonValue::from));
    }
}

/// Ordered, decoded samples of one sequence field.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence<R: Record> {
    records: Vec<R>,
}

pub type Coordinates = Sequence<CoordinateRecord>;
pub type RgbaSamples = Sequence<RgbaRecord>;
pub type RgbafSamples = Sequence<RgbafRecord>;

impl<R: Record> Sequence<R> {
    /// Build from already-typed records, enforcing the tagging rule.
    pub fn from_records(records: Vec<R>) -> Result<Self> {
        check_tags(&records, records.len())?;
        if records.is_empty() {
            return Err(CzmlError::malformed(0, "empty sequence"));
        }
        Ok(Self { records })
    }

    /// Decode a flat sequence or a single point.
    pub fn decode(input: &Input) -> Result<Self> {
        match input {
            Input::Point(p) => {
                check_point(p)?;
                let t = point_time(p)?;
                Ok(Self {
                    records: vec![R::from_point(p, t)?],
                })
            }
            Input::List(items) => decode_list(items).map(|records| Self { records }),
            other => Err(CzmlError::mismatch("sample sequence", other.kind_name())),
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when records carry times and emit interleaved.
    pub fn is_tagged(&self) -> bool {
        self.records.iter().any(|r| r.time().is_some())
    }

    /// Flatten back to the wire array.
    pub fn to_json(&self) -> JsonValue {
        let tagged = self.is_tagged();
        let stride = R::WIDTH + usize::from(tagged);
        let mut out = Vec::with_capacity(self.records.len() * stride);
        for record in &self.records {
            if let Some(t) = record.time() {
                out.push(t.to_json());
            }
            record.write_components(&mut out);
        }
        JsonValue::Array(out)
    }
}

fn point_time(p: &GeoPoint) -> Result<Option<TimeOrNumber>> {
    match p.t.as_deref() {
        Some(t) => normalize_time_or_number(t),
        None => Ok(None),
    }
}

fn as_numbers(items: &[Input]) -> Vec<f64> {
    items
        .iter()
        .filter_map(|item| match item {
            Input::Number(n) => Some(*n),
            _ => None,
        })
        .collect()
}

fn check_point(p: &GeoPoint) -> Result<()> {
    let finite = p.x.is_finite() && p.y.is_finite() && p.z.map_or(true, f64::is_finite);
    if finite {
        Ok(())
    } else {
        Err(CzmlError::mismatch("finite point coordinates", "non-finite number"))
    }
}

fn check_tags<R: Record>(records: &[R], len: usize) -> Result<()> {
    if records.len() > 1 && records.iter().any(|r| r.time().is_none()) {
        return Err(CzmlError::malformed(
            len,
            format!("multiple {} samples must all carry a time", R::NAME),
        ));
    }
    Ok(())
}

fn decode_list<R: Record>(items: &[Input]) -> Result<Vec<R>> {
    let len = items.len();
    let first = items
        .first()
        .ok_or_else(|| CzmlError::malformed(0, "empty sequence"))?;
    if let Some(bad) = items.iter().find(|item| {
        matches!(
            item,
            Input::Null | Input::Bool(_) | Input::List(_) | Input::Map(_)
        )
    }) {
        return Err(CzmlError::mismatch(
            "number, timestamp or point",
            bad.kind_name(),
        ));
    }
    for item in items {
        match item {
            Input::Number(n) if !n.is_finite() => {
                return Err(CzmlError::mismatch("finite number", "non-finite number"))
            }
            Input::Point(p) => check_point(p)?,
            _ => {}
        }
    }

    let tagged = if items.iter().all(Input::is_number) {
        let short = R::FILL.is_some() && len == R::WIDTH - 1;
        if len == R::WIDTH || short {
            log::trace!("{}: single untagged sample of {len} numbers", R::NAME);
            let mut components = as_numbers(items);
            if let (true, Some(fill)) = (short, R::FILL) {
                components.push(fill);
            }
            return Ok(vec![R::from_components(&components, None)?]);
        }
        if len % (R::WIDTH + 1) != 0 {
            return Err(CzmlError::malformed(
                len,
                format!(
                    "expected {} numbers or a multiple of {} time-tagged values",
                    R::WIDTH,
                    R::WIDTH + 1
                ),
            ));
        }
        true
    } else {
        !matches!(first, Input::Point(_))
    };
    log::trace!("{}: decoding {len} values, tagged={tagged}", R::NAME);

    let mut records = Vec::new();
    let mut i = 0;
    while i < len {
        let mut tag = None;
        let head = &items[i];
        if head.is_time_like() || (tagged && head.is_number()) {
            tag = normalize_time_or_number(head)?;
            i += 1;
        }
        let record = match items.get(i) {
            None => return Err(CzmlError::malformed(len, "time without a sample")),
            Some(Input::Point(p)) => {
                i += 1;
                let t = point_time(p)?.or(tag);
                R::from_point(p, t)?
            }
            Some(_) => {
                let run = items[i..]
                    .iter()
                    .take(R::WIDTH)
                    .take_while(|item| item.is_number())
                    .count();
                // The short fill form is only accepted for a lone untagged record.
                if run != R::WIDTH {
                    return Err(CzmlError::malformed(
                        len,
                        format!(
                            "{} sample at index {i} has {run} of {} components",
                            R::NAME,
                            R::WIDTH
                        ),
                    ));
                }
                let components = as_numbers(&items[i..i + run]);
                i += run;
                R::from_components(&components, tag)?
            }
        };
        records.push(record);
    }

    check_tags(&records, len)?;
    Ok(records)
}

impl<R: Record> Serialize for Sequence<R> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de, R: Record> Deserialize<'de> for Sequence<R> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = JsonValue::deserialize(deserializer)?;
        Sequence::decode(&Input::from(v)).map_err(de::Error::custom)
    }
}
