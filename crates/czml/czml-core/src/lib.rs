//! czml-core: typed CZML object model (engine-agnostic)
//!
//! Fields accept loose [`Input`] (numbers, ISO-8601 text, `chrono` values,
//! points, flat sample lists) and store a canonical form that emits back to the
//! exact JSON shape CZML expects. Unset fields never appear in the output.

pub mod config;
pub mod document;
pub mod error;
pub mod input;
pub mod packet;
pub mod properties;
pub mod property;
pub mod sequence;
pub mod time;

pub use config::Config;
pub use document::Czml;
pub use error::{CzmlError, Result};
pub use input::{GeoPoint, Input, PointLike};
pub use packet::CzmlPacket;
pub use properties::{Billboard, Color, DateTimeAware, Label, Point, Position};
pub use property::{Category, Field, PropertyObject, Strategy};
pub use sequence::{
    CoordinateRecord, Coordinates, Record, RgbaRecord, RgbaSamples, RgbafRecord, RgbafSamples,
    Sequence,
};
pub use time::TimeOrNumber;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}
