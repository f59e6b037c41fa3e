//! Catalog of CZML property objects built on the coercion strategies.

use crate::property::{Flag, Nested, Number, Samples, Temporal, Text, Timestamp};
use crate::sequence::{CoordinateRecord, RgbaRecord, RgbafRecord};

crate::property_object! {
    /// Epoch and neighbour-interval times shared by time-varying properties.
    pub struct DateTimeAware {
        /// Reference time for numeric sample times.
        "epoch" => epoch: Timestamp,
        "nextTime" => next_time: Temporal,
        "previousTime" => previous_time: Temporal,
    }
}

crate::property_object! {
    /// A color, as integer (`rgba`) or floating point (`rgbaf`) channels.
    /// Both variants are stored independently.
    pub struct Color {
        "rgba" => rgba: Samples<RgbaRecord>,
        "rgbaf" => rgbaf: Samples<RgbafRecord>,
    }
}

crate::property_object! {
    /// Position of an entity, optionally sampled over time.
    pub struct Position {
        "epoch" => epoch: Timestamp,
        "nextTime" => next_time: Temporal,
        "previousTime" => previous_time: Temporal,
        /// `FIXED` or `INERTIAL`.
        "referenceFrame" => reference_frame: Text,
        /// Cartesian XYZ in meters.
        "cartesian" => cartesian: Samples<CoordinateRecord>,
        /// Longitude, latitude (radians) and height (meters).
        "cartographicRadians" => cartographic_radians: Samples<CoordinateRecord>,
        /// Longitude, latitude (degrees) and height (meters).
        "cartographicDegrees" => cartographic_degrees: Samples<CoordinateRecord>,
    }
}

crate::property_object! {
    /// A point rendered at the entity's position. Hidden unless `show` is set.
    pub struct Point {
        "show" => show: Flag = false,
        "color" => color: Nested<Color>,
        "pixelSize" => pixel_size: Number,
        "outlineColor" => outline_color: Nested<Color>,
        "outlineWidth" => outline_width: Number,
    }
}

crate::property_object! {
    pub struct Label {
        "show" => show: Flag,
        "text" => text: Text,
        /// CSS font string.
        "font" => font: Text,
        "scale" => scale: Number,
        "fillColor" => fill_color: Nested<Color>,
        "outlineColor" => outline_color: Nested<Color>,
    }
}

crate::property_object! {
    pub struct Billboard {
        "show" => show: Flag,
        /// URI or data URI of the image.
        "image" => image: Text,
        "scale" => scale: Number,
        "color" => color: Nested<Color>,
    }
}
