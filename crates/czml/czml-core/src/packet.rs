//! A CZML packet: one entity's properties.

use crate::properties::{Billboard, Label, Point, Position};
use crate::property::{Nested, Text};

crate::property_object! {
    /// Describes one entity. Packets with the same `id` are not merged here.
    pub struct CzmlPacket {
        "id" => id: Text,
        "name" => name: Text,
        /// HTML description shown by viewers.
        "description" => description: Text,
        /// ISO-8601 interval(s) during which the entity exists.
        "availability" => availability: Text,
        "billboard" => billboard: Nested<Billboard>,
        "label" => label: Nested<Label>,
        "point" => point: Nested<Point>,
        "position" => position: Nested<Position>,
    }
}

impl CzmlPacket {
    pub fn new(id: impl Into<String>) -> Self {
        let mut packet = Self::default();
        packet.id.assign(id.into());
        packet
    }
}
