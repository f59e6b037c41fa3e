//! A CZML document: an ordered list of packets.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::error::{CzmlError, Result};
use crate::input::Input;
use crate::packet::CzmlPacket;
use crate::property::PropertyObject;

/// Packets in emission order. Ids are neither checked nor deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Czml {
    pub packets: Vec<CzmlPacket>,
}

impl Czml {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, packet: CzmlPacket) {
        self.packets.push(packet);
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CzmlPacket> {
        self.packets.iter()
    }

    /// JSON array of packet mappings, in insertion order.
    pub fn data(&self) -> JsonValue {
        JsonValue::Array(self.packets.iter().map(PropertyObject::data).collect())
    }

    pub fn dumps(&self) -> String {
        self.data().to_string()
    }

    pub fn dumps_with(&self, config: &Config) -> String {
        config.render(&self.data())
    }

    /// Append packets from a JSON array (or its text). Nothing is appended
    /// if any packet fails to load.
    pub fn load(&mut self, input: impl Into<Input>) -> Result<()> {
        let items = match input.into() {
            Input::List(items) => items,
            Input::Text(text) => return self.loads(&text),
            other => return Err(CzmlError::mismatch("array of packets", other.kind_name())),
        };
        let mut loaded = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Input::Map(map) => {
                    let mut packet = CzmlPacket::default();
                    packet.load_map(&map)?;
                    loaded.push(packet);
                }
                other => return Err(CzmlError::mismatch("packet mapping", other.kind_name())),
            }
        }
        log::debug!("loaded {} packets", loaded.len());
        self.packets.extend(loaded);
        Ok(())
    }

    pub fn loads(&mut self, text: &str) -> Result<()> {
        let value: JsonValue = serde_json::from_str(text)?;
        match value {
            JsonValue::Array(_) => self.load(value),
            other => Err(CzmlError::mismatch(
                "array of packets",
                Input::from(other).kind_name(),
            )),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = Self::new();
        doc.loads(text)?;
        Ok(doc)
    }
}

impl FromIterator<CzmlPacket> for Czml {
    fn from_iter<I: IntoIterator<Item = CzmlPacket>>(iter: I) -> Self {
        Self {
            packets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Czml {
    type Item = &'a CzmlPacket;
    type IntoIter = std::slice::Iter<'a, CzmlPacket>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.iter()
    }
}
