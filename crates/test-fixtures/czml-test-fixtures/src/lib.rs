use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    documents: HashMap<String, String>,
    packets: HashMap<String, PacketEntry>,
}

/// A packet as written by hand, plus the canonical form it must emit when
/// that differs from the input.
#[derive(Debug, Deserialize)]
struct PacketEntry {
    input: String,
    #[serde(default)]
    expected: Option<String>,
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("cannot read fixture {rel} at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Whole CZML documents (JSON arrays of packets).
pub mod documents {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.documents.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.documents, "document", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.documents, "document", name)?;
        super::load_json(rel)
    }
}

/// Single packet mappings with their expected canonical emission.
pub mod packets {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.packets.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn input_json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.packets, "packet", name)?;
        read_to_string(&entry.input)
    }

    pub fn input<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.packets, "packet", name)?;
        super::load_json(&entry.input)
    }

    /// Expected emission; the input itself when no separate file is listed.
    pub fn expected<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.packets, "packet", name)?;
        super::load_json(entry.expected.as_deref().unwrap_or(&entry.input))
    }
}
