//! Output configuration for JSON text rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Controls how emitted documents are written as text.
/// Keep this minimal; emission itself is not configurable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Indent nested mappings and arrays instead of compact output.
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn render(&self, value: &JsonValue) -> String {
        if self.pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }
}
