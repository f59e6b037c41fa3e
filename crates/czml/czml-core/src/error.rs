//! Error types raised while coercing, decoding or loading CZML values.

use thiserror::Error;

/// Errors produced by field assignment and document loading.
///
/// All variants are raised at assignment time; a failed assignment never
/// touches the previously stored value.
#[derive(Debug, Error)]
pub enum CzmlError {
    /// The offered value is of a kind the field's coercion rules reject.
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A flat sample sequence could not be partitioned into records.
    #[error("malformed sequence of length {len}: {reason}")]
    MalformedSequence { len: usize, reason: String },

    /// Dynamic assignment named a field the object does not declare.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CzmlError {
    pub(crate) fn mismatch(expected: &'static str, found: &'static str) -> Self {
        CzmlError::TypeMismatch { expected, found }
    }

    pub(crate) fn malformed(len: usize, reason: impl Into<String>) -> Self {
        CzmlError::MalformedSequence {
            len,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CzmlError>;
