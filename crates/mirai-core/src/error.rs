//! Error types for decoding wire documents and the plain-text escape codec.

use thiserror::Error;

// =============================================================================
// Decode Errors
// =============================================================================

/// Errors that can occur while decoding a wire document into a model type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document has no string discriminator field.
    #[error("missing string discriminator field '{field}'")]
    MissingDiscriminator {
        /// Name of the discriminator field.
        field: &'static str,
    },

    /// The discriminator does not name a known kind.
    #[error("unknown {field} '{name}'")]
    UnknownDiscriminator {
        /// Name of the discriminator field.
        field: &'static str,
        /// The unrecognised value.
        name: String,
    },

    /// The discriminator is known but the payload does not match its shape.
    #[error("malformed {kind} payload: {source}")]
    Malformed {
        /// Wire name of the selected kind.
        kind: &'static str,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// A received message chain did not begin with its `Source` segment.
    #[error("message chain does not start with a Source segment")]
    MissingSource,

    /// The input is not valid JSON, or has the wrong outer shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

// =============================================================================
// Escape Errors
// =============================================================================

/// Errors reported by [`unescape`](crate::message::unescape).
///
/// Positions are byte offsets into the escaped input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    /// An escape introducer is the last character of the input.
    #[error("dangling escape introducer '{introducer}' at byte {position}")]
    TrailingIntroducer {
        /// Offset of the introducer.
        position: usize,
        /// The introducer character (`\`, `[` or `]`).
        introducer: char,
    },

    /// An escape introducer is followed by a character it cannot pair with.
    #[error("invalid escape sequence '{introducer}{found}' at byte {position}")]
    InvalidSequence {
        /// Offset of the introducer.
        position: usize,
        /// The introducer character.
        introducer: char,
        /// The character that followed it.
        found: char,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::UnknownDiscriminator {
            field: "type",
            name: "Foo".into(),
        };
        assert_eq!(err.to_string(), "unknown type 'Foo'");

        let err = EscapeError::InvalidSequence {
            position: 3,
            introducer: '[',
            found: 'x',
        };
        assert_eq!(err.to_string(), "invalid escape sequence '[x' at byte 3");
    }
}
