//! Error types for schema loading and selection synthesis.
//!
//! Every error here is a generation-time failure: the introspection payload
//! is inconsistent or a caller asked for something the type graph cannot
//! provide. None of them are recoverable locally, so callers abort the whole
//! generation step instead of emitting partial output.

/// Errors raised while loading or walking the introspected type graph.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A referenced type name is absent from the registry.
    #[error("Type not found in schema: {name}")]
    TypeNotFound {
        /// The name that failed to resolve.
        name: String,
    },

    /// A wrapper chain nests deeper than the introspection query can express.
    #[error("Type reference nests more than {max_depth} wrapper levels")]
    UnsupportedDepth {
        /// The deepest representable number of `ofType` levels.
        max_depth: usize,
    },

    /// The payload does not have the shape of an introspection response.
    #[error("Malformed introspection payload: {message}")]
    Malformed {
        /// What was wrong with the payload.
        message: String,
    },

    /// Selection synthesis was invoked on a type that has no fields.
    #[error("Type {name} is not a composite type")]
    NotComposite {
        /// The offending type name.
        name: String,
    },

    /// The schema exposes no root type for the requested operation.
    #[error("Schema has no {operation} root type")]
    MissingRootType {
        /// The operation kind, as it appears in a document.
        operation: String,
    },

    /// The payload is not valid JSON for the expected structure.
    #[error("Failed to decode introspection payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Creates a new `TypeNotFound` error.
    #[must_use]
    pub fn type_not_found(name: impl Into<String>) -> Self {
        Self::TypeNotFound { name: name.into() }
    }

    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a new `NotComposite` error.
    #[must_use]
    pub fn not_composite(name: impl Into<String>) -> Self {
        Self::NotComposite { name: name.into() }
    }

    /// Returns `true` if this is a schema lookup failure.
    #[must_use]
    pub fn is_type_not_found(&self) -> bool {
        matches!(self, Self::TypeNotFound { .. })
    }

    /// Returns `true` if a wrapper chain exceeded the depth ceiling.
    #[must_use]
    pub fn is_unsupported_depth(&self) -> bool {
        matches!(self, Self::UnsupportedDepth { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            SchemaError::type_not_found("User").to_string(),
            "Type not found in schema: User"
        );
        assert_eq!(
            SchemaError::UnsupportedDepth { max_depth: 7 }.to_string(),
            "Type reference nests more than 7 wrapper levels"
        );
    }

    #[test]
    fn test_predicates() {
        assert!(SchemaError::type_not_found("X").is_type_not_found());
        assert!(!SchemaError::malformed("x").is_type_not_found());
        assert!(SchemaError::UnsupportedDepth { max_depth: 7 }.is_unsupported_depth());
    }
}
