//! Error types for Tower

use thiserror::Error;

/// Which of an object's two documents an operation needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Item,
    Properties,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Item => write!(f, "item"),
            DocumentKind::Properties => write!(f, "properties"),
        }
    }
}

/// The main error type for Tower operations
#[derive(Debug, Error)]
pub enum TowerError {
    #[error("Object has neither an item nor a properties document")]
    EmptyObject,

    #[error("Object '{object}' has no {document} document")]
    MissingDocument {
        object: String,
        document: DocumentKind,
    },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field type at {field}: expected {expected}, got {got}")]
    InvalidFieldType {
        field: String,
        expected: String,
        got: String,
    },

    #[error("Invalid identifier: {0}")]
    InvalidGuid(String),

    #[error("Group allocation failed: {0}")]
    GroupAllocation(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Tower operations
pub type Result<T> = std::result::Result<T, TowerError>;

impl TowerError {
    /// Build an `InvalidFieldType` from a JSON value that had the wrong shape
    pub fn wrong_type(field: impl Into<String>, expected: &str, got: &serde_json::Value) -> Self {
        let got = match got {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        TowerError::InvalidFieldType {
            field: field.into(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}

impl From<toml::de::Error> for TowerError {
    fn from(err: toml::de::Error) -> Self {
        TowerError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_document_message() {
        let err = TowerError::MissingDocument {
            object: "Chair".to_string(),
            document: DocumentKind::Properties,
        };
        assert_eq!(err.to_string(), "Object 'Chair' has no properties document");
    }

    #[test]
    fn test_wrong_type_names_json_kind() {
        let err = TowerError::wrong_type("item.position", "object", &serde_json::json!([1, 2]));
        assert_eq!(
            err.to_string(),
            "Invalid field type at item.position: expected object, got array"
        );
    }
}
