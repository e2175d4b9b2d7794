use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document generation and validation
#[derive(Debug, Error)]
pub enum Error {
    /// A security requirement object names more (or fewer) than one scheme
    #[error("server '{server}': security requirement must name exactly one scheme, found [{}]", schemes.join(", "))]
    InvalidSecurityRequirement { server: String, schemes: Vec<String> },

    #[error("server '{server}': security scheme '{scheme}' is not defined in components.securitySchemes")]
    UnknownSecurityScheme { server: String, scheme: String },

    /// Scopes are only meaningful for oauth2 and openIdConnect schemes
    #[error("server '{server}': scopes are not allowed for security scheme '{scheme}' of type '{scheme_type}'")]
    ScopesNotAllowed {
        server: String,
        scheme: String,
        scheme_type: String,
    },

    #[error("server '{server}': scope '{scope}' is not defined by any flow of security scheme '{scheme}'")]
    UndefinedScope {
        server: String,
        scheme: String,
        scope: String,
    },

    #[error("two different payload types share the message name '{name}'")]
    DuplicateMessageNameConflict { name: String },

    #[error("two different nested schemas share the name '{name}'")]
    DuplicateSchemaNameConflict { name: String },

    #[error("unsupported AsyncAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid AsyncAPI document: {0}")]
    InvalidDocument(String),

    #[error("invalid route manifest {}: {message}", file.display())]
    InvalidManifest { file: PathBuf, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML: {}", err))
    }
}
