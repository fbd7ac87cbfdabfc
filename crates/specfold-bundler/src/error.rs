use thiserror::Error;

/// Errors produced while bundling or validating a spec document.
#[derive(Debug, Error)]
pub enum BundleError {
    /// YAML/JSON parse or serialization error.
    #[error("parse error: {0}")]
    Parse(String),

    /// A `$ref` points at something that does not exist.
    #[error("unresolved $ref: {0}")]
    UnresolvedRef(String),

    /// A `$ref` chain loops back on itself.
    #[error("circular $ref: {0}")]
    CircularRef(String),

    /// The fragment has no `info.version` string.
    #[error("missing info.version in {0}")]
    MissingVersion(String),

    /// The bundled document fails structural validation.
    #[error("invalid document: {0}")]
    Invalid(String),

    /// I/O error reading or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
