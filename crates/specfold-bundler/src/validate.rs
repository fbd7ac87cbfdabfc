//! Structural validation of bundled documents.

use std::path::Path;

use serde_json::Value;

use crate::document::{load_document, resolve_pointer};
use crate::error::BundleError;

/// Validate a bundle file on disk.
pub fn validate(path: &Path) -> Result<(), BundleError> {
    let doc = load_document(path)?;
    validate_document(&doc)
}

/// Validate an in-memory bundle.
///
/// Checks the version field (`openapi: 3.x` or `swagger: "2.0"`), the
/// `info` object, the `paths` object, and that every remaining `$ref`
/// is internal and resolvable. This is the bundler-native check; the
/// full standard-conformance check is an external tool.
pub fn validate_document(doc: &Value) -> Result<(), BundleError> {
    let root = doc
        .as_object()
        .ok_or_else(|| BundleError::Invalid("document root must be an object".into()))?;

    if let Some(version) = root.get("openapi").and_then(|v| v.as_str()) {
        if !version.starts_with("3.") {
            return Err(BundleError::Invalid(format!(
                "unsupported OpenAPI version: {} (only 3.x supported)",
                version
            )));
        }
    } else if let Some(version) = root.get("swagger").and_then(|v| v.as_str()) {
        if version != "2.0" {
            return Err(BundleError::Invalid(format!(
                "unsupported Swagger version: {} (only 2.0 supported)",
                version
            )));
        }
    } else {
        return Err(BundleError::Invalid(
            "missing 'openapi' or 'swagger' version field".into(),
        ));
    }

    let info = root
        .get("info")
        .and_then(|v| v.as_object())
        .ok_or_else(|| BundleError::Invalid("missing 'info' object".into()))?;

    if info.get("title").and_then(|v| v.as_str()).is_none() {
        return Err(BundleError::Invalid("missing 'info.title'".into()));
    }
    if info.get("version").and_then(|v| v.as_str()).is_none() {
        return Err(BundleError::Invalid("missing 'info.version'".into()));
    }

    if root.get("paths").and_then(|v| v.as_object()).is_none() {
        return Err(BundleError::Invalid("missing 'paths' object".into()));
    }

    check_refs(doc, doc)
}

/// Walk the document and require every `$ref` to be internal and resolvable.
fn check_refs(value: &Value, root: &Value) -> Result<(), BundleError> {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(|v| v.as_str()) {
                if !reference.starts_with('#') {
                    return Err(BundleError::UnresolvedRef(format!(
                        "'{}' is not internal to the bundle",
                        reference
                    )));
                }
                if resolve_pointer(root, reference).is_none() {
                    return Err(BundleError::UnresolvedRef(reference.to_string()));
                }
            }
            for item in map.values() {
                check_refs(item, root)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                check_refs(item, root)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
