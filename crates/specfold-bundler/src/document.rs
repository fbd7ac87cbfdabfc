//! Document loading and metadata extraction.

use std::path::Path;

use serde_json::Value;

use crate::error::BundleError;

/// Load a YAML (or JSON — JSON is valid YAML) document into a generic value.
pub fn load_document(path: &Path) -> Result<Value, BundleError> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| BundleError::Parse(format!("{}: {}", path.display(), e)))
}

/// Read the API version string from a fragment's `info.version`.
///
/// Propagates I/O and parse errors; there is no fallback version.
pub fn read_version(path: &Path) -> Result<String, BundleError> {
    let doc = load_document(path)?;
    doc.get("info")
        .and_then(|info| info.get("version"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| BundleError::MissingVersion(path.display().to_string()))
}

/// Resolve a JSON pointer (e.g. "#/components/schemas/User") against a document.
///
/// Accepts the pointer with or without the leading `#`. A bare `#` refers
/// to the whole document.
pub(crate) fn resolve_pointer<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let path = pointer.strip_prefix('#').unwrap_or(pointer);
    if path.is_empty() {
        return Some(root);
    }

    let path = path.strip_prefix('/')?;
    let mut current = root;

    for segment in path.split('/') {
        // JSON Pointer escaping
        let unescaped = segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Array(items) => items.get(unescaped.parse::<usize>().ok()?)?,
            _ => current.get(&unescaped)?,
        };
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_doc(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn read_version_returns_info_version() {
        let temp = TempDir::new().unwrap();
        let path = write_doc(
            temp.path(),
            "_payments_apis_part.yml",
            r#"
info:
  title: Payments API
  version: "1.0.0"
paths: {}
"#,
        );

        assert_eq!(read_version(&path).unwrap(), "1.0.0");
    }

    #[test]
    fn read_version_ignores_surrounding_content() {
        let temp = TempDir::new().unwrap();
        let path = write_doc(
            temp.path(),
            "part.yml",
            r#"
openapi: "3.0.0"
info:
  title: Accounts API
  description: lots of text
  version: "2.3.1-rc1"
paths:
  /accounts:
    get: {}
"#,
        );

        // Any string present is trusted, no format validation.
        assert_eq!(read_version(&path).unwrap(), "2.3.1-rc1");
    }

    #[test]
    fn read_version_fails_on_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = read_version(&temp.path().join("nope.yml"));
        assert!(matches!(result, Err(BundleError::Io(_))));
    }

    #[test]
    fn read_version_fails_on_missing_field() {
        let temp = TempDir::new().unwrap();
        let path = write_doc(temp.path(), "part.yml", "info:\n  title: No Version\n");
        let result = read_version(&path);
        assert!(matches!(result, Err(BundleError::MissingVersion(_))));
    }

    #[test]
    fn resolve_pointer_walks_objects() {
        let doc: Value = serde_yaml::from_str(
            r#"
components:
  schemas:
    User:
      type: object
"#,
        )
        .unwrap();

        let user = resolve_pointer(&doc, "#/components/schemas/User").unwrap();
        assert_eq!(user.get("type").unwrap(), "object");
        assert!(resolve_pointer(&doc, "#/components/schemas/Missing").is_none());
    }

    #[test]
    fn resolve_pointer_unescapes_segments() {
        let doc: Value = serde_json::json!({ "a/b": { "c~d": 1 } });
        assert_eq!(resolve_pointer(&doc, "#/a~1b/c~0d").unwrap(), 1);
    }

    #[test]
    fn resolve_pointer_indexes_arrays() {
        let doc: Value = serde_yaml::from_str(
            r#"
paths:
  /accounts:
    get:
      parameters:
        - name: limit
          in: query
        - name: offset
          in: query
"#,
        )
        .unwrap();

        let second = resolve_pointer(&doc, "#/paths/~1accounts/get/parameters/1").unwrap();
        assert_eq!(second.get("name").unwrap(), "offset");
        assert!(resolve_pointer(&doc, "#/paths/~1accounts/get/parameters/2").is_none());
        assert!(resolve_pointer(&doc, "#/paths/~1accounts/get/parameters/limit").is_none());
    }

    #[test]
    fn resolve_pointer_bare_hash_is_root() {
        let doc: Value = serde_json::json!({ "x": 1 });
        assert_eq!(resolve_pointer(&doc, "#").unwrap(), &doc);
    }
}
