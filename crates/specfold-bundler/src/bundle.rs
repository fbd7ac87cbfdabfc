//! Fragment bundling: external-`$ref` inlining and optional dereferencing.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::document::{load_document, resolve_pointer};
use crate::error::BundleError;

/// Options for writing a bundle.
///
/// `dereference` should be false for bundles fed to conformance checks
/// and true for bundles fed to the dictionary generator.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Output file path. Parent directories are created as needed.
    pub outfile: PathBuf,
    /// Expand internal pointer refs in addition to file-spanning ones.
    pub dereference: bool,
}

/// Bundle a fragment into a single document.
///
/// File-spanning `$ref`s are resolved relative to the referencing file
/// and inlined. With `dereference`, internal `#/...` refs are expanded
/// as well, so the result contains no `$ref` keys at all.
pub fn bundle(fragment: &Path, dereference: bool) -> Result<Value, BundleError> {
    let doc = load_document(fragment)?;
    let mut cache = HashMap::new();
    let mut stack = Vec::new();
    let merged = inline_externals(&doc, fragment, &mut cache, &mut stack)?;

    debug!(
        fragment = %fragment.display(),
        files = cache.len() + 1,
        dereference,
        "bundled fragment"
    );

    if dereference {
        let root = merged.clone();
        let mut stack = Vec::new();
        expand_internals(&merged, &root, &mut stack)
    } else {
        Ok(merged)
    }
}

/// Bundle a fragment and write the result as YAML to `options.outfile`.
pub fn bundle_to_file(fragment: &Path, options: &BundleOptions) -> Result<(), BundleError> {
    let bundled = bundle(fragment, options.dereference)?;
    let yaml = serde_yaml::to_string(&bundled)
        .map_err(|e| BundleError::Parse(format!("serializing bundle: {}", e)))?;

    if let Some(parent) = options.outfile.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&options.outfile, yaml)?;
    Ok(())
}

/// Rebuild a value with every file-spanning `$ref` replaced by the
/// referenced content. Internal `#/...` refs are left untouched.
fn inline_externals(
    value: &Value,
    current_file: &Path,
    cache: &mut HashMap<PathBuf, Value>,
    stack: &mut Vec<String>,
) -> Result<Value, BundleError> {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(|v| v.as_str()) {
                if !reference.starts_with('#') {
                    return resolve_external(reference, current_file, cache, stack);
                }
            }

            let mut out = serde_json::Map::new();
            for (key, item) in map {
                out.insert(
                    key.clone(),
                    inline_externals(item, current_file, cache, stack)?,
                );
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let resolved = items
                .iter()
                .map(|item| inline_externals(item, current_file, cache, stack))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(resolved))
        }
        other => Ok(other.clone()),
    }
}

/// Load and inline one external reference ("file.yml" or "file.yml#/Pointer").
fn resolve_external(
    reference: &str,
    current_file: &Path,
    cache: &mut HashMap<PathBuf, Value>,
    stack: &mut Vec<String>,
) -> Result<Value, BundleError> {
    let (file_part, pointer) = match reference.split_once('#') {
        Some((file, ptr)) => (file, Some(ptr)),
        None => (reference, None),
    };

    let base = current_file.parent().unwrap_or_else(|| Path::new("."));
    let target = normalize(&base.join(file_part));

    let key = format!("{}#{}", target.display(), pointer.unwrap_or(""));
    if stack.iter().any(|seen| seen == &key) {
        return Err(BundleError::CircularRef(reference.to_string()));
    }

    // Clone out of the cache so the recursion below can keep using it.
    let doc = match cache.get(&target) {
        Some(doc) => doc.clone(),
        None => {
            let doc = load_document(&target).map_err(|e| match e {
                BundleError::Io(io) => {
                    BundleError::UnresolvedRef(format!("'{}' ({})", reference, io))
                }
                other => other,
            })?;
            cache.insert(target.clone(), doc.clone());
            doc
        }
    };

    let selected = match pointer {
        Some(ptr) => resolve_pointer(&doc, ptr)
            .cloned()
            .ok_or_else(|| BundleError::UnresolvedRef(reference.to_string()))?,
        None => doc,
    };

    stack.push(key);
    let resolved = inline_externals(&selected, &target, cache, stack);
    stack.pop();
    resolved
}

/// Rebuild a value with every internal `$ref` expanded against `root`.
///
/// By this point all file-spanning refs have been inlined, so a non-`#`
/// ref here is unresolvable. Cycles are detected via the ref stack.
fn expand_internals(
    value: &Value,
    root: &Value,
    stack: &mut Vec<String>,
) -> Result<Value, BundleError> {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(|v| v.as_str()) {
                if !reference.starts_with('#') {
                    return Err(BundleError::UnresolvedRef(reference.to_string()));
                }
                if stack.iter().any(|seen| seen == reference) {
                    return Err(BundleError::CircularRef(reference.to_string()));
                }

                let resolved = resolve_pointer(root, reference)
                    .ok_or_else(|| BundleError::UnresolvedRef(reference.to_string()))?;

                stack.push(reference.to_string());
                let expanded = expand_internals(resolved, root, stack);
                stack.pop();
                return expanded;
            }

            let mut out = serde_json::Map::new();
            for (key, item) in map {
                out.insert(key.clone(), expand_internals(item, root, stack)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let expanded = items
                .iter()
                .map(|item| expand_internals(item, root, stack))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(expanded))
        }
        other => Ok(other.clone()),
    }
}

/// Lexically normalize a path: drop `.` components and fold `..`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
