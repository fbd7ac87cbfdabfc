//! OpenAPI fragment bundler.
//!
//! Combines modular spec fragments into a single document by inlining
//! file-spanning `$ref`s, optionally expanding internal pointer refs,
//! and checks the bundled result for structural validity.

pub mod bundle;
pub mod document;
pub mod error;
pub mod validate;

pub use bundle::{bundle, bundle_to_file, BundleOptions};
pub use document::{load_document, read_version};
pub use error::BundleError;
pub use validate::{validate, validate_document};
