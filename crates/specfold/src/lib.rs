//! Library surface of the specfold pipeline.
//!
//! The binary in `main.rs` is a thin CLI over these modules:
//! [`config`] holds the pipeline configuration, [`tools`] wraps the
//! external validator and dictionary tools, [`pipeline`] drives the
//! per-API loop, and [`report`] owns the console output format.

pub mod config;
pub mod pipeline;
pub mod report;
pub mod tools;
