//! Fixed-format console progress report.
//!
//! The report is the product surface of the pipeline and goes to stdout;
//! diagnostics go through `tracing` on stderr.

use std::fmt::Display;

use crate::tools::CheckOutcome;

/// Separator between per-API report blocks.
pub const SEPARATOR: &str = "====================================";

pub fn print_separator() {
    println!("{}", SEPARATOR);
}

pub fn print_api_header(api: &str) {
    println!("API: {}", api);
}

/// Non-fatal stage failure, surfaced inline in the report.
pub fn print_stage_error(error: &dyn Display) {
    println!("ERROR: {}", error);
}

/// The per-API result block: version plus the three pass/fail flags.
pub fn print_flags(
    version: &str,
    bundle_valid: bool,
    standard: &CheckOutcome,
    dictionary: &CheckOutcome,
) {
    println!("Version: {}", version);
    println!("Is a valid bundle? {}", bundle_valid);
    println!("Is a valid OpenAPI? {}", standard.is_valid);
    println!("Is a valid dictionary? {}", dictionary.is_valid);
}

/// Detailed failure dump, shown only when the matching verbosity switch
/// is on. Prints nothing for a passing outcome.
pub fn print_failure_logs(outcome: &CheckOutcome, label: &str) {
    if outcome.is_valid {
        return;
    }

    println!("\nValidation errors: {}", label);

    if !outcome.output.is_empty() {
        println!("{}", outcome.output);
    }
    if !outcome.error.is_empty() {
        println!("{}", outcome.error);
    }
    if !outcome.cmd_error.is_empty() {
        println!("{}", outcome.cmd_error);
    }
}
