//! External tool invocation and result normalization.
//!
//! The two side tools — the standard-conformance checker and the
//! dictionary generator — run as subprocesses behind the [`ToolRunner`]
//! capability trait, so unit tests can script their outputs instead of
//! spawning real processes.

use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Raw result of running an external tool.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Captured stdout, as emitted.
    pub stdout: String,
    /// Captured stderr, as emitted.
    pub stderr: String,
    /// Set when the tool could not be spawned or exited non-zero.
    pub launch_error: Option<String>,
}

/// Capability interface over subprocess execution.
pub trait ToolRunner {
    fn run(&self, program: &str, args: &[String]) -> ToolOutput;
}

/// Runs tools as real child processes, blocking until they exit.
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> ToolOutput {
        debug!(program, ?args, "running external tool");

        match Command::new(program).args(args).output() {
            Ok(output) => {
                let launch_error = if output.status.success() {
                    None
                } else {
                    Some(format!("{} exited with {}", program, output.status))
                };
                ToolOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    launch_error,
                }
            }
            Err(e) => ToolOutput {
                stdout: String::new(),
                stderr: String::new(),
                launch_error: Some(format!("failed to launch {}: {}", program, e)),
            },
        }
    }
}

/// Normalized outcome of one external check or generation stage.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub is_valid: bool,
    /// Trimmed stderr text.
    pub error: String,
    /// Launch or exit failure, if any.
    pub cmd_error: String,
    /// Stdout, cosmetically cleaned for display.
    pub output: String,
}

/// Interpreter for the conformance-checker module.
pub(crate) fn python_command() -> &'static str {
    if cfg!(target_os = "linux") {
        "python3"
    } else {
        "python"
    }
}

/// Check a bundle against the OpenAPI standard via `openapi_spec_validator`.
///
/// The checker prints exactly `OK` for a conformant document; anything
/// else on stdout (error text, empty output) counts as non-conformant.
/// Stdout is trimmed before the comparison, so trailing whitespace in a
/// genuinely valid response never causes a false negative.
pub fn conformance_check(runner: &dyn ToolRunner, bundle: &Path) -> CheckOutcome {
    let result = runner.run(
        python_command(),
        &[
            "-m".to_string(),
            "openapi_spec_validator".to_string(),
            bundle.display().to_string(),
        ],
    );

    let stdout = result.stdout.trim();

    // Display cleanup only: validity is decided by the equality check
    // below, never by the cleaned text.
    let output = stdout
        .replacen("# Validation Error", "", 1)
        .replacen('\n', "", 1);

    CheckOutcome {
        is_valid: stdout == "OK",
        error: result.stderr.trim().to_string(),
        cmd_error: result.launch_error.unwrap_or_default(),
        output,
    }
}

/// Generate dictionary artifacts from a dereferenced bundle.
///
/// `-c` asks the tool to overwrite existing output. Valid only when the
/// tool wrote nothing to stderr and ran to a clean exit; warnings on
/// stderr count as failure just like fatal errors.
pub fn generate_dictionary(
    runner: &dyn ToolRunner,
    tool: &Path,
    bundle: &Path,
    output_dir: &Path,
) -> CheckOutcome {
    let result = runner.run(
        "ruby",
        &[
            tool.display().to_string(),
            "-c".to_string(),
            "-f".to_string(),
            bundle.display().to_string(),
            "-o".to_string(),
            output_dir.display().to_string(),
        ],
    );

    let error = result.stderr.trim().to_string();
    let is_valid = error.is_empty() && result.launch_error.is_none();

    CheckOutcome {
        is_valid,
        error,
        cmd_error: result.launch_error.unwrap_or_default(),
        output: result.stdout.trim().to_string(),
    }
}
