//! specfold — build-and-validate pipeline for modular OpenAPI specs.
//!
//! Bundles per-API spec fragments, checks the bundles against the
//! OpenAPI standard, and derives a data dictionary from the
//! dereferenced variant.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use specfold::config::PipelineConfig;
use specfold::pipeline::Pipeline;
use specfold::tools::ProcessRunner;
use specfold_bundler::{bundle_to_file, validate, BundleOptions};

#[derive(Parser, Debug)]
#[command(name = "specfold", about = "Build and validate modular OpenAPI specs", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline: bundle, validate, generate dictionaries.
    Run {
        /// Pipeline configuration file.
        #[arg(short, long, default_value = "specfold.yaml")]
        config: PathBuf,

        /// Project root the configured paths are relative to.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Process only these APIs instead of the configured list.
        #[arg(long = "api")]
        apis: Vec<String>,

        /// Print conformance-check failure details.
        #[arg(long)]
        show_openapi_logs: bool,

        /// Print dictionary-generation failure details.
        #[arg(long)]
        show_dictionary_logs: bool,
    },

    /// Bundle a single fragment into one combined document.
    Bundle {
        /// Input fragment (YAML or JSON).
        #[arg(short, long)]
        spec: PathBuf,

        /// Output bundle path.
        #[arg(short, long)]
        output: PathBuf,

        /// Expand internal refs too (dictionary-tool input).
        #[arg(long)]
        dereference: bool,
    },

    /// Structurally validate a bundled spec without running the pipeline.
    Validate {
        /// Bundle file (YAML or JSON).
        #[arg(short, long)]
        spec: PathBuf,
    },
}

/// Run the pipeline command.
fn run_pipeline(
    config_path: &Path,
    root: Option<PathBuf>,
    apis: Vec<String>,
    show_openapi_logs: bool,
    show_dictionary_logs: bool,
) -> ExitCode {
    // A missing config file is fine: defaults plus CLI flags carry the run.
    let mut config = if config_path.exists() {
        match PipelineConfig::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {:#}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        PipelineConfig::default()
    };

    if let Some(root) = root {
        config.root = root;
    }
    if !apis.is_empty() {
        config.apis = apis;
    }
    config.show_openapi_logs |= show_openapi_logs;
    config.show_dictionary_logs |= show_dictionary_logs;

    let runner = ProcessRunner;
    match Pipeline::new(&config, &runner).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Run the bundle command.
fn run_bundle(spec: &Path, output: &Path, dereference: bool) -> ExitCode {
    if !spec.exists() {
        eprintln!("error: spec file not found: {}", spec.display());
        return ExitCode::from(1);
    }

    let options = BundleOptions {
        outfile: output.to_path_buf(),
        dereference,
    };

    match bundle_to_file(spec, &options) {
        Ok(()) => {
            eprintln!("bundled {} to {}", spec.display(), output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: bundling failed: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Run the validate command.
fn run_validate(spec: &Path) -> ExitCode {
    match validate(spec) {
        Ok(()) => {
            eprintln!("✓ {} is valid", spec.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}: {}", spec.display(), e);
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    // Diagnostics go to stderr; the pipeline report owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            root,
            apis,
            show_openapi_logs,
            show_dictionary_logs,
        } => run_pipeline(&config, root, apis, show_openapi_logs, show_dictionary_logs),
        Commands::Bundle {
            spec,
            output,
            dereference,
        } => run_bundle(&spec, &output, dereference),
        Commands::Validate { spec } => run_validate(&spec),
    }
}
