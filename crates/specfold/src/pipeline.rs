//! The per-API orchestration loop.
//!
//! Strictly sequential: read version, build both bundles, run the three
//! checks, report, next API. No stage is skipped because an earlier one
//! failed — the pipeline is a reporting tool, not a gate — and per-stage
//! failures become `false` flags rather than aborts. Only version
//! reading and the final temp-directory cleanup are fatal.

use std::path::Path;

use anyhow::Context;
use specfold_bundler::{bundle_to_file, read_version, validate, BundleOptions};
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::report;
use crate::tools::{conformance_check, generate_dictionary, ToolRunner};

/// Drives the build-and-validate pipeline over every configured API.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    runner: &'a dyn ToolRunner,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, runner: &'a dyn ToolRunner) -> Self {
        Self { config, runner }
    }

    /// Process all APIs in order, then remove the temporary dictionary
    /// directory. Temp bundles from every API coexist until this final
    /// teardown; there is no per-API cleanup.
    pub fn run(&self) -> anyhow::Result<()> {
        report::print_separator();

        for api in &self.config.apis {
            self.run_api(api)?;
            report::print_separator();
        }

        let temp_dir = self.config.temp_dir();
        if temp_dir.exists() {
            std::fs::remove_dir_all(&temp_dir)
                .with_context(|| format!("removing {}", temp_dir.display()))?;
        }

        Ok(())
    }

    fn run_api(&self, api: &str) -> anyhow::Result<()> {
        report::print_api_header(api);

        let fragment = self.config.fragment_path(api);
        let version = read_version(&fragment)
            .with_context(|| format!("reading version for API '{}'", api))?;

        debug!(api, version, "processing API");

        let bundle_out = self.config.bundle_path(api, &version);
        let temp_out = self.config.temp_bundle_path(api, &version);

        // Both bundles are best-effort: a failure is logged and the
        // later stages run against whatever file exists, or fail there.
        self.build_bundle(
            &fragment,
            BundleOptions {
                outfile: bundle_out.clone(),
                dereference: false,
            },
        );
        self.build_bundle(
            &fragment,
            BundleOptions {
                outfile: temp_out.clone(),
                dereference: true,
            },
        );

        let bundle_valid = match validate(&bundle_out) {
            Ok(()) => true,
            Err(e) => {
                report::print_stage_error(&e);
                false
            }
        };

        let standard = conformance_check(self.runner, &bundle_out);
        let dictionary = generate_dictionary(
            self.runner,
            &self.config.dictionary_tool(),
            &temp_out,
            &self.config.dictionary_dir(),
        );

        report::print_flags(&version, bundle_valid, &standard, &dictionary);

        if self.config.show_openapi_logs {
            report::print_failure_logs(&standard, "Open API");
        }
        if self.config.show_dictionary_logs {
            report::print_failure_logs(&dictionary, "Dictionary");
        }

        Ok(())
    }

    fn build_bundle(&self, fragment: &Path, options: BundleOptions) {
        if let Err(e) = bundle_to_file(fragment, &options) {
            warn!(fragment = %fragment.display(), error = %e, "bundling failed");
            report::print_stage_error(&e);
        }
    }
}
