//! Pipeline configuration (`specfold.yaml`).
//!
//! Declares which APIs to process and where the spec repository keeps
//! its fragments, bundles, and dictionary output. Every field has a
//! default matching the conventional repository layout, so a minimal
//! config only lists APIs:
//!
//! ```yaml
//! apis:
//!   - payments
//!   # - accounts        # commented out = disabled
//! show_openapi_logs: false
//! show_dictionary_logs: false
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Project root the configured paths are relative to.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// API identifiers to process, in order. Commenting an entry out of
    /// the YAML list disables it without removing it.
    #[serde(default)]
    pub apis: Vec<String>,

    /// Print conformance-check failure details.
    #[serde(default)]
    pub show_openapi_logs: bool,

    /// Print dictionary-generation failure details.
    #[serde(default)]
    pub show_dictionary_logs: bool,

    /// Root-relative directory layout.
    #[serde(default)]
    pub paths: RootPaths,
}

/// Directory layout of the surrounding spec repository.
#[derive(Debug, Clone, Deserialize)]
pub struct RootPaths {
    /// Input fragments: `_{api}_apis_part.yml`.
    #[serde(default = "default_components_dir")]
    pub components_dir: PathBuf,

    /// Preserved bundles: `{api}/{version}.yml`.
    #[serde(default = "default_bundles_dir")]
    pub bundles_dir: PathBuf,

    /// Dereferenced bundles, removed at the end of the run.
    #[serde(default = "default_temp_dict_dir")]
    pub temp_dict_dir: PathBuf,

    /// Destination for generated dictionary artifacts.
    #[serde(default = "default_dictionary_dir")]
    pub dictionary_dir: PathBuf,

    /// The dictionary-generation script.
    #[serde(default = "default_dictionary_tool")]
    pub dictionary_tool: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_components_dir() -> PathBuf {
    PathBuf::from("swagger-components")
}

fn default_bundles_dir() -> PathBuf {
    PathBuf::from("swagger-apis-test")
}

fn default_temp_dict_dir() -> PathBuf {
    PathBuf::from("temp-dict-dir")
}

fn default_dictionary_dir() -> PathBuf {
    PathBuf::from("dictionary")
}

fn default_dictionary_tool() -> PathBuf {
    PathBuf::from("automation-scripts/dictionary_generator")
}

impl Default for RootPaths {
    fn default() -> Self {
        Self {
            components_dir: default_components_dir(),
            bundles_dir: default_bundles_dir(),
            temp_dict_dir: default_temp_dict_dir(),
            dictionary_dir: default_dictionary_dir(),
            dictionary_tool: default_dictionary_tool(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            apis: Vec::new(),
            show_openapi_logs: false,
            show_dictionary_logs: false,
            paths: RootPaths::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Input fragment for one API.
    pub fn fragment_path(&self, api: &str) -> PathBuf {
        self.root
            .join(&self.paths.components_dir)
            .join(format!("_{}_apis_part.yml", api))
    }

    /// Preserved bundle output for one API and version.
    pub fn bundle_path(&self, api: &str, version: &str) -> PathBuf {
        self.root
            .join(&self.paths.bundles_dir)
            .join(api)
            .join(format!("{}.yml", version))
    }

    /// Dereferenced bundle output for one API and version.
    pub fn temp_bundle_path(&self, api: &str, version: &str) -> PathBuf {
        self.temp_dir().join(api).join(format!("{}.yml", version))
    }

    /// The temporary dictionary directory.
    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(&self.paths.temp_dict_dir)
    }

    /// Destination directory for dictionary artifacts.
    pub fn dictionary_dir(&self) -> PathBuf {
        self.root.join(&self.paths.dictionary_dir)
    }

    /// Path to the dictionary-generation script.
    pub fn dictionary_tool(&self) -> PathBuf {
        self.root.join(&self.paths.dictionary_tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn minimal_config_gets_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("specfold.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"apis:\n  - payments\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.apis, vec!["payments"]);
        assert!(!config.show_openapi_logs);
        assert_eq!(
            config.paths.components_dir,
            PathBuf::from("swagger-components")
        );
    }

    #[test]
    fn paths_follow_the_conventional_layout() {
        let config = PipelineConfig {
            root: PathBuf::from("/repo"),
            ..Default::default()
        };

        assert_eq!(
            config.fragment_path("payments"),
            PathBuf::from("/repo/swagger-components/_payments_apis_part.yml")
        );
        assert_eq!(
            config.bundle_path("payments", "1.0.0"),
            PathBuf::from("/repo/swagger-apis-test/payments/1.0.0.yml")
        );
        assert_eq!(
            config.temp_bundle_path("payments", "1.0.0"),
            PathBuf::from("/repo/temp-dict-dir/payments/1.0.0.yml")
        );
    }

    #[test]
    fn load_fails_on_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(PipelineConfig::load(&temp.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn load_fails_on_malformed_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("specfold.yaml");
        std::fs::write(&path, "apis: [unterminated").unwrap();
        assert!(PipelineConfig::load(&path).is_err());
    }

    #[test]
    fn overridden_paths_are_respected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("specfold.yaml");
        std::fs::write(
            &path,
            "apis: [loans]\npaths:\n  components_dir: parts\n  bundles_dir: out\n",
        )
        .unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(
            config.fragment_path("loans"),
            PathBuf::from("./parts/_loans_apis_part.yml")
        );
        assert_eq!(
            config.bundle_path("loans", "2.0.0"),
            PathBuf::from("./out/loans/2.0.0.yml")
        );
        // Unspecified paths keep their defaults.
        assert_eq!(config.paths.dictionary_dir, PathBuf::from("dictionary"));
    }
}
