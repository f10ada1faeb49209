// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Solver Configuration Types
//
// Defines the configuration schema for arcsmith runs, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Dataset location and file overrides
// - Detector selection and second-attempt policy
// - Worker pool size, output paths and logging

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::solver::{HeuristicSolver, SecondAttempt};
use crate::domain::transform::{detector_by_name, DETECTOR_NAMES};

pub const API_VERSION: &str = "arcsmith/v1";
pub const KIND: &str = "SolverConfig";
pub const CONFIG_PATH_ENV: &str = "ARCSMITH_CONFIG_PATH";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid apiVersion: '{0}'. Must be '{expected}'", expected = API_VERSION)]
    ApiVersion(String),

    #[error("Invalid kind: '{0}'. Must be '{expected}'", expected = KIND)]
    Kind(String),

    #[error("metadata.name cannot be empty")]
    EmptyName,

    #[error("Unknown detector '{0}'. Known detectors: {known}", known = DETECTOR_NAMES.join(", "))]
    UnknownDetector(String),

    #[error("Detector '{0}' is listed more than once")]
    DuplicateDetector(String),

    #[error("spec.solver.min_confidence must be within [0, 1], got {0}")]
    MinConfidence(f64),

    #[error("spec.runtime.workers must be at least 1")]
    NoWorkers,
}

/// Top-level Kubernetes-style solver configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfigManifest {
    /// API version (must be "arcsmith/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "SolverConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: SolverConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfigSpec {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub solver: SolverSettings,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Directory searched for arc-agi_*.json files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Explicit challenge file (skips discovery)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenges_file: Option<PathBuf>,

    /// Explicit solution file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solutions_file: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            challenges_file: None,
            solutions_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Detectors to run, in evaluation order
    #[serde(default = "default_detectors")]
    pub detectors: Vec<String>,

    /// Candidates below this prior confidence are ignored
    #[serde(default)]
    pub min_confidence: f64,

    #[serde(default)]
    pub second_attempt: SecondAttempt,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            detectors: default_detectors(),
            min_confidence: 0.0,
            second_attempt: SecondAttempt::default(),
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for name in &self.detectors {
            if !DETECTOR_NAMES.contains(&name.as_str()) {
                return Err(ConfigError::UnknownDetector(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateDetector(name.clone()));
            }
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::MinConfidence(self.min_confidence));
        }
        Ok(())
    }

    pub fn build_solver(&self) -> Result<HeuristicSolver, ConfigError> {
        self.validate()?;
        let detectors = self
            .detectors
            .iter()
            .map(|name| {
                detector_by_name(name).ok_or_else(|| ConfigError::UnknownDetector(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(HeuristicSolver::new(
            detectors,
            self.min_confidence,
            self.second_attempt,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Tasks solved concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_submission_path")]
    pub submission_path: PathBuf,

    /// Run report written beside the submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,

    #[serde(default)]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            submission_path: default_submission_path(),
            report_path: None,
            pretty: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// compact, pretty or json
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_detectors() -> Vec<String> {
    DETECTOR_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_workers() -> usize {
    4
}

fn default_submission_path() -> PathBuf {
    PathBuf::from("submission.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for SolverConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "default".to_string(),
                version: None,
                labels: None,
            },
            spec: SolverConfigSpec::default(),
        }
    }
}

impl SolverConfigManifest {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        Ok(manifest)
    }

    /// Candidate config paths in priority order (env, cwd, home, system).
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(env_path));
        }

        paths.push(PathBuf::from("./arcsmith-config.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".arcsmith").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/arcsmith/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\arcsmith\\config.yaml"));

        paths
    }

    pub fn discover_config() -> Option<PathBuf> {
        Self::discovery_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::debug!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `ARCSMITH_*` overrides read through `lookup`.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("ARCSMITH_WORKERS") {
            match val.parse::<usize>() {
                Ok(workers) => {
                    tracing::info!("Environment override: ARCSMITH_WORKERS={}", workers);
                    self.spec.runtime.workers = workers;
                }
                Err(_) => tracing::warn!(
                    "Invalid value for ARCSMITH_WORKERS: '{}'. Expected a positive integer. Ignoring.",
                    val
                ),
            }
        }

        if let Some(val) = lookup("ARCSMITH_DATA_DIR") {
            tracing::info!("Environment override: ARCSMITH_DATA_DIR={}", val);
            self.spec.dataset.data_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("ARCSMITH_SECOND_ATTEMPT") {
            match val.parse::<SecondAttempt>() {
                Ok(mode) => {
                    tracing::info!("Environment override: ARCSMITH_SECOND_ATTEMPT={:?}", mode);
                    self.spec.solver.second_attempt = mode;
                }
                Err(e) => tracing::warn!("Invalid value for ARCSMITH_SECOND_ATTEMPT: {}. Ignoring.", e),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version != API_VERSION {
            return Err(ConfigError::ApiVersion(self.api_version.clone()));
        }
        if self.kind != KIND {
            return Err(ConfigError::Kind(self.kind.clone()));
        }
        if self.metadata.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.spec.runtime.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        self.spec.solver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = SolverConfigManifest::default();
        assert_eq!(manifest.api_version, API_VERSION);
        assert_eq!(manifest.kind, KIND);
        assert_eq!(manifest.spec.runtime.workers, 4);
        assert_eq!(manifest.spec.solver.detectors.len(), DETECTOR_NAMES.len());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_spec_uses_defaults() {
        let yaml = r#"
apiVersion: arcsmith/v1
kind: SolverConfig
metadata:
  name: kaggle
spec:
  solver:
    detectors: [inversion, border_fill, rescale]
    second_attempt: duplicate
  runtime:
    workers: 2
"#;
        let manifest = SolverConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.metadata.name, "kaggle");
        assert_eq!(manifest.spec.solver.detectors, vec!["inversion", "border_fill", "rescale"]);
        assert_eq!(manifest.spec.solver.second_attempt, SecondAttempt::Duplicate);
        assert_eq!(manifest.spec.runtime.workers, 2);
        assert_eq!(manifest.spec.output.submission_path, PathBuf::from("submission.json"));
        assert_eq!(manifest.spec.observability.log_format, "compact");
        assert!(manifest.validate().is_ok());

        let solver = manifest.spec.solver.build_solver().unwrap();
        assert_eq!(solver.detector_names(), vec!["inversion", "border_fill", "rescale"]);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut manifest = SolverConfigManifest::default();
        manifest.spec.output.report_path = Some(PathBuf::from("report.json"));
        let yaml = serde_yaml::to_string(&manifest).unwrap();
        let back = SolverConfigManifest::from_yaml_str(&yaml).unwrap();
        assert_eq!(back.spec.output.report_path, Some(PathBuf::from("report.json")));
        assert_eq!(back.spec.solver.detectors, manifest.spec.solver.detectors);
    }

    #[test]
    fn test_validation() {
        let mut manifest = SolverConfigManifest::default();
        manifest.api_version = "v0".to_string();
        assert_eq!(manifest.validate(), Err(ConfigError::ApiVersion("v0".to_string())));

        let mut manifest = SolverConfigManifest::default();
        manifest.spec.runtime.workers = 0;
        assert_eq!(manifest.validate(), Err(ConfigError::NoWorkers));

        let mut manifest = SolverConfigManifest::default();
        manifest.spec.solver.detectors.push("rotation".to_string());
        assert_eq!(
            manifest.validate(),
            Err(ConfigError::DuplicateDetector("rotation".to_string()))
        );

        let mut manifest = SolverConfigManifest::default();
        manifest.spec.solver.detectors = vec!["gravity".to_string()];
        assert!(matches!(manifest.validate(), Err(ConfigError::UnknownDetector(_))));

        let mut manifest = SolverConfigManifest::default();
        manifest.spec.solver.min_confidence = 1.2;
        assert_eq!(manifest.validate(), Err(ConfigError::MinConfidence(1.2)));
    }

    #[test]
    fn test_overrides() {
        let mut manifest = SolverConfigManifest::default();
        manifest.apply_overrides_from(|key| match key {
            "ARCSMITH_WORKERS" => Some("8".to_string()),
            "ARCSMITH_DATA_DIR" => Some("/data/arc".to_string()),
            "ARCSMITH_SECOND_ATTEMPT" => Some("bogus".to_string()),
            _ => None,
        });
        assert_eq!(manifest.spec.runtime.workers, 8);
        assert_eq!(manifest.spec.dataset.data_dir, PathBuf::from("/data/arc"));
        assert_eq!(manifest.spec.solver.second_attempt, SecondAttempt::RunnerUp);
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let missing = PathBuf::from("/nonexistent/arcsmith.yaml");
        assert!(SolverConfigManifest::load_or_default(Some(missing)).is_err());
    }
}
