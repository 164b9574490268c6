// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Orchestrator Configuration Types
//
// Defines the configuration schema for a HEARTH orchestrator node:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - LLM provider configuration with model alias mapping
// - Orchestration loop settings (iteration budget, event capacity)
// - Worker enablement

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::domain::run::DEFAULT_MAX_ITERATIONS;

pub const MANIFEST_API_VERSION: &str = "100monkeys.ai/v1";
pub const MANIFEST_KIND: &str = "OrchestratorConfig";

/// Top-level Kubernetes-style configuration manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfigManifest {
    /// API version (must be "100monkeys.ai/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "OrchestratorConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: OrchestratorConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable node name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfigSpec {
    /// LLM provider configurations
    #[serde(default)]
    pub llm_providers: Vec<LLMProviderConfig>,

    /// Provider selection / retry / fallback settings
    #[serde(default)]
    pub llm_selection: LLMSelection,

    /// Orchestration loop settings
    #[serde(default)]
    pub orchestration: OrchestrationSettings,

    /// Worker enablement
    #[serde(default)]
    pub workers: WorkerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMProviderConfig {
    /// Unique provider name (e.g., "openai", "ollama-local")
    pub name: String,

    /// Provider type: "openai", "ollama", "openai-compatible"
    #[serde(rename = "type")]
    pub provider_type: String,

    /// API endpoint URL
    pub endpoint: String,

    /// API key (supports "env:VAR_NAME" indirection)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Whether this provider is active
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Available models on this provider
    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Alias referenced by orchestration settings (e.g., "default", "fast")
    pub alias: String,

    /// Actual model identifier for the provider API
    pub model: String,

    /// Maximum context window size in tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMSelection {
    /// Fallback provider name tried when the primary exhausts its retries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_provider: Option<String>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for LLMSelection {
    fn default() -> Self {
        Self {
            fallback_provider: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationSettings {
    /// Planning-pass budget per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u8,

    /// Model alias used for planning and worker tool resolution
    #[serde(default = "default_planner_model")]
    pub planner_model: String,

    /// Run event bus buffer capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for OrchestrationSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            planner_model: default_planner_model(),
            event_capacity: default_event_capacity(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Worker identifiers to register for runs. Empty means "all built-in
    /// workers"; a worker may be dynamically omitted from a given node's
    /// registry by listing the others.
    #[serde(default)]
    pub enabled: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid apiVersion: expected '100monkeys.ai/v1', got '{0}'")]
    InvalidApiVersion(String),

    #[error("invalid kind: expected 'OrchestratorConfig', got '{0}'")]
    InvalidKind(String),

    #[error("orchestration.max_iterations must be at least 1")]
    ZeroIterationBudget,
}

impl OrchestratorConfigManifest {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version != MANIFEST_API_VERSION {
            return Err(ConfigError::InvalidApiVersion(self.api_version.clone()));
        }
        if self.kind != MANIFEST_KIND {
            return Err(ConfigError::InvalidKind(self.kind.clone()));
        }
        if self.spec.orchestration.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationBudget);
        }
        Ok(())
    }

    /// Development default: a local Ollama provider and every built-in
    /// worker enabled.
    pub fn development() -> Self {
        Self {
            api_version: MANIFEST_API_VERSION.to_string(),
            kind: MANIFEST_KIND.to_string(),
            metadata: ManifestMetadata {
                name: "hearth-dev".to_string(),
                version: None,
                labels: None,
            },
            spec: OrchestratorConfigSpec {
                llm_providers: vec![LLMProviderConfig {
                    name: "ollama-local".to_string(),
                    provider_type: "ollama".to_string(),
                    endpoint: "http://localhost:11434".to_string(),
                    api_key: None,
                    enabled: true,
                    models: vec![ModelConfig {
                        alias: "default".to_string(),
                        model: "llama3.2".to_string(),
                        context_window: Some(8192),
                    }],
                }],
                llm_selection: LLMSelection::default(),
                orchestration: OrchestrationSettings::default(),
                workers: WorkerSettings::default(),
            },
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_max_iterations() -> u8 {
    DEFAULT_MAX_ITERATIONS
}

fn default_planner_model() -> String {
    "default".to_string()
}

fn default_event_capacity() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
apiVersion: 100monkeys.ai/v1
kind: OrchestratorConfig
metadata:
  name: hearth-test
spec:
  llm_providers:
    - name: openai
      type: openai
      endpoint: https://api.openai.com/v1
      api_key: env:OPENAI_API_KEY
      models:
        - alias: default
          model: gpt-4o
  llm_selection:
    fallback_provider: ollama-local
  orchestration:
    max_iterations: 5
    planner_model: default
  workers:
    enabled: [window, light, water_tank]
"#;

    #[test]
    fn test_parse_sample_manifest() {
        let manifest = OrchestratorConfigManifest::from_yaml(SAMPLE).unwrap();
        assert_eq!(manifest.metadata.name, "hearth-test");
        assert_eq!(manifest.spec.llm_providers.len(), 1);
        assert_eq!(manifest.spec.llm_providers[0].provider_type, "openai");
        assert!(manifest.spec.llm_providers[0].enabled);
        assert_eq!(manifest.spec.orchestration.max_iterations, 5);
        assert_eq!(
            manifest.spec.workers.enabled,
            vec!["window", "light", "water_tank"]
        );
    }

    #[test]
    fn test_defaults_fill_in() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: OrchestratorConfig
metadata:
  name: minimal
spec: {}
"#;
        let manifest = OrchestratorConfigManifest::from_yaml(yaml).unwrap();
        assert_eq!(
            manifest.spec.orchestration.max_iterations,
            DEFAULT_MAX_ITERATIONS
        );
        assert_eq!(manifest.spec.orchestration.planner_model, "default");
        assert!(manifest.spec.workers.enabled.is_empty());
        assert_eq!(manifest.spec.llm_selection.max_retries, 2);
    }

    #[test]
    fn test_rejects_wrong_kind() {
        let yaml = SAMPLE.replace("OrchestratorConfig", "NodeConfig");
        assert!(matches!(
            OrchestratorConfigManifest::from_yaml(&yaml),
            Err(ConfigError::InvalidKind(_))
        ));
    }

    #[test]
    fn test_rejects_zero_iteration_budget() {
        let yaml = SAMPLE.replace("max_iterations: 5", "max_iterations: 0");
        assert!(matches!(
            OrchestratorConfigManifest::from_yaml(&yaml),
            Err(ConfigError::ZeroIterationBudget)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hearth-config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        let manifest = OrchestratorConfigManifest::load(&path).unwrap();
        assert_eq!(manifest.metadata.name, "hearth-test");
    }

    #[test]
    fn test_development_default_validates() {
        assert!(OrchestratorConfigManifest::development().validate().is_ok());
    }
}
