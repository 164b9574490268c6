// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Registry - Model Alias Resolution and Provider Management
//
// Manages LLM providers and resolves model aliases to actual providers.
// Implements retry with exponential backoff and a single fallback provider.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::config::{LLMProviderConfig, ModelConfig, OrchestratorConfigSpec};
use crate::domain::llm::{GenerationOptions, GenerationResponse, LLMError, LLMProvider};

use super::ollama::OllamaAdapter;
use super::openai::OpenAIAdapter;

/// Registry for managing LLM providers and resolving model aliases.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LLMProvider>>,
    alias_map: HashMap<String, String>, // alias -> provider_name
    fallback_provider: Option<String>,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl ProviderRegistry {
    /// Create provider registry from orchestrator configuration.
    pub fn from_config(spec: &OrchestratorConfigSpec) -> anyhow::Result<Self> {
        let mut providers = HashMap::new();
        let mut alias_map = HashMap::new();

        info!("Initializing LLM provider registry");

        for provider_config in &spec.llm_providers {
            if !provider_config.enabled {
                info!("Provider '{}' disabled, skipping", provider_config.name);
                continue;
            }

            match Self::create_provider(provider_config) {
                Ok(provider) => {
                    providers.insert(provider_config.name.clone(), provider);

                    for model_config in &provider_config.models {
                        info!(
                            "Mapping alias '{}' -> {} ({})",
                            model_config.alias, model_config.model, provider_config.name
                        );
                        alias_map
                            .insert(model_config.alias.clone(), provider_config.name.clone());
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to initialize provider '{}': {}",
                        provider_config.name, e
                    );
                    // Continue with other providers
                }
            }
        }

        if providers.is_empty() {
            warn!("No LLM providers configured - planning will not be available");
        }

        Ok(Self {
            providers,
            alias_map,
            fallback_provider: spec.llm_selection.fallback_provider.clone(),
            max_retries: spec.llm_selection.max_retries.max(1),
            retry_delay_ms: spec.llm_selection.retry_delay_ms,
        })
    }

    /// Create a provider instance from configuration.
    fn create_provider(config: &LLMProviderConfig) -> anyhow::Result<Arc<dyn LLMProvider>> {
        let api_key = Self::resolve_api_key(&config.api_key)?;
        let model = Self::first_model(config)?;

        let provider: Arc<dyn LLMProvider> = match config.provider_type.as_str() {
            // OpenAI-compatible covers LM Studio, vLLM, etc.
            "openai" | "openai-compatible" => {
                Arc::new(OpenAIAdapter::new(config.endpoint.clone(), api_key, model))
            }
            "ollama" => Arc::new(OllamaAdapter::new(config.endpoint.clone(), model)),
            _ => anyhow::bail!("Unsupported provider type: {}", config.provider_type),
        };

        Ok(provider)
    }

    fn first_model(config: &LLMProviderConfig) -> anyhow::Result<String> {
        config
            .models
            .first()
            .map(|m: &ModelConfig| m.model.clone())
            .ok_or_else(|| anyhow::anyhow!("No models configured for '{}'", config.name))
    }

    /// Resolve API key from config (supports "env:VAR_NAME" syntax).
    fn resolve_api_key(key: &Option<String>) -> anyhow::Result<String> {
        match key {
            Some(k) if k.starts_with("env:") => {
                let var_name = k.strip_prefix("env:").unwrap();
                std::env::var(var_name)
                    .map_err(|_| anyhow::anyhow!("Environment variable not set: {}", var_name))
            }
            Some(k) => Ok(k.clone()),
            None => Ok(String::new()), // For local providers without auth
        }
    }

    /// Generate text using a model alias, with retries and fallback.
    pub async fn generate(
        &self,
        alias: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        let provider_name = self
            .alias_map
            .get(alias)
            .ok_or_else(|| LLMError::ModelNotFound(format!("Model alias '{}' not found", alias)))?;

        let provider = self.providers.get(provider_name).ok_or_else(|| {
            LLMError::Provider(format!("Provider '{}' not found", provider_name))
        })?;

        let mut last_error = None;

        for attempt in 0..self.max_retries {
            match provider.generate(prompt, options).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(
                        "Generation failed (attempt {}/{}): {:?}",
                        attempt + 1,
                        self.max_retries,
                        e
                    );
                    last_error = Some(e);

                    // Try fallback provider on last attempt
                    if attempt == self.max_retries - 1 {
                        if let Some(fallback) = &self.fallback_provider {
                            if let Some(fallback_provider) = self.providers.get(fallback) {
                                info!("Trying fallback provider: {}", fallback);
                                return fallback_provider.generate(prompt, options).await;
                            }
                        }
                    }

                    // Exponential backoff
                    tokio::time::sleep(tokio::time::Duration::from_millis(
                        self.retry_delay_ms * 2_u64.pow(attempt),
                    ))
                    .await;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LLMError::Provider("Unknown error".into())))
    }

    /// Check health of all providers.
    pub async fn health_check_all(&self) -> HashMap<String, Result<(), LLMError>> {
        let mut results = HashMap::new();

        for (name, provider) in &self.providers {
            info!("Health checking provider: {}", name);
            results.insert(name.clone(), provider.health_check().await);
        }

        results
    }

    /// Get list of available model aliases.
    pub fn available_aliases(&self) -> Vec<String> {
        self.alias_map.keys().cloned().collect()
    }

    /// Check if a model alias exists.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.alias_map.contains_key(alias)
    }
}

/// An alias bound to a registry, usable wherever a plain provider is.
///
/// The planner and the device workers take an `Arc<dyn LLMProvider>`; this
/// wrapper lets them go through the registry's retry and fallback path
/// without knowing about aliases.
pub struct AliasedProvider {
    registry: Arc<ProviderRegistry>,
    alias: String,
}

impl AliasedProvider {
    pub fn new(registry: Arc<ProviderRegistry>, alias: impl Into<String>) -> Self {
        Self {
            registry,
            alias: alias.into(),
        }
    }
}

#[async_trait::async_trait]
impl LLMProvider for AliasedProvider {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        self.registry.generate(&self.alias, prompt, options).await
    }

    async fn health_check(&self) -> Result<(), LLMError> {
        let results = self.registry.health_check_all().await;
        for (name, result) in results {
            result.map_err(|e| LLMError::Provider(format!("{name}: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{LLMSelection, ModelConfig};

    fn spec_with_ollama() -> OrchestratorConfigSpec {
        OrchestratorConfigSpec {
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
            ..Default::default()
        }
    }

    #[test]
    fn test_registry_creation_maps_aliases() {
        let registry = ProviderRegistry::from_config(&spec_with_ollama()).unwrap();
        assert!(registry.has_alias("default"));
        assert_eq!(registry.available_aliases().len(), 1);
    }

    #[test]
    fn test_disabled_provider_is_skipped() {
        let mut spec = spec_with_ollama();
        spec.llm_providers[0].enabled = false;
        let registry = ProviderRegistry::from_config(&spec).unwrap();
        assert!(!registry.has_alias("default"));
    }

    #[tokio::test]
    async fn test_unknown_alias_is_model_not_found() {
        let registry = ProviderRegistry::from_config(&spec_with_ollama()).unwrap();
        let result = registry
            .generate("smart", "prompt", &GenerationOptions::default())
            .await;
        assert!(matches!(result, Err(LLMError::ModelNotFound(_))));
    }
}
