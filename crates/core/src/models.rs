//! LLM provider configuration shared by the agents and the server.
//!
//! Each provider loads its API key from the environment via radkit's
//! `from_env` constructors; this module only decides *which* provider and
//! model a given agent call uses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schemas::AgentKind;

/// Supported LLM providers.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    Gemini,
    OpenRouter,
    Grok,
    DeepSeek,
}

impl LlmProvider {
    /// Parse a provider name as it would appear in config or an env var.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "anthropic" => Some(Self::Anthropic),
            "openai" => Some(Self::OpenAI),
            "gemini" => Some(Self::Gemini),
            "openrouter" => Some(Self::OpenRouter),
            "grok" => Some(Self::Grok),
            "deepseek" => Some(Self::DeepSeek),
            _ => None,
        }
    }

    /// Whether this provider accepts a custom base URL.
    pub fn supports_base_url(&self) -> bool {
        matches!(self, LlmProvider::OpenAI)
    }

    /// Default model when neither a global nor a per-agent model is set.
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "claude-sonnet-4-20250514",
            LlmProvider::OpenAI => "gpt-4o",
            LlmProvider::Gemini => "gemini-2.0-flash-exp",
            LlmProvider::OpenRouter => "anthropic/claude-3.5-sonnet",
            LlmProvider::Grok => "grok-2",
            LlmProvider::DeepSeek => "deepseek-chat",
        }
    }
}

/// Resolved configuration for one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name (e.g. "claude-sonnet-4-20250514", "gpt-4o")
    pub model: String,
    /// Base URL override for OpenAI-compatible endpoints
    pub base_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: LlmProvider::Anthropic.default_model().to_string(),
            base_url: None,
        }
    }
}

impl ModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_provider(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            base_url: None,
        }
    }
}

/// Model selection for the whole pipeline: one global choice plus optional
/// per-agent overrides keyed by [`AgentKind::id`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub global_provider: LlmProvider,
    pub global_model: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub per_agent_providers: HashMap<String, LlmProvider>,
    #[serde(default)]
    pub per_agent_models: HashMap<String, String>,
}

impl LlmSettings {
    /// Settings from `REHEARSAL_PROVIDER` / `REHEARSAL_MODEL` /
    /// `REHEARSAL_BASE_URL`, falling back to defaults. Provider API keys
    /// themselves are read later by radkit's `from_env` constructors.
    pub fn from_env() -> Self {
        let global_provider = std::env::var("REHEARSAL_PROVIDER")
            .ok()
            .and_then(|name| LlmProvider::parse(&name))
            .unwrap_or_default();

        Self {
            global_provider,
            global_model: std::env::var("REHEARSAL_MODEL").ok(),
            base_url: std::env::var("REHEARSAL_BASE_URL").ok(),
            per_agent_providers: HashMap::new(),
            per_agent_models: HashMap::new(),
        }
    }

    /// Resolve the config for one agent: per-agent override, then global,
    /// then the provider's default model.
    pub fn config_for(&self, agent: AgentKind) -> ModelConfig {
        let provider = self
            .per_agent_providers
            .get(agent.id())
            .cloned()
            .unwrap_or_else(|| self.global_provider.clone());

        let model = self
            .per_agent_models
            .get(agent.id())
            .or(self.global_model.as_ref())
            .cloned()
            .unwrap_or_else(|| provider.default_model().to_string());

        let base_url = if provider.supports_base_url() {
            self.base_url.clone()
        } else {
            None
        };

        ModelConfig {
            provider,
            model,
            base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_anthropic() {
        let config = ModelConfig::default();
        assert_eq!(config.provider, LlmProvider::Anthropic);
        assert!(config.model.contains("claude"));
    }

    #[test]
    fn provider_parse_is_case_insensitive() {
        assert_eq!(LlmProvider::parse("OpenAI"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::parse("anthropic"), Some(LlmProvider::Anthropic));
        assert_eq!(LlmProvider::parse("claude"), None);
    }

    #[test]
    fn per_agent_override_beats_global() {
        let mut settings = LlmSettings {
            global_model: Some("claude-sonnet-4-20250514".to_string()),
            ..LlmSettings::default()
        };
        settings
            .per_agent_models
            .insert(AgentKind::Assessor.id().to_string(), "claude-opus-4".to_string());

        assert_eq!(settings.config_for(AgentKind::Assessor).model, "claude-opus-4");
        assert_eq!(
            settings.config_for(AgentKind::Technical).model,
            "claude-sonnet-4-20250514"
        );
    }

    #[test]
    fn base_url_only_applies_to_openai() {
        let settings = LlmSettings {
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..LlmSettings::default()
        };
        assert!(settings.config_for(AgentKind::Technical).base_url.is_none());

        let mut openai = settings;
        openai.global_provider = LlmProvider::OpenAI;
        assert!(openai.config_for(AgentKind::Technical).base_url.is_some());
    }

    #[test]
    fn settings_serialization_uses_lowercase_provider() {
        let settings = LlmSettings {
            global_provider: LlmProvider::OpenAI,
            ..LlmSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"openai\""));
    }
}
