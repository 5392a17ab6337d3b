//! The generation seam every agent calls through.
//!
//! [`StructuredLlm`] is the one capability this crate consumes from the
//! outside world: given a system prompt and an input, produce a structured
//! payload for the named agent, or fail. The registry re-validates every
//! payload regardless of backend, so implementations cannot smuggle
//! malformed data past the pipeline.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::models::LlmSettings;
use crate::schemas::{
    AgentKind, AssessmentReport, BehavioralReport, CultureReport, GrowthPlan, TechnicalReport,
};

/// Opaque structured-generation capability.
#[async_trait]
pub trait StructuredLlm: Send + Sync {
    async fn generate(
        &self,
        agent: AgentKind,
        system_prompt: &str,
        input: &str,
    ) -> Result<serde_json::Value, GenerationError>;
}

/// Run one schema-constrained `LlmFunction` call against whichever provider
/// the config selects. Centralizes the provider dispatch so agents never
/// match on providers themselves.
#[macro_export]
macro_rules! run_llm_function {
    ($config:expr, $output_type:ty, $system_prompt:expr, $input:expr) => {{
        use radkit::agent::LlmFunction;
        use radkit::models::providers::{
            AnthropicLlm, DeepSeekLlm, GeminiLlm, GrokLlm, OpenAILlm, OpenRouterLlm,
        };
        use $crate::models::LlmProvider;

        let config = $config;
        let result: anyhow::Result<$output_type> = match config.provider {
            LlmProvider::Anthropic => {
                let llm = AnthropicLlm::from_env(&config.model)?;
                let func =
                    LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt);
                func.run($input).await.map_err(Into::into)
            }
            LlmProvider::OpenAI => {
                let mut llm = OpenAILlm::from_env(&config.model)?;
                if let Some(base_url) = &config.base_url {
                    llm = llm.with_base_url(base_url);
                }
                let func =
                    LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt);
                func.run($input).await.map_err(Into::into)
            }
            LlmProvider::Gemini => {
                let llm = GeminiLlm::from_env(&config.model)?;
                let func =
                    LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt);
                func.run($input).await.map_err(Into::into)
            }
            LlmProvider::OpenRouter => {
                let llm = OpenRouterLlm::from_env(&config.model)?;
                let func =
                    LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt);
                func.run($input).await.map_err(Into::into)
            }
            LlmProvider::Grok => {
                let llm = GrokLlm::from_env(&config.model)?;
                let func =
                    LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt);
                func.run($input).await.map_err(Into::into)
            }
            LlmProvider::DeepSeek => {
                let llm = DeepSeekLlm::from_env(&config.model)?;
                let func =
                    LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt);
                func.run($input).await.map_err(Into::into)
            }
        };
        result
    }};
}

pub use run_llm_function;

/// Production backend: resolves a per-agent [`crate::models::ModelConfig`]
/// and calls the configured provider through radkit. Each agent kind is
/// generated against its own output contract so the provider returns the
/// right shape; the registry still bound-checks afterwards.
pub struct RadkitLlm {
    settings: LlmSettings,
}

impl RadkitLlm {
    pub fn new(settings: LlmSettings) -> Self {
        Self { settings }
    }
}

async fn call(
    settings: &LlmSettings,
    agent: AgentKind,
    system_prompt: &str,
    input: &str,
) -> anyhow::Result<serde_json::Value> {
    let config = settings.config_for(agent);
    tracing::debug!(agent = %agent, model = %config.model, "dispatching generation call");

    let value = match agent {
        AgentKind::Technical => {
            serde_json::to_value(run_llm_function!(&config, TechnicalReport, system_prompt, input)?)?
        }
        AgentKind::Behavioral => serde_json::to_value(run_llm_function!(
            &config,
            BehavioralReport,
            system_prompt,
            input
        )?)?,
        AgentKind::Culture => {
            serde_json::to_value(run_llm_function!(&config, CultureReport, system_prompt, input)?)?
        }
        AgentKind::GrowthCoach => {
            serde_json::to_value(run_llm_function!(&config, GrowthPlan, system_prompt, input)?)?
        }
        AgentKind::Assessor => serde_json::to_value(run_llm_function!(
            &config,
            AssessmentReport,
            system_prompt,
            input
        )?)?,
    };

    Ok(value)
}

#[async_trait]
impl StructuredLlm for RadkitLlm {
    async fn generate(
        &self,
        agent: AgentKind,
        system_prompt: &str,
        input: &str,
    ) -> Result<serde_json::Value, GenerationError> {
        call(&self.settings, agent, system_prompt, input)
            .await
            .map_err(GenerationError::from)
    }
}
