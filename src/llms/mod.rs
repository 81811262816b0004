//! LLM layer for the crew engine.
//!
//! - [`base_llm`] - The trait all LLM implementations follow
//! - [`providers`] - Concrete provider implementations

pub mod base_llm;
pub mod providers;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::config::LlmSettings;
use crate::utilities::errors::LlmError;
use providers::openai::OpenAICompletion;

pub use base_llm::{BaseLLM, BaseLLMState, LLMMessage, LLMResponse};

/// Split a model string into `(provider, model)`.
///
/// `"openai/gpt-4o"` yields `("openai", "gpt-4o")`; bare names such as
/// `"gpt-4o-mini"` are attributed to OpenAI.
pub fn parse_model_string(llm_str: &str) -> (String, String) {
    match llm_str.split_once('/') {
        Some((provider, model)) => (provider.to_lowercase(), model.to_string()),
        None => ("openai".to_string(), llm_str.to_string()),
    }
}

/// Create the LLM instance described by `settings`.
///
/// Unknown providers are served through the OpenAI-compatible client with
/// the full model string, which is what gateways such as OpenRouter or a
/// local proxy expect.
pub fn create_llm(settings: &LlmSettings) -> Result<Arc<dyn BaseLLM>, LlmError> {
    let (provider, model) = parse_model_string(&settings.model);

    log::debug!("Creating LLM instance: provider={}, model={}", provider, model);

    let llm = match provider.as_str() {
        "openai" => OpenAICompletion::new(model, settings.api_key.clone(), settings.base_url.clone())?,
        other => {
            log::warn!("Unknown provider '{}', falling back to OpenAI-compatible", other);
            OpenAICompletion::new(
                settings.model.clone(),
                settings.api_key.clone(),
                settings.base_url.clone(),
            )?
        }
    };

    Ok(Arc::new(
        llm.with_timeout(settings.timeout)
            .with_max_retries(settings.max_retries)
            .with_temperature(settings.temperature)
            .with_max_tokens(settings.max_tokens)
            .with_organization(settings.organization.clone()),
    ))
}
