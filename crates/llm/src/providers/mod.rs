pub mod ollama;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use summa_core::config::{LlmConfig, OllamaConfig};
use tracing::info;

use crate::provider::{LlmError, SummaryBackend};

/// Create the appropriate summarization backend based on config.
pub fn create_backend(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Box<dyn SummaryBackend>, LlmError> {
    let timeout = Duration::from_secs(llm_config.timeout_secs.max(1));
    match llm_config.provider.as_str() {
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiBackend::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                base_url.to_string(),
                llm_config.temperature,
                timeout,
            )?))
        }
        "ollama" => Ok(Box::new(ollama::OllamaBackend::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
            llm_config.temperature,
            timeout,
        )?)),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

/// Factory that builds the configured backend and checks the model is served.
/// Meant to be handed to [`crate::SharedBackend::new`].
pub fn backend_factory(
    llm_config: LlmConfig,
    ollama_config: OllamaConfig,
) -> impl Fn() -> Result<Arc<dyn SummaryBackend>, LlmError> + Send + Sync + 'static {
    move || {
        let backend = create_backend(&llm_config, &ollama_config)?;
        info!("Checking model availability on {}", backend.name());
        backend.warm_up()?;
        Ok(Arc::from(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".into(),
            openai_base_url: None,
            temperature: 0.1,
            timeout_secs: 5,
        }
    }

    fn ollama() -> OllamaConfig {
        OllamaConfig {
            url: "http://localhost:11434".into(),
            model: "llama3.2".into(),
        }
    }

    #[test]
    fn creates_ollama_without_network() {
        let backend = create_backend(&llm("ollama"), &ollama()).unwrap();
        assert_eq!(backend.name(), "ollama");
    }

    #[test]
    fn openai_requires_key() {
        let err = create_backend(&llm("openai"), &ollama()).err().unwrap();
        assert!(matches!(err, LlmError::NotConfigured(_)));

        let mut config = llm("openai");
        config.openai_api_key = Some("sk-test".into());
        assert_eq!(create_backend(&config, &ollama()).unwrap().name(), "openai");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_backend(&llm("gemini"), &ollama()).err().unwrap();
        assert!(err.to_string().contains("unknown LLM provider"));
    }

    #[test]
    fn factory_surfaces_construction_errors() {
        let factory = backend_factory(llm("bogus"), ollama());
        assert!(matches!(factory(), Err(LlmError::NotConfigured(_))));
    }
}
