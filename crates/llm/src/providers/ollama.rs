use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::prompt::{clean_summary, summarization_messages, to_api_messages, token_budget};
use crate::provider::{LlmError, SummaryBackend};

pub struct OllamaBackend {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
    temperature: f32,
}

impl OllamaBackend {
    pub fn new(url: String, model: String, temperature: f32, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            model,
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

pub(crate) fn request_body(
    model: &str,
    text: &str,
    min_length: usize,
    max_length: usize,
    temperature: f32,
) -> serde_json::Value {
    let messages = summarization_messages(text, min_length, max_length);
    json!({
        "model": model,
        "messages": to_api_messages(&messages),
        "stream": false,
        "options": {
            "temperature": temperature,
            "num_predict": token_budget(max_length),
        },
    })
}

pub(crate) fn parse_chat_response(resp: &serde_json::Value) -> Result<String, LlmError> {
    resp["message"]["content"]
        .as_str()
        .map(clean_summary)
        .ok_or_else(|| LlmError::ParseError("missing message.content".into()))
}

pub(crate) fn parse_tags(resp: &serde_json::Value) -> Result<Vec<String>, LlmError> {
    let models = resp["models"]
        .as_array()
        .ok_or_else(|| LlmError::ParseError("missing models".into()))?;
    Ok(models
        .iter()
        .filter_map(|m| m["name"].as_str().map(str::to_string))
        .collect())
}

/// Ollama reports `llama3.2:latest` for a model pulled as `llama3.2`.
pub(crate) fn model_is_listed(model: &str, available: &[String]) -> bool {
    available.iter().any(|name| {
        name == model
            || name
                .strip_prefix(model)
                .is_some_and(|rest| rest == ":latest" || (!model.contains(':') && rest.starts_with(':')))
    })
}

impl SummaryBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn summarize(&self, text: &str, min_length: usize, max_length: usize) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.url);
        let body = request_body(&self.model, text, min_length, max_length, self.temperature);

        debug!("Ollama request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json()?;
        parse_chat_response(&resp)
    }

    fn warm_up(&self) -> Result<(), LlmError> {
        let available = self.list_models()?;
        if model_is_listed(&self.model, &available) {
            Ok(())
        } else {
            Err(LlmError::ModelUnavailable {
                model: self.model.clone(),
                available: available.join(", "),
            })
        }
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.url);
        debug!("Ollama model listing from {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }
        let resp: serde_json::Value = response.json()?;
        parse_tags(&resp)
    }
}
