use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::prompt::{clean_summary, summarization_messages, to_api_messages, token_budget};
use crate::provider::{LlmError, SummaryBackend};

pub struct OpenAiBackend {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiBackend {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature,
        })
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
        "temperature": temperature,
        "max_tokens": token_budget(max_length),
    })
}

pub(crate) fn parse_chat_response(resp: &serde_json::Value) -> Result<String, LlmError> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(clean_summary)
        .ok_or_else(|| LlmError::ParseError("missing choices[0].message.content".into()))
}

pub(crate) fn parse_model_list(resp: &serde_json::Value) -> Result<Vec<String>, LlmError> {
    let data = resp["data"]
        .as_array()
        .ok_or_else(|| LlmError::ParseError("missing data".into()))?;
    let mut ids: Vec<String> = data
        .iter()
        .filter_map(|m| m["id"].as_str().map(str::to_string))
        .collect();
    ids.sort();
    Ok(ids)
}

impl SummaryBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn summarize(&self, text: &str, min_length: usize, max_length: usize) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = request_body(&self.model, text, min_length, max_length, self.temperature);

        debug!("OpenAI request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
        if available.iter().any(|id| id == &self.model) {
            Ok(())
        } else {
            Err(LlmError::ModelUnavailable {
                model: self.model.clone(),
                available: available.join(", "),
            })
        }
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/v1/models", self.base_url);
        debug!("OpenAI model listing from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()?;
        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }
        let resp: serde_json::Value = response.json()?;
        parse_model_list(&resp)
    }
}
