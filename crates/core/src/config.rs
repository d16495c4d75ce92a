use std::env;

use serde::{Deserialize, Serialize};

use crate::document::SummaryLength;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub chunking: ChunkingConfig,
    pub pipeline: PipelineConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub grammar: GrammarConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SUMMA_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("SUMMA_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            chunking: ChunkingConfig::from_env_profiled(p),
            pipeline: PipelineConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            grammar: GrammarConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  chunking:  max_words={}, backend_max_words={}, txt_block_bytes={}",
            self.chunking.max_chunk_words,
            self.chunking.backend_max_words,
            self.chunking.txt_block_bytes
        );
        tracing::info!(
            "  pipeline:  workers={}, length={}",
            self.pipeline.workers,
            self.pipeline.summary_length
        );
        tracing::info!("  llm:       provider={}, model={}", self.llm.provider, self.model_name());
        tracing::info!("  ollama:    url={}", self.ollama.url);
        tracing::info!("  grammar:   url={}, language={}", self.grammar.url, self.grammar.language);
    }

    /// Model name of the active provider.
    pub fn model_name(&self) -> &str {
        match self.llm.provider.as_str() {
            "openai" => &self.llm.openai_model,
            _ => &self.ollama.model,
        }
    }

    /// Return a redacted view safe for display (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "chunking": {
                "max_chunk_words": self.chunking.max_chunk_words,
                "backend_max_words": self.chunking.backend_max_words,
                "txt_block_bytes": self.chunking.txt_block_bytes,
            },
            "pipeline": {
                "workers": self.pipeline.workers,
                "summary_length": self.pipeline.summary_length,
            },
            "llm": {
                "provider": self.llm.provider,
                "model": self.model_name(),
                "configured": self.llm.is_configured(),
            },
            "ollama": { "url": self.ollama.url },
            "grammar": { "url": self.grammar.url, "language": self.grammar.language },
        })
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Words per chunk submitted to the backend.
    pub max_chunk_words: usize,
    /// Hard input limit of the backend, in words.
    pub backend_max_words: usize,
    /// Block size used when streaming plain-text files.
    pub txt_block_bytes: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_words: 400,
            backend_max_words: 1024,
            txt_block_bytes: 2048,
        }
    }
}

impl ChunkingConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            max_chunk_words: profiled_env_usize(p, "CHUNK_MAX_WORDS", d.max_chunk_words),
            backend_max_words: profiled_env_usize(p, "BACKEND_MAX_WORDS", d.backend_max_words),
            txt_block_bytes: profiled_env_usize(p, "TXT_BLOCK_BYTES", d.txt_block_bytes),
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Worker threads for chunk summarization (0 = one per CPU core).
    pub workers: usize,
    pub summary_length: SummaryLength,
}

impl PipelineConfig {
    fn from_env_profiled(p: &str) -> Self {
        let raw = profiled_env_or(p, "SUMMARY_LENGTH", "medium");
        let summary_length = raw.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; falling back to medium", e);
            SummaryLength::Medium
        });
        Self {
            workers: profiled_env_usize(p, "SUMMARY_WORKERS", 0),
            summary_length,
        }
    }
}

// ── LLM (summarization backend) ───────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "ollama"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            temperature: profiled_env_or(p, "LLM_TEMPERATURE", "0.1")
                .parse()
                .unwrap_or(0.1),
            timeout_secs: profiled_env_u64(p, "LLM_TIMEOUT_SECS", 300),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
        }
    }
}

// ── Grammar correction (LanguageTool) ─────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarConfig {
    pub url: String,
    pub language: String,
}

impl GrammarConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "GRAMMAR_URL", "http://localhost:8081"),
            language: profiled_env_or(p, "GRAMMAR_LANGUAGE", "en-US"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own profile prefix so parallel tests never share keys.

    #[test]
    fn defaults_without_env() {
        let config = Config::for_profile("SUMMA_TEST_DEFAULTS");
        assert_eq!(config.chunking.max_chunk_words, 400);
        assert_eq!(config.chunking.backend_max_words, 1024);
        assert_eq!(config.chunking.txt_block_bytes, 2048);
        assert_eq!(config.profile_label(), "SUMMA_TEST_DEFAULTS");
    }

    #[test]
    fn profiled_key_wins_over_plain_key() {
        env::set_var("SUMMA_TEST_PROFILED_CHUNK_MAX_WORDS", "250");
        env::set_var("SUMMA_TEST_PROFILED_SUMMARY_LENGTH", "large");
        let config = Config::for_profile("summa_test_profiled");
        assert_eq!(config.chunking.max_chunk_words, 250);
        assert_eq!(config.pipeline.summary_length, SummaryLength::Large);
    }

    #[test]
    fn bad_length_falls_back_to_medium() {
        env::set_var("SUMMA_TEST_BADLEN_SUMMARY_LENGTH", "enormous");
        let config = Config::for_profile("SUMMA_TEST_BADLEN");
        assert_eq!(config.pipeline.summary_length, SummaryLength::Medium);
    }

    #[test]
    fn redacted_summary_hides_api_key() {
        env::set_var("SUMMA_TEST_REDACT_LLM_PROVIDER", "openai");
        env::set_var("SUMMA_TEST_REDACT_OPENAI_API_KEY", "sk-secret");
        let config = Config::for_profile("SUMMA_TEST_REDACT");
        let json = config.redacted_summary().to_string();
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("\"configured\":true"));
    }
}
