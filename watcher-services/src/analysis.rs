//! Strategy analysis adapter
//!
//! Builds one compact prompt out of a trade history and dispatches it to
//! the configured generative backend: hosted Gemini or a self-hosted
//! Ollama. Provider settings arrive as an explicit per-request value,
//! never as ambient state.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use watcher_core::{Trade, WatcherError, WatcherResult};

/// Base URL for the Gemini API
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model per provider
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Default endpoint for a local Ollama install
const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Ceiling on any provider call. A hung self-hosted endpoint gets aborted
/// and surfaces as an ordinary network error.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Most-recent trades included in the prompt, to keep it compact
const PROMPT_TRADE_LIMIT: usize = 60;

/// Which generative backend to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisProvider {
    Gemini,
    Ollama,
}

/// Per-request provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub provider: AnalysisProvider,
    /// Model name; each provider has a sensible default
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL for self-hosted providers
    #[serde(default)]
    pub endpoint: Option<String>,
    /// API key for hosted providers
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Adapter that turns a trade history into a strategy write-up
pub struct StrategyAnalyzer {
    client: Client,
}

impl StrategyAnalyzer {
    /// Create a new analyzer
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Generate a strategy summary for a trade history
    #[instrument(skip(self, config, trades), fields(provider = ?config.provider))]
    pub async fn analyze(
        &self,
        config: &AnalysisConfig,
        trades: &[Trade],
    ) -> WatcherResult<String> {
        if trades.is_empty() {
            return Err(WatcherError::config("no trades to analyze"));
        }

        let prompt = build_strategy_prompt(trades);
        debug!("Built analysis prompt ({} chars)", prompt.len());

        match config.provider {
            AnalysisProvider::Gemini => self.analyze_gemini(config, &prompt).await,
            AnalysisProvider::Ollama => self.analyze_ollama(config, &prompt).await,
        }
    }

    async fn analyze_gemini(&self, config: &AnalysisConfig, prompt: &str) -> WatcherResult<String> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WatcherError::config("Gemini requires an API key"))?;

        let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, model);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| WatcherError::network(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WatcherError::api(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let body: GeminiResponse = response.json().await.map_err(|e| {
            WatcherError::parse(format!("Failed to parse Gemini response: {}", e))
        })?;

        body.candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| WatcherError::api("Gemini returned no analysis"))
    }

    async fn analyze_ollama(&self, config: &AnalysisConfig, prompt: &str) -> WatcherResult<String> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_OLLAMA_ENDPOINT);
        let model = config.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
        let url = format!("{}/api/generate", endpoint.trim_end_matches('/'));

        let request = OllamaRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WatcherError::network(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WatcherError::api(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|e| {
            WatcherError::parse(format!("Failed to parse Ollama response: {}", e))
        })?;

        if body.response.is_empty() {
            return Err(WatcherError::api("Ollama returned no analysis"));
        }

        Ok(body.response)
    }
}

impl Default for StrategyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the analysis prompt from a trade history.
///
/// Only the most recent trades go in, as one compact line each, to keep
/// the context window small.
fn build_strategy_prompt(trades: &[Trade]) -> String {
    let market_name = trades
        .first()
        .map(|t| t.market.as_str())
        .unwrap_or("Unknown Market");

    let trade_summary = trades
        .iter()
        .take(PROMPT_TRADE_LIMIT)
        .map(|t| {
            format!(
                "[{}] {} {} shares @ ${:.2}",
                t.timestamp.format("%Y-%m-%d"),
                t.side,
                t.size,
                t.price
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert crypto quant analyzing a \"Whale\" wallet on Polymarket.\n\
         \n\
         Target Market: \"{}\"\n\
         \n\
         Trade History Log (Most recent first):\n\
         {}\n\
         \n\
         Based ONLY on this data, provide a tactical analysis:\n\
         1. **Conviction Level**: Based on trade sizes and frequency, how confident is this whale in the outcome?\n\
         2. **Timing Analysis**: Did they buy the dip or FOMO into tops? (Price range is 0.00 to 1.00).\n\
         3. **P&L Estimation**: Are they currently up or down?\n\
         4. **Strategy**: Are they hedging, accumulating, or dumping?\n\
         \n\
         Format the response as a sleek, professional trading journal entry. Use bullet points. Be concise.",
        market_name, trade_summary
    )
}

// ============================================================================
// Provider wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}
