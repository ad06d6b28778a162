use crate::catalog::CatalogItem;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Failures of the vibe path. These are recoverable: the caller gets a
/// distinct signal instead of a partial or garbled ranking, and nothing
/// in the catalog or preference state is touched.
#[derive(Debug, Error)]
pub enum VibeError {
    #[error("recommendation service unavailable: {0}")]
    Unavailable(String),
    #[error("malformed recommendation payload: {0}")]
    Malformed(String),
    #[error("{API_KEY_ENV} environment variable is not set")]
    MissingApiKey,
}

/// Opaque text-in/text-out completion service. The recommender only ever
/// sees this seam, so tests swap in canned clients.
pub trait CompletionClient {
    fn complete(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, VibeError>> + Send;
}

/// One LLM-ranked catalog item, same output shape as the quiz path but
/// with free-form reasoning instead of category details.
#[derive(Debug, Clone)]
pub struct VibeRecommendation {
    pub item: CatalogItem,
    pub score: f32,
    pub reasoning: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini HTTP client with a hard request timeout, so a hung call
/// surfaces as `Unavailable` instead of blocking the request forever.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, VibeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VibeError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }

    /// Reads the API key from the environment; a missing key is a hard
    /// startup error rather than a per-request surprise.
    pub fn from_env(model: String, timeout: Duration) -> Result<Self, VibeError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| VibeError::MissingApiKey)?;
        Self::new(api_key, model, timeout)
    }
}

impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, VibeError> {
        let url = format!(
            "{GEMINI_ENDPOINT}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VibeError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| VibeError::Unavailable(e.to_string()))?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| VibeError::Malformed(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| VibeError::Malformed("response carried no text".to_string()))
    }
}

#[derive(Deserialize)]
struct RankedResponse {
    #[serde(default)]
    recommendations: Vec<RankedEntry>,
}

#[derive(Deserialize)]
struct RankedEntry {
    #[serde(rename = "itemId")]
    item_id: u32,
    score: f32,
    #[serde(default)]
    reasoning: String,
}

/// Builds the single prompt: scoring instructions, the user's query and
/// the serialized catalog, one JSON object per line.
pub fn build_prompt(
    query: &str,
    items: &[CatalogItem],
    top_n: usize,
) -> Result<String, VibeError> {
    let mut catalog_lines = Vec::with_capacity(items.len());
    for item in items {
        let line = serde_json::to_string(item)
            .map_err(|e| VibeError::Malformed(format!("failed to serialize catalog: {e}")))?;
        catalog_lines.push(line);
    }

    Ok(format!(
        "You are an expert vaporizer recommender. You will be given a user's \
         query and a list of available devices in JSON format.\n\n\
         Analyze the query for vibe (e.g. relaxing, social), context (e.g. at \
         home, on the go), scenario and technical needs (portability, vapor \
         quality, price, ease of use), then score each device from 0 to 100 by \
         how well it matches.\n\n\
         Respond with a single valid JSON object of the form \
         {{\"recommendations\": [{{\"itemId\": number, \"score\": number, \
         \"reasoning\": string}}]}}. Return ONLY the raw JSON object, without \
         markdown code fences. Rank from highest score to lowest and include \
         only the top {top_n} matches.\n\n\
         User Query: \"{query}\"\n\nAvailable Devices:\n{}",
        catalog_lines.join("\n")
    ))
}

/// Models love fencing JSON even when told not to.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses the model's ranked response against the catalog. Entries whose
/// id does not exist in the catalog are dropped; anything that is not the
/// agreed JSON shape is a `Malformed` error, never a partial ranking.
pub fn parse_ranked_response(
    raw: &str,
    items: &[CatalogItem],
) -> Result<Vec<VibeRecommendation>, VibeError> {
    let cleaned = strip_code_fences(raw);
    let response: RankedResponse =
        serde_json::from_str(&cleaned).map_err(|e| VibeError::Malformed(e.to_string()))?;

    let mut recommendations: Vec<VibeRecommendation> = response
        .recommendations
        .into_iter()
        .filter_map(|entry| {
            items.iter().find(|i| i.id == entry.item_id).map(|item| {
                VibeRecommendation {
                    item: item.clone(),
                    score: entry.score,
                    reasoning: entry.reasoning,
                }
            })
        })
        .collect();

    // The model is asked for a ranked list, but enforce the order anyway.
    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(recommendations)
}

/// The vibe path end to end: one prompt, one completion, one parse.
pub async fn recommend_by_vibe<C: CompletionClient>(
    client: &C,
    query: &str,
    items: &[CatalogItem],
    top_n: usize,
) -> Result<Vec<VibeRecommendation>, VibeError> {
    let prompt = build_prompt(query, items, top_n)?;
    let raw = client.complete(&prompt).await?;
    let mut recommendations = parse_ranked_response(&raw, items)?;
    recommendations.truncate(top_n);
    Ok(recommendations)
}
