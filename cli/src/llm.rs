//! OpenAI-compatible chat completions backend

use std::time::Duration;

use docstyle::compose::{ContentBackend, ContentRequest};
use docstyle::{Error, Result};
use serde::{Deserialize, Serialize};

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2000;

const SYSTEM_PROMPT: &str = "You are an expert at creating professional project estimates.
Analyze the client request and reference documents to create a structured estimate.
Return ONLY valid JSON with this exact structure:
{
  \"title\": \"Project Title\",
  \"intro\": \"Brief introduction paragraph\",
  \"sections\": [
    {\"heading\": \"Section Name\", \"bullets\": [\"Item 1\", \"Item 2\"]}
  ]
}
Ensure all sections have meaningful headings and 2-6 bullet points each.";

/// Connection settings, usually read from `LLM_*` environment variables.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Build a config when both endpoint and model are set.
    pub fn from_parts(
        base_url: Option<String>,
        model: Option<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Option<Self> {
        let base_url = base_url.filter(|s| !s.trim().is_empty())?;
        let model = model.filter(|s| !s.trim().is_empty())?;
        Some(Self {
            base_url,
            model,
            api_key: api_key.filter(|s| !s.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

/// Blocking [`ContentBackend`] over an async HTTP client.
pub struct ChatCompletionsBackend {
    config: LlmConfig,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl ChatCompletionsBackend {
    pub fn new(config: LlmConfig) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &ContentRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(request)?,
                },
            ],
        };

        let mut builder = self.client.post(self.config.endpoint()).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Backend("request timed out".to_string())
            } else {
                Error::Backend(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("API error ({}): {}", status, detail)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("invalid response body: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::Backend("reply had no content".to_string()))
    }
}

impl ContentBackend for ChatCompletionsBackend {
    fn generate(&self, request: &ContentRequest) -> Result<String> {
        log::debug!("Requesting estimate content from {}", self.config.model);
        self.runtime.block_on(self.complete(request))
    }
}

fn user_prompt(request: &ContentRequest) -> Result<String> {
    let style = serde_json::to_string_pretty(&request.style)
        .map_err(|e| Error::Backend(format!("style hint serialization failed: {}", e)))?;
    Ok(format!(
        "Create a professional estimate based on this client request:\n\n{}\n\n\
         Style profile from reference documents:\n{}\n\n\
         Reference text from similar documents (for style and tone):\n{}\n\n\
         Generate a comprehensive estimate that matches the style and structure of the reference documents.",
        request.prompt, style, request.reference_text
    ))
}
