//! OpenAI-compatible chat-completion adapter for [`TaskGenerator`].
//!
//! Issues a structured-output request: the response format carries a strict
//! JSON schema constraining the batch to `{batch_title, tasks[]}` with each
//! task limited to the title/description/priority/status shape. Transport
//! and API failures are fatal; a 2xx response whose content is missing or
//! unparseable degrades to [`GeneratedTaskBatch::empty`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use taskly_core::generation::GenerationContext;
use taskly_core::prompts::PromptTemplates;

use crate::provider::{build_prompts, GeneratedTaskBatch, ProviderError, TaskGenerator};

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token for the chat-completion API.
    pub api_key: String,
    /// Model identifier, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Base URL without trailing slash, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Per-request timeout. Generation is the only long-latency external
    /// call in the system; a timeout surfaces as a fatal request error.
    pub timeout_secs: u64,
}

/// Chat-completion backed [`TaskGenerator`].
pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
    templates: Arc<PromptTemplates>,
}

impl OpenAiGenerator {
    pub fn new(config: OpenAiConfig, templates: Arc<PromptTemplates>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client construction cannot fail with static options");
        Self {
            client,
            config,
            templates,
        }
    }

    /// Issue the literal chat-completion call for two rendered prompts.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<GeneratedTaskBatch, ProviderError> {
        let body = request_body(&self.config.model, system_prompt, user_prompt);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        Ok(parse_batch(completion.content()))
    }
}

#[async_trait]
impl TaskGenerator for OpenAiGenerator {
    async fn generate_tasks(
        &self,
        context: &GenerationContext,
    ) -> Result<GeneratedTaskBatch, ProviderError> {
        let (system_prompt, user_prompt) = build_prompts(&self.templates, context)?;
        self.generate(&system_prompt, &user_prompt).await
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// The first choice's message content, if the backend produced any.
    fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// Build the chat-completion request body with the strict output schema.
fn request_body(model: &str, system_prompt: &str, user_prompt: &str) -> serde_json::Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system_prompt },
            { "role": "user", "content": user_prompt },
        ],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": "task_batch",
                "strict": true,
                "schema": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "batch_title": { "type": "string" },
                        "tasks": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "additionalProperties": false,
                                "properties": {
                                    "title": { "type": "string" },
                                    "description": { "type": "string" },
                                    "priority": {
                                        "type": "string",
                                        "enum": ["LOW", "MEDIUM", "HIGH"],
                                    },
                                    "status": {
                                        "type": "string",
                                        "enum": ["TODO", "IN_PROGRESS", "DONE"],
                                    },
                                },
                                "required": ["title", "description", "priority", "status"],
                            },
                        },
                    },
                    "required": ["batch_title", "tasks"],
                },
            },
        },
    })
}

/// Parse the message content into a batch.
///
/// Missing content or content that does not match the schema degrades to
/// the empty batch; only transport/API failures are errors, and those are
/// handled before this point.
fn parse_batch(content: Option<&str>) -> GeneratedTaskBatch {
    let Some(content) = content else {
        tracing::warn!("Generation response had no message content, returning empty batch");
        return GeneratedTaskBatch::empty();
    };
    match serde_json::from_str::<GeneratedTaskBatch>(content) {
        Ok(batch) => batch,
        Err(error) => {
            tracing::warn!(%error, "Generation response content was not parseable, returning empty batch");
            GeneratedTaskBatch::empty()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
