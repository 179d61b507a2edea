use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One completed exchange in an agent's dialogue memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub input: String,
    pub output: String,
}

impl Turn {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Errors raised by a generation backend.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("API error: {0}")]
    Api(#[from] OpenAIError),
    #[error("LLM response had no text content")]
    EmptyResponse,
    #[error("No response within {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Other(String),
}

/// A generic client for interacting with an LLM.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generates the next utterance given a fixed instruction, the prior turns
    /// and the new input.
    async fn generate(
        &self,
        instruction: &str,
        history: &[Turn],
        new_input: &str,
    ) -> Result<String, GenerationError>;
}

/// An implementation of `LLMClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The specific model identifier to use for chat completions (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

/// Lays out the chat history as system, then alternating user/assistant, then the new input.
pub(crate) fn build_messages(
    instruction: &str,
    history: &[Turn],
    new_input: &str,
) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(instruction.to_string())
            .build()?
            .into(),
    );
    for turn in history {
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(turn.input.clone())
                .build()?
                .into(),
        );
        messages.push(
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(turn.output.clone())
                .build()?
                .into(),
        );
    }
    messages.push(
        ChatCompletionRequestUserMessageArgs::default()
            .content(new_input.to_string())
            .build()?
            .into(),
    );
    Ok(messages)
}

#[async_trait]
impl LLMClient for OpenAICompatibleClient {
    async fn generate(
        &self,
        instruction: &str,
        history: &[Turn],
        new_input: &str,
    ) -> Result<String, GenerationError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(build_messages(instruction, history, new_input)?)
            .build()?;

        let response: CreateChatCompletionResponse = self.client.chat().create(request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

/// Puts a deadline on every call made through the wrapped client.
pub struct TimeoutClient<C> {
    inner: C,
    timeout: Duration,
}

impl<C: LLMClient> TimeoutClient<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<C: LLMClient> LLMClient for TimeoutClient<C> {
    async fn generate(
        &self,
        instruction: &str,
        history: &[Turn],
        new_input: &str,
    ) -> Result<String, GenerationError> {
        tokio::time::timeout(
            self.timeout,
            self.inner.generate(instruction, history, new_input),
        )
        .await
        .map_err(|_| GenerationError::Timeout(self.timeout))?
    }
}

/// A deterministic `LLMClient` for development and offline runs.
///
/// Replies echo the input together with the turn number, so transcripts are
/// predictable without network access or API costs.
pub struct OfflineClient;

#[async_trait]
impl LLMClient for OfflineClient {
    async fn generate(
        &self,
        _instruction: &str,
        history: &[Turn],
        new_input: &str,
    ) -> Result<String, GenerationError> {
        Ok(format!(
            "[turn {}] In reply to: {}",
            history.len() + 1,
            new_input.trim()
        ))
    }
}
