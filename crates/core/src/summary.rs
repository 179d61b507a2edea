//! Summary Service
//!
//! Distills a finished transcript into learning points written in English.

use crate::error::DuetError;
use crate::llm_client::LLMClient;
use crate::session_config::{Language, ProficiencyLevel};
use std::sync::Arc;
use tracing::info;

const SUMMARIZER_INSTRUCTION: &str = "You are a language teacher preparing study notes.";

/// Writes the summary request for a flattened, role-prefixed script.
pub fn summary_prompt(script: &[String], language: Language, level: ProficiencyLevel) -> String {
    format!(
        "The following text is a simulated conversation in {language}. The goal of this text \
         is to aid {language} learners to learn real-life usage of {language}. Therefore, your \
         task is to summarize the key learning points based on the given text. Specifically, \
         you should summarize the key vocabulary, grammar points, and function phrases that \
         could be important for students learning {language}. Your summary should be written \
         in English, but use examples from the text in the original language where \
         appropriate. Remember your target students have a proficiency level of {level} in \
         {language}. The summary must match their proficiency level.\n\n\
         The conversation is:\n{}",
        script.join("\n")
    )
}

pub struct SummaryService {
    client: Arc<dyn LLMClient>,
}

impl SummaryService {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Makes a single call over the whole script.
    pub async fn summarize(
        &self,
        script: &[String],
        language: Language,
        level: ProficiencyLevel,
    ) -> Result<String, DuetError> {
        let prompt = summary_prompt(script, language, level);
        let summary = self
            .client
            .generate(SUMMARIZER_INSTRUCTION, &[], &prompt)
            .await
            .map_err(DuetError::SummaryFailure)?;
        info!(lines = script.len(), %language, %level, "Transcript summarized");
        Ok(summary)
    }
}
