//! Translation Service
//!
//! Stateless, one call per utterance. Translations always target the reference
//! language, so English utterances are labelled and returned without a call.

use crate::error::DuetError;
use crate::llm_client::LLMClient;
use crate::session_config::Language;
use std::sync::Arc;
use tracing::debug;

/// Label prepended to every translation.
pub const TRANSLATION_LABEL: &str = "Translation: ";

const TRANSLATOR_INSTRUCTION: &str = "You are a professional translator. \
    Reply with the translation only, without commentary.";

/// Writes the request sent to the backend for one utterance.
pub fn translation_prompt(utterance: &str, source: Language, target: Language) -> String {
    format!(
        "Translate the following sentence from {source} (source language) to {target} \
         (target language).\nHere is the sentence in the source language:\n\n{utterance}"
    )
}

pub struct TranslationService {
    client: Arc<dyn LLMClient>,
}

impl TranslationService {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Translates one utterance into English.
    pub async fn translate(&self, utterance: &str, source: Language) -> Result<String, DuetError> {
        if source == Language::REFERENCE {
            return Ok(format!("{TRANSLATION_LABEL}{utterance}"));
        }

        let prompt = translation_prompt(utterance, source, Language::REFERENCE);
        let translated = self
            .client
            .generate(TRANSLATOR_INSTRUCTION, &[], &prompt)
            .await
            .map_err(DuetError::TranslationFailure)?;
        debug!(%source, chars = translated.len(), "Utterance translated");
        Ok(translated)
    }
}
