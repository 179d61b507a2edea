use serde::{Deserialize, Serialize};

/// Both roles' utterances and translations for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role1_utterance: String,
    pub role1_translation: String,
    pub role2_utterance: String,
    pub role2_translation: String,
}

/// Chronological, append-only record of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens the rounds into `"<role>: <utterance>"` lines, role1 first in each round.
    pub fn script_lines(&self, role1: &str, role2: &str) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|entry| {
                [
                    format!("{role1}: {}", entry.role1_utterance),
                    format!("{role2}: {}", entry.role2_utterance),
                ]
            })
            .collect()
    }
}
