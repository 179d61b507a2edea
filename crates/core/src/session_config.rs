//! Session parameters shared by the instruction builder and the orchestrator.
//!
//! All lookup keys are closed enumerations, so every table below is an
//! exhaustive `match` rather than a string-keyed map.

use crate::error::DuetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of exchange the two agents simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearningMode {
    Conversation,
    Debate,
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearningMode::Conversation => write!(f, "Conversation"),
            LearningMode::Debate => write!(f, "Debate"),
        }
    }
}

impl FromStr for LearningMode {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conversation" => Ok(LearningMode::Conversation),
            "debate" => Ok(LearningMode::Debate),
            _ => Err(DuetError::UnsupportedLearningMode(s.to_string())),
        }
    }
}

/// The learner's assumed level in the target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProficiencyLevel::Beginner => write!(f, "Beginner"),
            ProficiencyLevel::Intermediate => write!(f, "Intermediate"),
            ProficiencyLevel::Advanced => write!(f, "Advanced"),
        }
    }
}

impl FromStr for ProficiencyLevel {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(ProficiencyLevel::Beginner),
            "intermediate" => Ok(ProficiencyLevel::Intermediate),
            "advanced" => Ok(ProficiencyLevel::Advanced),
            _ => Err(DuetError::UnsupportedProficiencyLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionLength {
    Short,
    Long,
}

impl fmt::Display for SessionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionLength::Short => write!(f, "Short"),
            SessionLength::Long => write!(f, "Long"),
        }
    }
}

impl FromStr for SessionLength {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SessionLength::Short),
            "long" => Ok(SessionLength::Long),
            _ => Err(DuetError::UnsupportedSessionLength(s.to_string())),
        }
    }
}

/// Target languages offered to learners. English doubles as the reference language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    French,
    German,
    Spanish,
    Italian,
    Japanese,
    Chinese,
}

impl Language {
    /// The language translations and summaries are written in.
    pub const REFERENCE: Language = Language::English;

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::German => "German",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::Japanese => "Japanese",
            Language::Chinese => "Chinese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" => Ok(Language::English),
            "french" => Ok(Language::French),
            "german" => Ok(Language::German),
            "spanish" => Ok(Language::Spanish),
            "italian" => Ok(Language::Italian),
            "japanese" => Ok(Language::Japanese),
            "chinese" => Ok(Language::Chinese),
            _ => Err(DuetError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Total exchanges the agents are told to complete, keyed by length and mode.
pub fn exchange_count(length: SessionLength, mode: LearningMode) -> usize {
    match (length, mode) {
        (SessionLength::Short, LearningMode::Conversation) => 8,
        (SessionLength::Short, LearningMode::Debate) => 4,
        (SessionLength::Long, LearningMode::Conversation) => 16,
        (SessionLength::Long, LearningMode::Debate) => 8,
    }
}

/// Identity of one side of the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    pub name: String,
    /// What the role is doing in the scene. Conversation mode only.
    pub action: Option<String>,
}

impl RoleSpec {
    pub fn new(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: Some(action.into()),
        }
    }

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            action: None,
        }
    }
}

/// Validated, immutable parameters for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub learning_mode: LearningMode,
    pub language: Language,
    pub proficiency_level: ProficiencyLevel,
    pub session_length: SessionLength,
    /// A place in Conversation mode, a topic in Debate mode.
    pub scenario: String,
    pub role1: RoleSpec,
    pub role2: RoleSpec,
}

impl SessionConfig {
    /// A role-play in `scenario` between two roles with their own actions.
    pub fn conversation(
        language: Language,
        proficiency_level: ProficiencyLevel,
        session_length: SessionLength,
        scenario: impl Into<String>,
        role1: RoleSpec,
        role2: RoleSpec,
    ) -> Self {
        Self {
            learning_mode: LearningMode::Conversation,
            language,
            proficiency_level,
            session_length,
            scenario: scenario.into(),
            role1,
            role2,
        }
    }

    /// A debate on `topic` with the fixed Proponent/Opponent roles.
    pub fn debate(
        language: Language,
        proficiency_level: ProficiencyLevel,
        session_length: SessionLength,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            learning_mode: LearningMode::Debate,
            language,
            proficiency_level,
            session_length,
            scenario: topic.into(),
            role1: RoleSpec::named("Proponent"),
            role2: RoleSpec::named("Opponent"),
        }
    }

    pub fn exchange_count(&self) -> usize {
        exchange_count(self.session_length, self.learning_mode)
    }

    /// Checks the free-text fields the enums cannot constrain.
    ///
    /// Debate roles are normalized to the fixed stance names.
    pub fn validate(mut self) -> Result<Self, DuetError> {
        if self.scenario.trim().is_empty() {
            return Err(invalid("scenario", "must not be empty"));
        }
        match self.learning_mode {
            LearningMode::Conversation => {
                for (field, role) in [("role1", &self.role1), ("role2", &self.role2)] {
                    if role.name.trim().is_empty() {
                        return Err(invalid(field, "role name must not be empty"));
                    }
                    let has_action = role
                        .action
                        .as_deref()
                        .is_some_and(|a| !a.trim().is_empty());
                    if !has_action {
                        return Err(invalid(field, "conversation roles need an action"));
                    }
                }
            }
            LearningMode::Debate => {
                self.role1 = RoleSpec::named("Proponent");
                self.role2 = RoleSpec::named("Opponent");
            }
        }
        Ok(self)
    }
}

fn invalid(field: &'static str, reason: &str) -> DuetError {
    DuetError::InvalidConfiguration {
        field,
        reason: reason.to_string(),
    }
}

/// Unvalidated session parameters as a presentation layer collects them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSessionConfig {
    pub learning_mode: String,
    pub language: String,
    pub proficiency_level: String,
    pub session_length: String,
    pub scenario: String,
    pub role1_name: String,
    #[serde(default)]
    pub role1_action: Option<String>,
    pub role2_name: String,
    #[serde(default)]
    pub role2_action: Option<String>,
}

fn parse_field<T>(field: &'static str, value: &str) -> Result<T, DuetError>
where
    T: FromStr<Err = DuetError>,
{
    value.parse::<T>().map_err(|e| DuetError::InvalidConfiguration {
        field,
        reason: e.to_string(),
    })
}

impl TryFrom<RawSessionConfig> for SessionConfig {
    type Error = DuetError;

    fn try_from(raw: RawSessionConfig) -> Result<Self, Self::Error> {
        let config = SessionConfig {
            learning_mode: parse_field("learning_mode", &raw.learning_mode)?,
            language: parse_field("language", &raw.language)?,
            proficiency_level: parse_field("proficiency_level", &raw.proficiency_level)?,
            session_length: parse_field("session_length", &raw.session_length)?,
            scenario: raw.scenario,
            role1: RoleSpec {
                name: raw.role1_name,
                action: raw.role1_action,
            },
            role2: RoleSpec {
                name: raw.role2_name,
                action: raw.role2_action,
            },
        };
        config.validate()
    }
}
