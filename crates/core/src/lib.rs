pub mod agent;
pub mod error;
pub mod instruction;
pub mod llm_client;
pub mod session;
pub mod session_config;
pub mod summary;
pub mod transcript;
pub mod translation;

pub use error::DuetError;
pub use session::{DualAgentSession, SessionOptions, SessionState};
pub use session_config::{
    Language, LearningMode, ProficiencyLevel, RawSessionConfig, RoleSpec, SessionConfig,
    SessionLength,
};
pub use transcript::{Transcript, TranscriptEntry};
