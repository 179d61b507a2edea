//! Instruction Builder
//!
//! Compiles the fixed system instruction for one role. The output depends only
//! on the arguments, so the two agents of a session receive mirror-image
//! instructions that differ in the role names and the turn-order clause.

use crate::session_config::{
    Language, LearningMode, ProficiencyLevel, RoleSpec, SessionLength, exchange_count,
};

/// Everything the builder needs to write one role's instruction.
#[derive(Debug, Clone, Copy)]
pub struct InstructionParams<'a> {
    pub role: &'a RoleSpec,
    pub oppo_role: &'a RoleSpec,
    pub language: Language,
    pub scenario: &'a str,
    pub proficiency_level: ProficiencyLevel,
    pub learning_mode: LearningMode,
    pub session_length: SessionLength,
    pub is_starter: bool,
}

/// Maximum sentences per debate argument at each level.
pub fn argument_sentence_cap(level: ProficiencyLevel) -> usize {
    match level {
        ProficiencyLevel::Beginner => 4,
        ProficiencyLevel::Intermediate => 6,
        ProficiencyLevel::Advanced => 8,
    }
}

/// How complex the generated language should be.
pub fn complexity_guidance(level: ProficiencyLevel) -> &'static str {
    match level {
        ProficiencyLevel::Beginner => {
            "use as basic and simple vocabulary and sentence structures as possible. \
             Must avoid idioms, slang, and complex grammatical constructs."
        }
        ProficiencyLevel::Intermediate => {
            "use a wider range of vocabulary and a variety of sentence structures. \
             You can include some idioms and colloquial expressions, but avoid highly \
             technical language or complex literary expressions."
        }
        ProficiencyLevel::Advanced => {
            "use sophisticated vocabulary, complex sentence structures, idioms, \
             colloquial expressions, and technical language where appropriate."
        }
    }
}

fn describe(role: &RoleSpec) -> String {
    match role.action.as_deref() {
        Some(action) => format!("{} {}", role.name, action),
        None => role.name.clone(),
    }
}

fn mode_framing(params: &InstructionParams<'_>, exchanges: usize) -> String {
    let language = params.language;
    let level = params.proficiency_level;
    let complexity = complexity_guidance(level);
    let oppo = &params.oppo_role.name;

    match params.learning_mode {
        LearningMode::Conversation => format!(
            "You are an AI that is good at role-playing.\n\
             You are simulating a typical conversation happening {scenario}.\n\
             In this scenario, you are playing as a {role}, speaking to a {oppo_desc}.\n\
             Your conversation should only be conducted in {language}. Do not translate.\n\
             This simulated conversation is designed for {language} language learners to learn \
             real-life conversations in {language}. You should assume the learners' proficiency \
             level in {language} is {level}. Therefore, you should {complexity}\n\
             You should finish the conversation within {exchanges} exchanges with the {oppo}. \
             Make your conversation with the {oppo} natural and typical of the scenario in \
             {language} culture.\n",
            scenario = params.scenario,
            role = describe(params.role),
            oppo_desc = describe(params.oppo_role),
        ),
        LearningMode::Debate => format!(
            "You are an AI that is good at debating.\n\
             You are now engaged in a debate on the following topic: {scenario}.\n\
             In this debate, you are taking on the role of the {role}. \
             Always remember your stance in the debate.\n\
             Your debate should only be conducted in {language}. Do not translate.\n\
             This simulated debate is designed for {language} language learners to learn \
             {language}. You should assume the learners' proficiency level in {language} is \
             {level}. Therefore, you should {complexity}\n\
             You will exchange opinions with another AI, who plays the {oppo} role, \
             {exchanges} times.\n\
             Every time you speak, you can only speak no more than {cap} sentences.\n",
            scenario = params.scenario,
            role = params.role.name,
            cap = argument_sentence_cap(level),
        ),
    }
}

/// The closing clause that tells the agent whether it speaks first.
pub fn turn_order_clause(
    learning_mode: LearningMode,
    oppo_role: &RoleSpec,
    is_starter: bool,
) -> String {
    if is_starter {
        format!(
            "You are leading the {}.\n",
            learning_mode.to_string().to_lowercase()
        )
    } else {
        format!("Wait for the {}'s statement.\n", oppo_role.name)
    }
}

/// Builds the fixed behavioral instruction for one role.
pub fn build_instruction(params: &InstructionParams<'_>) -> String {
    let exchanges = exchange_count(params.session_length, params.learning_mode);
    let mut instruction = mode_framing(params, exchanges);
    instruction.push_str(&turn_order_clause(
        params.learning_mode,
        params.oppo_role,
        params.is_starter,
    ));
    instruction
}
