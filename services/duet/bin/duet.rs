//! Main Entrypoint for the Duet Runner
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Validating the session parameters given on the command line.
//! 3. Initializing the generation backend.
//! 4. Driving the dual-agent session and printing the transcript.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use clap::Parser;
use duet_core::{
    DualAgentSession, DuetError, RawSessionConfig, SessionConfig, SessionOptions,
    llm_client::{LLMClient, OfflineClient, OpenAICompatibleClient, TimeoutClient},
};
use duet_service::{
    config::{Config, Provider},
    render::{OutputFormat, RevealMode, render},
    runner::{failure_headline, run_session},
};
use std::sync::Arc;
use tracing::info;

/// Two AI roles talk in the language you are learning.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// conversation or debate
    #[arg(long, default_value = "conversation")]
    mode: String,
    /// Target language, e.g. French
    #[arg(long)]
    language: String,
    /// beginner, intermediate or advanced
    #[arg(long, default_value = "beginner")]
    level: String,
    /// short or long
    #[arg(long, default_value = "short")]
    length: String,
    /// Place for a conversation, topic for a debate
    #[arg(long)]
    scenario: String,
    #[arg(long, default_value = "")]
    role1_name: String,
    #[arg(long)]
    role1_action: Option<String>,
    #[arg(long, default_value = "")]
    role2_name: String,
    #[arg(long)]
    role2_action: Option<String>,
    /// Rounds to run instead of the session's nominal exchange count
    #[arg(long)]
    rounds: Option<usize>,
    #[arg(long, value_enum, default_value_t = RevealMode::Both)]
    reveal: RevealMode,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Skip the end-of-session learning summary
    #[arg(long)]
    no_summary: bool,
}

impl From<Args> for RawSessionConfig {
    fn from(args: Args) -> Self {
        RawSessionConfig {
            learning_mode: args.mode,
            language: args.language,
            proficiency_level: args.level,
            session_length: args.length,
            scenario: args.scenario,
            role1_name: args.role1_name,
            role1_action: args.role1_action,
            role2_name: args.role2_name,
            role2_action: args.role2_action,
        }
    }
}

fn build_client(config: &Config) -> anyhow::Result<Arc<dyn LLMClient>> {
    let api = |api_key: &Option<String>, base: &str| -> anyhow::Result<OpenAICompatibleClient> {
        let api_key = api_key.as_ref().context("API key missing for provider")?;
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base);
        Ok(OpenAICompatibleClient::new(
            openai_config,
            config.chat_model.clone(),
        ))
    };

    let client: Arc<dyn LLMClient> = match &config.provider {
        Provider::OpenAI => {
            info!("Using OpenAI provider.");
            Arc::new(TimeoutClient::new(
                api(&config.openai_api_key, "https://api.openai.com/v1/")?,
                config.generation_timeout,
            ))
        }
        Provider::Gemini => {
            info!("Using Gemini provider.");
            Arc::new(TimeoutClient::new(
                api(
                    &config.gemini_api_key,
                    "https://generativelanguage.googleapis.com/v1beta/openai",
                )?,
                config.generation_timeout,
            ))
        }
        Provider::Offline => {
            info!("Using offline provider.");
            Arc::new(OfflineClient)
        }
    };
    Ok(client)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let fail = |err: DuetError| {
        let headline = failure_headline(&err);
        anyhow::Error::new(err).context(headline)
    };

    let (reveal, format, rounds) = (args.reveal, args.format, args.rounds);
    let summarize = !args.no_summary;
    let session_config = SessionConfig::try_from(RawSessionConfig::from(args)).map_err(fail)?;

    // --- 3. Initialize the Backend ---
    let client = build_client(&config)?;
    let options = SessionOptions {
        parallel_translations: config.parallel_translations,
        memory_window: config.memory_window,
    };
    let session = DualAgentSession::with_options(session_config, client, options).map_err(fail)?;

    // --- 4. Run and Print ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        rounds = rounds.unwrap_or_else(|| session.exchange_count()),
        "Starting session..."
    );
    let report = run_session(session, rounds, summarize)
        .await
        .map_err(fail)?;
    println!("{}", render(&report, reveal, format)?);

    info!("Session finished.");
    Ok(())
}
