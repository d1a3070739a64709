// ABOUTME: Command-line driver that runs one message through the copilot against a demo persona
// ABOUTME: Seeds an in-memory store, sends the message and prints the reply or its wire JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Log a food on the default persona's Monday
//! copilot-cli --message "I ate a banana"
//!
//! # Log an exercise on Wednesday (legs day) and print the wire JSON
//! copilot-cli --day 2 --message "leg press 3x12 at 120kg" --json
//!
//! # Analyze a photo (requires COPILOT_LLM_ENABLED=true and GEMINI_API_KEY)
//! copilot-cli --image-file ./lunch.jpg --confirm
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::Parser;
use serde_json::json;
use tracing::info;

use fitness_copilot::brain::ActionEngine;
use fitness_copilot::config::BrainConfig;
use fitness_copilot::intelligence::EnergyTargetCalculator;
use fitness_copilot::lexicon::Lexicon;
use fitness_copilot::logging::LoggingConfig;
use fitness_copilot::services::{ChatService, MessageInput};
use fitness_copilot::store::{seed_persona, DemoPersona, InMemoryStore};

#[derive(Parser)]
#[command(
    name = "copilot-cli",
    about = "Fitness Copilot message runner",
    long_about = "Run one chat message through the copilot decision engine against a seeded demo persona."
)]
struct Cli {
    /// Message text
    #[arg(long, short = 'm', default_value = "")]
    message: String,

    /// Hosted image to analyze
    #[arg(long, conflicts_with = "image_file")]
    image_url: Option<String>,

    /// Local image to analyze, sent inline as base64
    #[arg(long)]
    image_file: Option<PathBuf>,

    /// Mark the message as carrying a voice note
    #[arg(long)]
    audio: bool,

    /// Simulated day, 0 = Monday
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=6))]
    day: u8,

    /// Demo persona: cut, bulk or maintain
    #[arg(long, default_value = "cut")]
    persona: DemoPersona,

    /// Confirm an emitted proposal and print the created log
    #[arg(long)]
    confirm: bool,

    /// Print the reply in its wire JSON form
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let config = BrainConfig::from_env();
    let engine = ActionEngine::new(Arc::new(Lexicon::builtin()))
        .with_optional_extractor(config.build_extractor())
        .with_timeouts(config.timeouts);
    info!(generative = engine.has_extractor(), persona = %cli.persona, "copilot ready");

    let store = Arc::new(InMemoryStore::new());
    let user_id = seed_persona(&store, cli.persona, cli.day);
    let service = ChatService::with_parts(
        store,
        engine,
        Arc::new(EnergyTargetCalculator),
        config.history,
    );

    let image_base64 = match &cli.image_file {
        Some(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read image {}", path.display()))?;
            Some(STANDARD.encode(bytes))
        }
        None => None,
    };

    let input = MessageInput {
        content: cli.message,
        image_url: cli.image_url,
        image_base64,
        audio_url: None,
        has_audio: cli.audio,
    };
    let exchange = service.send_message(user_id, input).await?;
    let reply = exchange.reply();

    let confirmed = if cli.confirm && reply.action.is_proposal() {
        Some(
            service
                .confirm_action(user_id, exchange.assistant_message.id)
                .await?,
        )
    } else {
        None
    };
    let summary = service.daily_summary(user_id).await?;

    if cli.json {
        let output = json!({
            "reply": reply,
            "effect": exchange.effect,
            "confirmed": confirmed,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", reply.content);
        println!();
        println!("action: {}", reply.action_type());
        if let Some(created) = confirmed {
            println!("confirmed: {}", serde_json::to_string(&created)?);
        }
        println!(
            "{}: {} / {} kcal, {:.1} / {:.1} g protein, {} of {} exercises logged",
            summary.day_name,
            summary.calories_consumed,
            summary.calories_target,
            summary.protein_consumed,
            summary.protein_target,
            summary.workouts_completed,
            summary.workouts_scheduled,
        );
    }

    Ok(())
}
