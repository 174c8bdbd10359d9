//! Gulch Engine - interpret captured model output from the command line.
//!
//! Usage: `gulch-engine [path]`. Reads the response from `path`, or stdin when
//! omitted, and prints the interpreted result as JSON on stdout.

use std::io::Read;

use anyhow::Context;
use gulch_engine::{InterpreterSettings, ResponseInterpreter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gulch_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = InterpreterSettings::from_env();
    tracing::debug!(?settings, "Loaded interpreter settings");

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read model output from {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read model output from stdin")?;
            buffer
        }
    };

    let interpreter = ResponseInterpreter::new(settings);
    let parsed = interpreter.interpret(&raw);
    tracing::info!(
        narrative_len = parsed.narrative.len(),
        has_decision = parsed.decision.is_some(),
        actions = parsed.suggested_actions.len(),
        "Interpreted response"
    );

    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
