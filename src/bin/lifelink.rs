//! LifeLink console binary.
//!
//! Runs the interactive disaster-response console, or one of the
//! learned-response management commands.
//!
//! # Environment Variables
//!
//! - `LIFELINK_CONFIG` — optional YAML config file (or `--config <file>`)
//! - `LIFELINK_KNOWLEDGE` — knowledge base JSON (default: built-in)
//! - `LIFELINK_LEARNED` — learned responses file (default: learned_responses.json)
//! - `GEMINI_API_KEY` / `GOOGLE_API_KEY` — enables remote answers
//! - `RUST_LOG` — Tracing filter (default: "info,lifelink=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin lifelink
//! cargo run --bin lifelink -- stats
//! cargo run --bin lifelink -- list flood 5
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use lifelink::cli::{self, Cli, Command};
use lifelink::learned::{JsonFilePersistence, LearnedCache};
use lifelink::{LifelinkConfig, Router};

const EXIT_WORDS: &[&str] = &["quit", "exit", "bye"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lifelink=debug".into()),
        )
        .init();

    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var("LIFELINK_CONFIG").ok().map(PathBuf::from));
    let config = load_config(config_path.as_deref())?;

    match args.action() {
        Command::Chat => run_console(&config).await?,
        Command::Stats => println!("{}", cli::format_stats(&open_cache(&config).statistics())),
        Command::List { category, limit } => {
            let cache = open_cache(&config);
            println!("{}", cli::format_records(&cache.list(category, limit)));
        }
        Command::Search { keyword } => {
            let keyword = keyword.join(" ");
            let cache = open_cache(&config);
            println!("{}", cli::format_search(&keyword, &cache.search(&keyword)));
        }
        Command::Delete { key } => {
            let key = key.join(" ");
            let mut cache = open_cache(&config);
            if !cache.delete(&key) {
                println!("Response not found: {}", key);
            } else if cache.is_writable() {
                println!("✓ Deleted response: {}", key);
            } else {
                anyhow::bail!("learned responses file is unreadable; nothing was changed");
            }
        }
        Command::Export { file } => {
            let cache = open_cache(&config);
            if cache.is_empty() {
                println!("No responses to export.");
            } else {
                let count = cache
                    .export_training_data(&file)
                    .with_context(|| format!("exporting to {}", file.display()))?;
                println!("✓ Exported {} responses to {}", count, file.display());
            }
        }
        Command::Clear { yes } => {
            if !yes {
                println!("⚠️  This will delete ALL learned responses! Re-run with `clear --yes`.");
            } else {
                let mut cache = open_cache(&config);
                anyhow::ensure!(
                    cache.is_writable(),
                    "learned responses file {} is unreadable; remove it by hand",
                    config.learned_path.display()
                );
                cache.clear();
                println!("✓ All learned responses cleared.");
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LifelinkConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            LifelinkConfig::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(LifelinkConfig::from_env()),
    }
}

fn open_cache(config: &LifelinkConfig) -> LearnedCache {
    LearnedCache::load(Arc::new(JsonFilePersistence::new(
        config.learned_path.clone(),
    )))
}

async fn run_console(config: &LifelinkConfig) -> anyhow::Result<()> {
    let mut router = Router::from_config(config).context("loading knowledge base")?;
    tracing::info!(
        "LifeLink ready: {} disaster types, {} learned responses, remote: {}",
        router.disaster_types().len(),
        router.cache().len(),
        router.remote_label()
    );

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"LifeLink Disaster Response Assistant\nType 'emergency' for contacts, 'reset' to clear history, 'quit' to exit.\n")
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        let lower = message.to_lowercase();
        let reply = if EXIT_WORDS.contains(&lower.as_str()) {
            stdout.write_all("Stay safe! 👋\n".as_bytes()).await?;
            break;
        } else if lower == "emergency" {
            router.emergency_contacts().to_string()
        } else if lower == "reset" {
            router.reset_conversation();
            "Conversation cleared.".to_string()
        } else {
            router.chat(message).await
        };

        stdout
            .write_all(format!("\nLifeLink: {}\n", reply).as_bytes())
            .await?;
    }

    tracing::info!(
        "Session ended after {} turns",
        router.history().len() / 2
    );
    Ok(())
}
