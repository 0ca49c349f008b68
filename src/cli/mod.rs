//! Command-line surface for the `lifelink` binary.
//!
//! Defines the CLI structure using clap and renders learned-cache reports
//! as plain text. All terminal I/O stays in the binary.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::category::Category;
use crate::learned::{LearnedRecord, LearnedStats};

/// Default output file for `export`.
pub const DEFAULT_EXPORT_PATH: &str = "learned_training_data.json";

/// Longest answer excerpt shown by `list`.
const ANSWER_PREVIEW_CHARS: usize = 300;

/// Longest question excerpt shown in the top-records table.
const QUESTION_PREVIEW_CHARS: usize = 60;

/// LifeLink disaster-response assistant
#[derive(Debug, Parser)]
#[command(name = "lifelink", version, about, long_about = None)]
pub struct Cli {
    /// Optional YAML config file (overrides $LIFELINK_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand (if not provided, starts the interactive console)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive disaster-response console
    Chat,

    /// Learned response statistics
    #[command(alias = "statistics")]
    Stats,

    /// List learned responses
    List {
        /// Only this disaster type (earthquake, flood, winter_storm, ...)
        #[arg(value_parser = parse_category)]
        category: Option<Category>,

        /// Show at most this many responses
        limit: Option<usize>,
    },

    /// Search learned questions and answers
    Search {
        /// Case-insensitive keyword; multiple words are joined with spaces
        #[arg(required = true)]
        keyword: Vec<String>,
    },

    /// Delete a learned response by normalized question
    Delete {
        #[arg(required = true)]
        key: Vec<String>,
    },

    /// Export learned responses as training data
    Export {
        #[arg(default_value = DEFAULT_EXPORT_PATH)]
        file: PathBuf,
    },

    /// Delete ALL learned responses
    Clear {
        /// Confirm deletion
        #[arg(long, short)]
        yes: bool,
    },
}

impl Cli {
    /// The chosen command, `chat` when none was given.
    pub fn action(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}

/// Parse a disaster-type key for `list`.
pub fn parse_category(value: &str) -> Result<Category, String> {
    Category::from_key(value).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        format!("unknown disaster type '{}' (expected one of: {})", value, known.join(", "))
    })
}

fn rule() -> String {
    "=".repeat(70)
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Statistics report.
pub fn format_stats(stats: &LearnedStats<'_>) -> String {
    if stats.total == 0 {
        return "No learned responses yet.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "📊 LEARNED RESPONSES STATISTICS");
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "\n📚 Total Learned Responses: {}", stats.total);
    let _ = writeln!(out, "🔄 Total Reuses: {} times", stats.total_reuses);
    let _ = writeln!(
        out,
        "📈 Average Reuse: {:.1} times per response",
        stats.average_reuse
    );

    let _ = writeln!(out, "\n📂 By Disaster Type:");
    for (category, count) in &stats.by_category {
        let _ = writeln!(out, "   • {}: {} responses", category.display_name(), count);
    }

    let _ = writeln!(out, "\n🔥 Top {} Most Used Responses:", stats.top.len());
    for (i, (_, record)) in stats.top.iter().enumerate() {
        let _ = writeln!(
            out,
            "   {}. [{} uses] {}",
            i + 1,
            record.reuse_count,
            excerpt(&record.question, QUESTION_PREVIEW_CHARS)
        );
    }
    let _ = write!(out, "\n{}", rule());
    out
}

/// Numbered listing with answer excerpts.
pub fn format_records(records: &[(&str, &LearnedRecord)]) -> String {
    if records.is_empty() {
        return "No learned responses found.".to_string();
    }
    let mut out = String::new();
    for (i, (_, record)) in records.iter().enumerate() {
        let _ = writeln!(out, "{}", "─".repeat(70));
        let _ = writeln!(
            out,
            "#{} | 🔖 {} | ⏰ {} | 🔄 Used {}x",
            i + 1,
            record.category.display_name(),
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.reuse_count
        );
        let _ = writeln!(out, "{}", "─".repeat(70));
        let _ = writeln!(out, "❓ Question: {}", record.question);
        let _ = writeln!(
            out,
            "\n💡 Answer:\n{}\n",
            excerpt(&record.answer, ANSWER_PREVIEW_CHARS)
        );
    }
    out
}

/// One line per search hit.
pub fn format_search(keyword: &str, hits: &[(&str, &LearnedRecord)]) -> String {
    if hits.is_empty() {
        return format!("No responses found containing '{}'", keyword);
    }
    let mut out = format!("🔍 Found {} responses containing '{}':\n", hits.len(), keyword);
    for (i, (_, record)) in hits.iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. [{} uses] {}",
            i + 1,
            record.reuse_count,
            record.question
        );
    }
    out
}
