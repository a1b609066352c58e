//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::RiskLevel;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// PulseBoard - team health and sprint risk analysis
///
/// Analyzes workload, goals, wellbeing and sprint progress, correlates the
/// results per member, and renders a brief that a local Ollama model can
/// answer manager questions from.
///
/// Examples:
///   pulseboard
///   pulseboard --data team.json --today 2025-06-28
///   pulseboard --data team.json --format markdown --output report.md
///   pulseboard --ask "Who needs support this week?"
///   pulseboard --chat --model mistral:7b
///   pulseboard --fail-on high
///   pulseboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset JSON file to analyze
    ///
    /// Falls back to `data.path` in .pulseboard.toml, then to the built-in
    /// sample dataset.
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Date to evaluate the data against (YYYY-MM-DD)
    ///
    /// Defaults to the current UTC date.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Output format (brief, markdown, json)
    #[arg(short, long, default_value = "brief", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Ask the assistant one question about the team
    #[arg(short, long, value_name = "QUESTION", conflicts_with = "chat")]
    pub ask: Option<String>,

    /// Start an interactive chat with the assistant
    ///
    /// An empty line, `exit` or `quit` ends the session.
    #[arg(long)]
    pub chat: bool,

    /// Ollama model to answer questions with
    ///
    /// Can also be set via PULSEBOARD_MODEL env var or .pulseboard.toml config.
    #[arg(short, long, env = "PULSEBOARD_MODEL")]
    pub model: Option<String>,

    /// Ollama API endpoint URL
    #[arg(long, env = "OLLAMA_URL", value_name = "URL")]
    pub ollama_url: Option<String>,

    /// Temperature for LLM responses (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of most recent sprints to analyze (0 keeps all)
    #[arg(long, value_name = "COUNT")]
    pub history_limit: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .pulseboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Fail if any finding is at or above this risk level
    ///
    /// Useful for CI pipelines. Exit code 2 when threshold is reached.
    /// Values: high, medium, low
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOnLevel>,

    /// Generate a default .pulseboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// What to render after the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// The assistant context brief (default)
    #[default]
    Brief,
    /// Markdown report
    Markdown,
    /// JSON report
    Json,
}

/// Risk level for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum FailOnLevel {
    Low,
    Medium,
    High,
}

impl From<FailOnLevel> for RiskLevel {
    fn from(level: FailOnLevel) -> Self {
        match level {
            FailOnLevel::Low => RiskLevel::Low,
            FailOnLevel::Medium => RiskLevel::Medium,
            FailOnLevel::High => RiskLevel::High,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether the assistant will be called.
    pub fn wants_assistant(&self) -> bool {
        self.ask.is_some() || self.chat
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.ollama_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref question) = self.ask {
            if question.trim().is_empty() {
                return Err("Question for --ask must not be empty".to_string());
            }
        }

        if self.chat && self.output.is_some() {
            return Err("--output cannot be combined with --chat".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
