//! PulseBoard - team health and sprint risk analysis
//!
//! A CLI tool that analyzes workload, goals, wellbeing and sprint progress,
//! correlates the results per member, and answers manager questions through
//! a local Ollama model.
//!
//! Exit codes:
//!   0 - Success (no findings at or above threshold, or no --fail-on set)
//!   1 - Runtime error (unreadable data, bad config, Ollama failure, etc.)
//!   2 - Findings at or above the --fail-on threshold

mod analysis;
mod assistant;
mod cli;
mod config;
mod models;
mod report;
mod source;

use analysis::{highest_risk, TeamAnalysis};
use anyhow::{Context, Result};
use assistant::{Assistant, Conversation};
use chrono::{NaiveDate, Utc};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use models::{Dataset, Report, ReportMetadata, RiskLevel};
use report::BriefInput;
use source::{DataSource, JsonFileSource, SampleSource};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(log_level(&args, &config));

    info!("PulseBoard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .pulseboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to point at your dataset or change the model.");
    Ok(())
}

/// CLI verbosity wins; `general.verbose` in the config only raises the
/// default level.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run one analysis cycle and whatever output was asked for. Returns the
/// exit code (0 or 2).
async fn run(args: Args, config: Config) -> Result<i32> {
    let source: Box<dyn DataSource> = match config.data.path {
        Some(ref path) => Box::new(JsonFileSource::new(path.clone())),
        None => Box::new(SampleSource),
    };
    let dataset = source::load_dataset(source.as_ref(), config.data.history_limit)?;

    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    info!("Analyzing as of {}", today);

    let analysis = TeamAnalysis::run(&dataset, today);
    let summary = analysis.summary();
    info!(
        "{} findings: {} high, {} medium, {} low",
        summary.total, summary.high, summary.medium, summary.low
    );

    let brief = report::build_brief(
        &BriefInput {
            sprints: &dataset.sprints,
            daily_updates: &dataset.daily_updates,
            findings: &analysis.findings,
            correlation: &analysis.correlation,
            workload: &dataset.workload,
        },
        today,
    );

    if args.wants_assistant() {
        let assistant = Assistant::new(config.model.assistant_config())?;
        let mut conversation = Conversation::new(brief);

        if let Some(ref question) = args.ask {
            let answer =
                ask_with_spinner(&assistant, &conversation, question, args.quiet).await?;
            emit(&args, &answer)?;
        } else {
            run_chat(&assistant, &mut conversation, args.quiet).await?;
        }
    } else {
        let output = match args.format {
            OutputFormat::Brief => brief,
            OutputFormat::Markdown => report::generate_markdown_report(&build_report(
                &dataset,
                source.as_ref(),
                &analysis,
                today,
            )),
            OutputFormat::Json => report::generate_json_report(&build_report(
                &dataset,
                source.as_ref(),
                &analysis,
                today,
            ))?,
        };
        emit(&args, &output)?;
    }

    if let Some(fail_level) = args.fail_on {
        let threshold = RiskLevel::from(fail_level);
        if highest_risk(&analysis.findings).is_some_and(|risk| risk >= threshold) {
            eprintln!(
                "\n⛔ Findings at or above {} risk. Failing (exit code 2).",
                threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

fn build_report(
    dataset: &Dataset,
    source: &dyn DataSource,
    analysis: &TeamAnalysis,
    today: NaiveDate,
) -> Report {
    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        today,
        data_source: source.describe(),
        current_sprint: dataset.current_sprint().map(|s| s.sprint_name.clone()),
        member_count: dataset.member_ids().len(),
        finding_count: analysis.findings.len(),
    };

    Report::new(
        metadata,
        analysis.findings.clone(),
        analysis.correlation.clone(),
    )
}

/// Write to --output if given, stdout otherwise.
fn emit(args: &Args, content: &str) -> Result<()> {
    match args.output {
        Some(ref path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !args.quiet {
                println!("✅ Output saved to: {}", path.display());
            }
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn ask_with_spinner(
    assistant: &Assistant,
    conversation: &Conversation,
    question: &str,
    quiet: bool,
) -> Result<String> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Asking {}...", assistant.config().model_name));
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let result = assistant.ask(conversation, question).await;
    spinner.finish_and_clear();

    Ok(result?)
}

/// Interactive loop over stdin. Ends on EOF, an empty line, `exit` or `quit`.
async fn run_chat(
    assistant: &Assistant,
    conversation: &mut Conversation,
    quiet: bool,
) -> Result<()> {
    println!(
        "💬 Chatting with {}. Empty line, 'exit' or 'quit' to leave.",
        assistant.config().model_name
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("\n❓ You:");
        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };
        let question = line.trim();
        if question.is_empty()
            || question.eq_ignore_ascii_case("exit")
            || question.eq_ignore_ascii_case("quit")
        {
            break;
        }

        match ask_with_spinner(assistant, conversation, question, quiet).await {
            Ok(answer) => {
                println!("\n🤖 AskManager:\n{}", answer);
                conversation.record(question, answer);
            }
            // A failed turn is not recorded; the session goes on.
            Err(e) => {
                warn!("Question failed: {:#}", e);
                eprintln!("❌ Error: {:#}", e);
            }
        }
    }

    println!("👋 Bye.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
