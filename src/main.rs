// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::email::FileSource;

mod app_config;
mod app_controller;
mod document;
mod email;
mod errors;
mod html;
mod notion;
mod providers;
mod tickers;
mod translation;
mod urls;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sync newsletter messages to the block store (default command)
    #[command(alias = "sync")]
    Sync(SyncArgs),

    /// Generate shell completions for lettersync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SyncArgs {
    /// JSON file of raw messages exported from the mail provider
    #[arg(value_name = "MESSAGES_FILE")]
    messages_file: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Maximum messages to process in this run
    #[arg(short, long)]
    max_messages: Option<usize>,

    /// Model name to use for translation
    #[arg(long)]
    model: Option<String>,

    /// Disable translation for this run
    #[arg(long)]
    no_translation: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// lettersync - Newsletter to block-store sync with AI translation
///
/// Converts HTML newsletter emails into structured block documents and
/// syncs them to a Notion database, optionally annotating each paragraph
/// with a DeepSeek translation.
#[derive(Parser, Debug)]
#[command(name = "lettersync")]
#[command(version = "1.0.0")]
#[command(about = "Newsletter to Notion sync with AI translation")]
#[command(long_about = "lettersync converts HTML newsletter emails into block documents and syncs \
them to Notion, with optional DeepSeek translation of every paragraph.

EXAMPLES:
    lettersync messages.json                    # Sync using default config
    lettersync -m 10 messages.json              # Process at most 10 messages
    lettersync --no-translation messages.json   # Sync without translating
    lettersync --log-level debug messages.json  # Verbose logging
    lettersync completions bash > lettersync.bash

CONFIGURATION:
    Tunables are stored in conf.json by default; a default file is created
    if missing. Credentials come from environment variables:
    NOTION_API_TOKEN, NOTION_DATABASE_ID (required),
    NOTION_API_TOKEN_2, NOTION_DATABASE_ID_2 (optional second database),
    DEEPSEEK_API_KEY (optional; translation is skipped without it),
    ENABLE_TRANSLATION, MAX_EMAIL_LIMIT.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON file of raw messages exported from the mail provider
    #[arg(value_name = "MESSAGES_FILE")]
    messages_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Maximum messages to process in this run
    #[arg(short, long)]
    max_messages: Option<usize>,

    /// Model name to use for translation
    #[arg(long)]
    model: Option<String>,

    /// Disable translation for this run
    #[arg(long)]
    no_translation: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\u{274c} ",
            Level::Warn => "\u{1f6a7} ",
            Level::Info => " ",
            Level::Debug => "\u{1f50d} ",
            Level::Trace => "\u{1f4cb} ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());

            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lettersync", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Sync(args)) => run_sync(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let messages_file = cli.messages_file.ok_or_else(|| {
                anyhow!("MESSAGES_FILE is required when no subcommand is specified")
            })?;

            let sync_args = SyncArgs {
                messages_file,
                config_path: cli.config_path,
                max_messages: cli.max_messages,
                model: cli.model,
                no_translation: cli.no_translation,
                log_level: cli.log_level,
            };
            run_sync(sync_args).await
        }
    }
}

async fn run_sync(options: SyncArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader::<_, Config>(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Credentials and run limits come from the environment
    config.apply_env();

    // Override config with CLI options if provided
    if let Some(max) = options.max_messages {
        config.sync.max_messages = max;
    }
    if let Some(model) = &options.model {
        config.translation.model = model.clone();
    }
    if options.no_translation {
        config.translation.enabled = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    if !options.messages_file.exists() {
        return Err(anyhow!("Messages file does not exist: {:?}", options.messages_file));
    }

    let source = FileSource::new(&options.messages_file);
    let controller = Controller::with_config(config)?;
    controller.run(&source).await?;

    Ok(())
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
